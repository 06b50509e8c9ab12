use super::renamed;
use crate::{
    error::Result,
    fixer::{
        Fixer,
        FixContext,
    },
    type_ref::{
        FixTarget,
        TypeRef,
        ID_FIELD,
    },
    version::SchemaVersion,
};
use data_tree::Tree;


/// Renames item stack ids by a fixed table.
#[derive(Debug)]
pub struct ItemRenameFix {
    pub name: &'static str,
    pub version: SchemaVersion,
    pub renames: &'static [(&'static str, &'static str)],
}

impl Fixer for ItemRenameFix {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> SchemaVersion {
        self.version
    }

    fn target(&self) -> FixTarget {
        FixTarget::all(TypeRef::ItemStack)
    }

    fn fix(&self, mut item: Tree, _: &FixContext) -> Result<Tree> {
        if let Some(id) = renamed(self.renames, item.get_str_or(ID_FIELD, "")) {
            item.set(ID_FIELD, id);
        }
        Ok(item)
    }
}


#[test]
fn test_item_rename() {
    let fix = ItemRenameFix {
        name: "melon",
        version: crate::schemas::V1490,
        renames: &[
            ("minecraft:melon_block", "minecraft:melon"),
            ("minecraft:melon", "minecraft:melon_slice"),
        ],
    };
    let ctx = FixContext { from: crate::schemas::V99, to: crate::schemas::V1490 };
    let item = |id: &str| Tree::empty_map().with(ID_FIELD, id).with("Count", 3i8);
    // each id is renamed once, not chained
    assert_eq!(fix.fix(item("minecraft:melon_block"), &ctx).unwrap(), item("minecraft:melon"));
    assert_eq!(fix.fix(item("minecraft:melon"), &ctx).unwrap(), item("minecraft:melon_slice"));
    assert_eq!(fix.fix(item("minecraft:stone"), &ctx).unwrap(), item("minecraft:stone"));
}
