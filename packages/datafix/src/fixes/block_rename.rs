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
    },
    version::SchemaVersion,
};
use data_tree::Tree;


/// Renames blocks in chunk section palettes by a fixed table.
#[derive(Debug)]
pub struct BlockRenameFix {
    pub name: &'static str,
    pub version: SchemaVersion,
    pub renames: &'static [(&'static str, &'static str)],
}

impl Fixer for BlockRenameFix {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> SchemaVersion {
        self.version
    }

    fn target(&self) -> FixTarget {
        FixTarget::all(TypeRef::Chunk)
    }

    fn fix(&self, mut chunk: Tree, _: &FixContext) -> Result<Tree> {
        let sections = chunk
            .get_path_mut(&["Level", "Sections"])
            .and_then(Tree::as_list_mut);
        for section in sections.into_iter().flatten() {
            section.map_list("Palette", |mut state| {
                if let Some(name) = renamed(self.renames, state.get_str_or("Name", "")) {
                    state.set("Name", name);
                }
                state
            });
        }
        Ok(chunk)
    }
}


#[test]
fn test_palette_rename() {
    let fix = BlockRenameFix {
        name: "flowing",
        version: crate::schemas::V1475,
        renames: &[("minecraft:flowing_water", "minecraft:water")],
    };
    let ctx = FixContext { from: crate::schemas::V99, to: crate::schemas::V1475 };
    let entry = |name: &str| Tree::empty_map()
        .with("Name", name)
        .with("Properties", Tree::empty_map().with("level", "3"));
    let chunk = |names: &[&str]| Tree::empty_map().with("Level", Tree::empty_map()
        .with("Sections", vec![Tree::empty_map()
            .with("Y", 0i8)
            .with("Palette", names.iter().map(|name| entry(name)).collect::<Vec<_>>())]));

    let fixed = fix.fix(chunk(&["minecraft:air", "minecraft:flowing_water"]), &ctx).unwrap();
    assert_eq!(fixed, chunk(&["minecraft:air", "minecraft:water"]));

    let unrelated = Tree::empty_map().with("Level", Tree::empty_map());
    assert_eq!(fix.fix(unrelated.clone(), &ctx).unwrap(), unrelated);
}
