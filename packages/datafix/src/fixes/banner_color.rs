use crate::{
    error::Result,
    fixer::{
        Fixer,
        FixContext,
    },
    schemas::V1451_5,
    type_ref::{
        FixTarget,
        TypeRef,
    },
    version::SchemaVersion,
};
use data_tree::Tree;


fn invert_color(color: Tree) -> Tree {
    Tree::from(15 - color.as_i32().unwrap_or(0))
}

/// Banner colors switch from dye damage order to wool order.
#[derive(Debug)]
pub struct BlockEntityBannerColorFix;

impl Fixer for BlockEntityBannerColorFix {
    fn name(&self) -> &'static str {
        "BlockEntityBannerColorFix"
    }

    fn version(&self) -> SchemaVersion {
        V1451_5
    }

    fn target(&self) -> FixTarget {
        FixTarget::choice(TypeRef::BlockEntity, "minecraft:banner")
    }

    fn fix(&self, mut banner: Tree, _: &FixContext) -> Result<Tree> {
        banner.update("Base", invert_color);
        banner.map_list("Patterns", |mut pattern| {
            pattern.update("Color", invert_color);
            pattern
        });
        Ok(banner)
    }
}


#[test]
fn test_banner_colors() {
    let ctx = FixContext { from: crate::schemas::V99, to: V1451_5 };
    let banner = Tree::empty_map()
        .with("id", "minecraft:banner")
        .with("Base", 4i32)
        .with("Patterns", vec![
            Tree::empty_map().with("Pattern", "bs").with("Color", 0i32),
            Tree::empty_map().with("Pattern", "cr"),
        ]);
    let fixed = BlockEntityBannerColorFix.fix(banner, &ctx).unwrap();
    assert_eq!(fixed.get_i32_or("Base", -1), 11);
    let patterns = fixed.get("Patterns").unwrap().as_list().unwrap();
    assert_eq!(patterns[0].get_i32_or("Color", -1), 15);
    assert!(!patterns[1].contains_key("Color"));
}
