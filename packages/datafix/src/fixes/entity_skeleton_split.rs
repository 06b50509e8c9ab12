use crate::{
    error::Result,
    fixer::{
        Fixer,
        FixContext,
    },
    schemas::V701,
    type_ref::{
        FixTarget,
        TypeRef,
        ID_FIELD,
    },
    version::SchemaVersion,
};
use data_tree::Tree;


/// Entity ids split off of `Skeleton`.
pub const SPLIT_SKELETONS: &'static [&'static str] = &["WitherSkeleton", "Stray"];


/// Skeleton variants become entity types of their own.
#[derive(Debug)]
pub struct EntitySkeletonSplitFix;

impl Fixer for EntitySkeletonSplitFix {
    fn name(&self) -> &'static str {
        "EntitySkeletonSplitFix"
    }

    fn version(&self) -> SchemaVersion {
        V701
    }

    fn target(&self) -> FixTarget {
        FixTarget::choice(TypeRef::Entity, "Skeleton")
    }

    fn produces(&self) -> &'static [&'static str] {
        SPLIT_SKELETONS
    }

    fn fix(&self, mut entity: Tree, _: &FixContext) -> Result<Tree> {
        let split = match entity.remove("SkeletonType").and_then(|t| t.as_i32()) {
            Some(1) => Some("WitherSkeleton"),
            Some(2) => Some("Stray"),
            _ => None,
        };
        if let Some(id) = split {
            entity.set(ID_FIELD, id);
        }
        Ok(entity)
    }
}


#[test]
fn test_skeleton_split() {
    let ctx = FixContext { from: crate::schemas::V99, to: V701 };
    let skeleton = |kind: i32| Tree::empty_map()
        .with(ID_FIELD, "Skeleton")
        .with("SkeletonType", kind)
        .with("Health", 20.0f32);

    let fixed = EntitySkeletonSplitFix.fix(skeleton(1), &ctx).unwrap();
    assert_eq!(fixed.get_str_or(ID_FIELD, ""), "WitherSkeleton");
    assert!(!fixed.contains_key("SkeletonType"));
    assert!(fixed.contains_key("Health"));

    let fixed = EntitySkeletonSplitFix.fix(skeleton(2), &ctx).unwrap();
    assert_eq!(fixed.get_str_or(ID_FIELD, ""), "Stray");

    let fixed = EntitySkeletonSplitFix.fix(skeleton(0), &ctx).unwrap();
    assert_eq!(fixed.get_str_or(ID_FIELD, ""), "Skeleton");
    assert!(!fixed.contains_key("SkeletonType"));
}
