use super::renamed;
use crate::{
    error::Result,
    fixer::{
        Fixer,
        FixContext,
    },
    schemas::V704,
    type_ref::{
        FixTarget,
        TypeRef,
        ID_FIELD,
    },
    version::SchemaVersion,
};
use data_tree::Tree;


/// Legacy block entity id to namespaced id.
pub const BLOCK_ENTITY_IDS: &'static [(&'static str, &'static str)] = &[
    ("Airportal", "minecraft:end_portal"),
    ("Banner", "minecraft:banner"),
    ("Beacon", "minecraft:beacon"),
    ("Cauldron", "minecraft:brewing_stand"),
    ("Chest", "minecraft:chest"),
    ("Comparator", "minecraft:comparator"),
    ("Control", "minecraft:command_block"),
    ("DLDetector", "minecraft:daylight_detector"),
    ("Dropper", "minecraft:dropper"),
    ("EnchantTable", "minecraft:enchanting_table"),
    ("EndGateway", "minecraft:end_gateway"),
    ("EnderChest", "minecraft:ender_chest"),
    ("FlowerPot", "minecraft:flower_pot"),
    ("Furnace", "minecraft:furnace"),
    ("Hopper", "minecraft:hopper"),
    ("MobSpawner", "minecraft:mob_spawner"),
    ("Music", "minecraft:noteblock"),
    ("Piston", "minecraft:piston"),
    ("RecordPlayer", "minecraft:jukebox"),
    ("Sign", "minecraft:sign"),
    ("Skull", "minecraft:skull"),
    ("Structure", "minecraft:structure_block"),
    ("Trap", "minecraft:dispenser"),
];


/// Block entity ids become namespaced.
#[derive(Debug)]
pub struct BlockEntityIdFix;

impl Fixer for BlockEntityIdFix {
    fn name(&self) -> &'static str {
        "BlockEntityIdFix"
    }

    fn version(&self) -> SchemaVersion {
        V704
    }

    fn target(&self) -> FixTarget {
        FixTarget::all(TypeRef::BlockEntity)
    }

    fn fix(&self, mut block_entity: Tree, _: &FixContext) -> Result<Tree> {
        if let Some(id) = renamed(BLOCK_ENTITY_IDS, block_entity.get_str_or(ID_FIELD, "")) {
            block_entity.set(ID_FIELD, id);
        }
        Ok(block_entity)
    }
}


#[test]
fn test_block_entity_ids() {
    let ctx = FixContext { from: crate::schemas::V99, to: V704 };
    let jukebox = Tree::empty_map().with(ID_FIELD, "RecordPlayer").with("Record", 2256i32);
    let fixed = BlockEntityIdFix.fix(jukebox, &ctx).unwrap();
    assert_eq!(fixed.get_str_or(ID_FIELD, ""), "minecraft:jukebox");
    assert_eq!(fixed.get_i32_or("Record", 0), 2256);

    let unknown = Tree::empty_map().with(ID_FIELD, "Mystery");
    assert_eq!(BlockEntityIdFix.fix(unknown.clone(), &ctx).unwrap(), unknown);
}
