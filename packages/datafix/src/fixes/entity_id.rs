use super::renamed;
use crate::{
    error::Result,
    fixer::{
        Fixer,
        FixContext,
    },
    schemas::V705,
    type_ref::{
        FixTarget,
        TypeRef,
        ID_FIELD,
    },
    version::SchemaVersion,
};
use data_tree::Tree;


/// Legacy entity id to namespaced id.
pub const ENTITY_IDS: &'static [(&'static str, &'static str)] = &[
    ("AreaEffectCloud", "minecraft:area_effect_cloud"),
    ("ArmorStand", "minecraft:armor_stand"),
    ("Arrow", "minecraft:arrow"),
    ("Bat", "minecraft:bat"),
    ("Blaze", "minecraft:blaze"),
    ("Boat", "minecraft:boat"),
    ("CaveSpider", "minecraft:cave_spider"),
    ("Chicken", "minecraft:chicken"),
    ("Cow", "minecraft:cow"),
    ("Creeper", "minecraft:creeper"),
    ("DragonFireball", "minecraft:dragon_fireball"),
    ("EnderCrystal", "minecraft:ender_crystal"),
    ("EnderDragon", "minecraft:ender_dragon"),
    ("Enderman", "minecraft:enderman"),
    ("Endermite", "minecraft:endermite"),
    ("EntityHorse", "minecraft:horse"),
    ("EyeOfEnderSignal", "minecraft:eye_of_ender_signal"),
    ("FallingSand", "minecraft:falling_block"),
    ("Fireball", "minecraft:fireball"),
    ("FireworksRocketEntity", "minecraft:fireworks_rocket"),
    ("Ghast", "minecraft:ghast"),
    ("Giant", "minecraft:giant"),
    ("Guardian", "minecraft:guardian"),
    ("Item", "minecraft:item"),
    ("ItemFrame", "minecraft:item_frame"),
    ("LavaSlime", "minecraft:magma_cube"),
    ("LeashKnot", "minecraft:leash_knot"),
    ("MinecartChest", "minecraft:chest_minecart"),
    ("MinecartCommandBlock", "minecraft:commandblock_minecart"),
    ("MinecartFurnace", "minecraft:furnace_minecart"),
    ("MinecartHopper", "minecraft:hopper_minecart"),
    ("MinecartRideable", "minecraft:minecart"),
    ("MinecartSpawner", "minecraft:spawner_minecart"),
    ("MinecartTNT", "minecraft:tnt_minecart"),
    ("MushroomCow", "minecraft:mooshroom"),
    ("Ozelot", "minecraft:ocelot"),
    ("Painting", "minecraft:painting"),
    ("Pig", "minecraft:pig"),
    ("PigZombie", "minecraft:zombie_pigman"),
    ("PolarBear", "minecraft:polar_bear"),
    ("PrimedTnt", "minecraft:tnt"),
    ("Rabbit", "minecraft:rabbit"),
    ("Sheep", "minecraft:sheep"),
    ("Shulker", "minecraft:shulker"),
    ("ShulkerBullet", "minecraft:shulker_bullet"),
    ("Silverfish", "minecraft:silverfish"),
    ("Skeleton", "minecraft:skeleton"),
    ("Slime", "minecraft:slime"),
    ("SmallFireball", "minecraft:small_fireball"),
    ("SnowMan", "minecraft:snowman"),
    ("Snowball", "minecraft:snowball"),
    ("SpectralArrow", "minecraft:spectral_arrow"),
    ("Spider", "minecraft:spider"),
    ("Squid", "minecraft:squid"),
    ("Stray", "minecraft:stray"),
    ("ThrownEgg", "minecraft:egg"),
    ("ThrownEnderpearl", "minecraft:ender_pearl"),
    ("ThrownExpBottle", "minecraft:xp_bottle"),
    ("ThrownPotion", "minecraft:potion"),
    ("Villager", "minecraft:villager"),
    ("VillagerGolem", "minecraft:villager_golem"),
    ("Witch", "minecraft:witch"),
    ("WitherBoss", "minecraft:wither"),
    ("WitherSkeleton", "minecraft:wither_skeleton"),
    ("WitherSkull", "minecraft:wither_skull"),
    ("Wolf", "minecraft:wolf"),
    ("XPOrb", "minecraft:xp_orb"),
    ("Zombie", "minecraft:zombie"),
];


/// Entity ids become namespaced.
#[derive(Debug)]
pub struct EntityIdFix;

impl Fixer for EntityIdFix {
    fn name(&self) -> &'static str {
        "EntityIdFix"
    }

    fn version(&self) -> SchemaVersion {
        V705
    }

    fn target(&self) -> FixTarget {
        FixTarget::all(TypeRef::Entity)
    }

    fn fix(&self, mut entity: Tree, _: &FixContext) -> Result<Tree> {
        if let Some(id) = renamed(ENTITY_IDS, entity.get_str_or(ID_FIELD, "")) {
            entity.set(ID_FIELD, id);
        }
        Ok(entity)
    }
}


#[test]
fn test_entity_ids() {
    let ctx = FixContext { from: crate::schemas::V99, to: V705 };
    let fixed = EntityIdFix.fix(Tree::empty_map().with(ID_FIELD, "LavaSlime"), &ctx).unwrap();
    assert_eq!(fixed.get_str_or(ID_FIELD, ""), "minecraft:magma_cube");
    let fixed = EntityIdFix.fix(Tree::empty_map(), &ctx).unwrap();
    assert_eq!(fixed, Tree::empty_map());
}
