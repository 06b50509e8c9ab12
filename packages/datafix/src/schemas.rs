//! The schema chain of the world format.

use crate::{
    fixes::{
        block_entity_id::BLOCK_ENTITY_IDS,
        entity_id::ENTITY_IDS,
        entity_skeleton_split::SPLIT_SKELETONS,
    },
    registry::RegistryBuilder,
    type_ref::TypeRef,
    version::{
        SchemaVersion,
        DEFAULT_DATA_VERSION,
    },
};


pub const V99: SchemaVersion = SchemaVersion::of_data(DEFAULT_DATA_VERSION);
pub const V701: SchemaVersion = SchemaVersion::of_data(701);
pub const V704: SchemaVersion = SchemaVersion::of_data(704);
pub const V705: SchemaVersion = SchemaVersion::of_data(705);
pub const V816: SchemaVersion = SchemaVersion::of_data(816);
pub const V820: SchemaVersion = SchemaVersion::of_data(820);
pub const V1125: SchemaVersion = SchemaVersion::of_data(1125);
pub const V1451_1: SchemaVersion = SchemaVersion::new(1451, 1);
pub const V1451_5: SchemaVersion = SchemaVersion::new(1451, 5);
pub const V1451_6: SchemaVersion = SchemaVersion::new(1451, 6);
pub const V1475: SchemaVersion = SchemaVersion::of_data(1475);
pub const V1490: SchemaVersion = SchemaVersion::of_data(1490);
pub const V1496: SchemaVersion = SchemaVersion::of_data(1496);
pub const V2527: SchemaVersion = SchemaVersion::of_data(2527);
pub const V2975: SchemaVersion = SchemaVersion::of_data(2975);

/// Newest schema version.
pub const CURRENT_VERSION: SchemaVersion = V2975;


/// Register every schema, oldest first.
pub fn register_schemas(builder: &mut RegistryBuilder) {
    builder.add_schema(V99, |schema| {
        for &(legacy, _) in BLOCK_ENTITY_IDS {
            schema.register_choice(TypeRef::BlockEntity, legacy);
        }
        for &(legacy, _) in ENTITY_IDS {
            if !SPLIT_SKELETONS.contains(&legacy) {
                schema.register_choice(TypeRef::Entity, legacy);
            }
        }
    });
    builder.add_schema(V701, |schema| {
        schema.register_choices(TypeRef::Entity, SPLIT_SKELETONS);
    });
    builder.add_schema(V704, |schema| {
        schema.rename_choices(TypeRef::BlockEntity, BLOCK_ENTITY_IDS);
    });
    builder.add_schema(V705, |schema| {
        schema.rename_choices(TypeRef::Entity, ENTITY_IDS);
    });
    builder.add_schema(V816, |_| ());
    builder.add_schema(V820, |_| ());
    builder.add_schema(V1125, |schema| {
        schema.register_choice(TypeRef::BlockEntity, "minecraft:bed");
    });
    for version in [V1451_1, V1451_5, V1451_6, V1475, V1490, V1496, V2527, V2975] {
        builder.add_schema(version, |_| ());
    }
}


#[test]
fn test_schema_chain() {
    let mut builder = RegistryBuilder::new();
    register_schemas(&mut builder);
    let registry = builder.build().unwrap();
    assert_eq!(registry.current_version(), CURRENT_VERSION);
    assert_eq!(registry.oldest_version(), V99);

    let legacy = registry.schema_at(V99).unwrap();
    assert!(legacy.has_choice(TypeRef::BlockEntity, "RecordPlayer"));
    assert!(legacy.has_choice(TypeRef::Entity, "Skeleton"));
    assert!(!legacy.has_choice(TypeRef::Entity, "Stray"));

    let current = registry.schema_at(CURRENT_VERSION).unwrap();
    assert!(current.has_choice(TypeRef::BlockEntity, "minecraft:jukebox"));
    assert!(current.has_choice(TypeRef::BlockEntity, "minecraft:bed"));
    assert!(current.has_choice(TypeRef::Entity, "minecraft:stray"));
    assert!(!current.has_choice(TypeRef::Entity, "Stray"));
    assert!(registry.schema_at(SchemaVersion::of_data(1000)).unwrap()
        .has_choice(TypeRef::Entity, "minecraft:wither_skeleton"));
}
