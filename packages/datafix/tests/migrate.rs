//! End to end migration of stored records through the whole fixer chain.

use chunk_data::{
    NUM_SLIS,
    Side,
    packed_words,
    palette_bits,
};
use data_tree::Tree;
use datafix::{
    BlockState,
    Envelope,
    ErrorKind,
    FixContext,
    FixTarget,
    Fixer,
    Registry,
    RegistryBuilder,
    Result,
    SchemaVersion,
    TypeRef,
    UpgradeData,
    CURRENT_VERSION,
    default_registry,
    envelope,
    schemas,
};
use std::collections::BTreeMap;


/// Builds pre-flattening chunk records.
struct LegacyChunk {
    sections: BTreeMap<i32, (Vec<i8>, Vec<i8>)>,
    block_entities: Vec<Tree>,
    entities: Vec<Tree>,
}

impl LegacyChunk {
    fn new() -> Self {
        LegacyChunk {
            sections: BTreeMap::new(),
            block_entities: Vec::new(),
            entities: Vec::new(),
        }
    }

    fn block(mut self, x: i32, y: i32, z: i32, id: u8, data: u8) -> Self {
        let (blocks, nibbles) = self.sections.entry(y >> 4)
            .or_insert_with(|| (vec![0; NUM_SLIS], vec![0; NUM_SLIS / 2]));
        let sli = ((y & 15) << 8 | z << 4 | x) as usize;
        blocks[sli] = id as i8;
        let byte = nibbles[sli >> 1] as u8;
        nibbles[sli >> 1] = if sli & 1 == 0 {
            (byte & 0xf0 | data) as i8
        } else {
            (byte & 0x0f | data << 4) as i8
        };
        self
    }

    fn block_entity(mut self, id: &str, x: i32, y: i32, z: i32, fields: &[(&str, Tree)]) -> Self {
        let mut entity = Tree::empty_map()
            .with("id", id)
            .with("x", x)
            .with("y", y)
            .with("z", z);
        for (key, value) in fields {
            entity.set(*key, value.clone());
        }
        self.block_entities.push(entity);
        self
    }

    fn entity(mut self, entity: Tree) -> Self {
        self.entities.push(entity);
        self
    }

    fn build(self) -> Tree {
        let sections = self.sections.into_iter()
            .map(|(y, (blocks, data))| Tree::empty_map()
                .with("Y", y as i8)
                .with("Blocks", blocks)
                .with("Data", data))
            .collect::<Vec<_>>();
        Tree::empty_map().with("Level", Tree::empty_map()
            .with("xPos", 0i32)
            .with("zPos", 0i32)
            .with("Sections", sections)
            .with("TileEntities", self.block_entities)
            .with("Entities", self.entities))
    }
}

fn upgrade(chunk: &Tree) -> Tree {
    let registry = default_registry().unwrap();
    envelope::upgrade(&registry, chunk, TypeRef::Chunk).unwrap()
}

fn upgrade_to(chunk: &Tree, data_version: u32) -> Tree {
    let registry = default_registry().unwrap();
    let envelope = Envelope {
        target_data_version: Some(data_version),
        ..Envelope::default()
    };
    envelope.upgrade(&registry, chunk, TypeRef::Chunk).unwrap()
}

fn section(chunk: &Tree, y: i32) -> &Tree {
    chunk.get_path(&["Level", "Sections"]).unwrap()
        .as_list().unwrap()
        .iter()
        .find(|section| section.get_i32_or("Y", -1) == y)
        .unwrap()
}

/// Palette and per-block palette ids of a section, with the width inferred
/// from the array length.
fn decode(section: &Tree) -> (Vec<BlockState>, Vec<u32>, u32) {
    let palette = section.get("Palette").unwrap().as_list().unwrap()
        .iter()
        .map(BlockState::from_tree)
        .collect::<Vec<_>>();
    let words = section.get("BlockStates").unwrap().as_long_array().unwrap();
    let bits = (words.len() * 64 / NUM_SLIS) as u32;
    let ids = packed_words::decode(words, bits, NUM_SLIS);
    (palette, ids, bits)
}

fn block_at(chunk: &Tree, x: i32, y: i32, z: i32) -> BlockState {
    let (palette, ids, _) = decode(section(chunk, y >> 4));
    let sli = ((y & 15) << 8 | z << 4 | x) as usize;
    palette[ids[sli] as usize].clone()
}


#[test]
fn migrating_to_own_version_is_identity() {
    let registry = default_registry().unwrap();
    let chunk = LegacyChunk::new().block(1, 1, 1, 2, 0).build();
    for version in [schemas::V99, schemas::V1451_1, CURRENT_VERSION] {
        let migrated = registry.migrate(chunk.clone(), TypeRef::Chunk, version, version).unwrap();
        assert_eq!(migrated, chunk);
    }
}

#[test]
fn grass_under_snow_is_snowy() {
    let chunk = LegacyChunk::new()
        .block(3, 64, 3, 2, 0)
        .block(3, 65, 3, 78, 0)
        .block(8, 64, 8, 2, 0)
        .build();
    let upgraded = upgrade(&chunk);
    assert_eq!(upgraded.get_i32_or("DataVersion", 0), CURRENT_VERSION.data_version() as i32);
    assert_eq!(block_at(&upgraded, 3, 64, 3).property("snowy"), "true");
    assert_eq!(block_at(&upgraded, 8, 64, 8).property("snowy"), "false");
    assert_eq!(block_at(&upgraded, 3, 65, 3).name, "minecraft:snow");
}

#[test]
fn door_halves_agree() {
    let chunk = LegacyChunk::new()
        .block(7, 30, 7, 64, 1)
        .block(7, 31, 7, 64, 8 | 1)
        .build();
    let upgraded = upgrade(&chunk);
    let lower = block_at(&upgraded, 7, 30, 7);
    let upper = block_at(&upgraded, 7, 31, 7);
    assert_eq!(lower.name, "minecraft:oak_door");
    assert_eq!(upper.name, "minecraft:oak_door");
    for property in ["facing", "hinge", "open", "powered"] {
        assert_eq!(lower.property(property), upper.property(property), "{}", property);
    }
    assert_eq!(upper.property("facing"), "south");
    assert_eq!(upper.property("hinge"), "right");
}

#[test]
fn five_bit_sections_are_realigned_to_eight() {
    const IDS: [u8; 20] = [1, 4, 7, 12, 13, 14, 15, 16, 19, 20, 21, 22, 24, 41, 42, 45, 46, 47, 48, 49];
    let mut chunk = LegacyChunk::new();
    for (i, &id) in IDS.iter().enumerate() {
        let i = i as i32;
        chunk = chunk.block(i % 16, 2, i / 16, id, 0);
    }
    let chunk = chunk.build();

    let before = upgrade_to(&chunk, 2526);
    let (palette_before, ids_before, bits_before) = decode(section(&before, 0));
    assert_eq!(palette_before.len(), 21);
    assert_eq!(bits_before, palette_bits(21));
    assert_eq!(bits_before, 5);

    let after = upgrade(&chunk);
    let (palette_after, ids_after, bits_after) = decode(section(&after, 0));
    assert_eq!(bits_after, 8);
    assert_eq!(palette_after, palette_before);
    assert_eq!(ids_after, ids_before);
}

#[test]
fn note_block_and_banner_overlays_are_folded() {
    let chunk = LegacyChunk::new()
        .block(1, 10, 1, 25, 0)
        .block(2, 10, 1, 176, 8)
        .block_entity("Music", 1, 10, 1, &[
            ("note", Tree::from(12i8)),
            ("powered", Tree::from(1i8)),
        ])
        .block_entity("Banner", 2, 10, 1, &[("Base", Tree::from(3i32))])
        .build();
    let upgraded = upgrade(&chunk);
    assert_eq!(
        block_at(&upgraded, 1, 10, 1),
        BlockState::new("minecraft:note_block").with("note", "12").with("powered", "true"),
    );
    assert_eq!(
        block_at(&upgraded, 2, 10, 1),
        BlockState::new("minecraft:brown_banner").with("rotation", "8"),
    );
    assert!(!upgraded.get("Level").unwrap().contains_key("TileEntities"));
}

#[test]
fn banner_patterns_survive_in_wool_order() {
    let pattern = Tree::empty_map().with("Pattern", "bs").with("Color", 1i32);
    let chunk = LegacyChunk::new()
        .block(2, 10, 1, 177, 3)
        .block_entity("Banner", 2, 10, 1, &[
            ("Base", Tree::from(0i32)),
            ("Patterns", Tree::from(vec![pattern])),
        ])
        .build();
    let upgraded = upgrade(&chunk);
    assert_eq!(
        block_at(&upgraded, 2, 10, 1),
        BlockState::new("minecraft:black_wall_banner").with("facing", "south"),
    );
    let banners = upgraded.get_path(&["Level", "TileEntities"]).unwrap().as_list().unwrap();
    assert_eq!(banners.len(), 1);
    assert_eq!(banners[0].get_str_or("id", ""), "minecraft:banner");
    assert!(!banners[0].contains_key("Base"));
    let color = banners[0].get("Patterns").unwrap().as_list().unwrap()[0].get_i32_or("Color", -1);
    assert_eq!(color, 14);
}

#[test]
fn beds_get_block_entities_then_fold_them() {
    let chunk = LegacyChunk::new()
        .block(4, 20, 4, 26, 0)
        .block(4, 20, 5, 26, 8)
        .build();

    let injected = upgrade_to(&chunk, 1125);
    let beds = injected.get_path(&["Level", "TileEntities"]).unwrap().as_list().unwrap();
    assert_eq!(beds.len(), 2);
    assert!(beds.iter().all(|bed| bed.get_str_or("id", "") == "minecraft:bed"));
    assert!(beds.iter().all(|bed| bed.get_i32_or("color", -1) == 14));

    let upgraded = upgrade(&chunk);
    assert_eq!(block_at(&upgraded, 4, 20, 4).name, "minecraft:red_bed");
    assert_eq!(block_at(&upgraded, 4, 20, 5).property("part"), "head");
    assert!(!upgraded.get("Level").unwrap().contains_key("TileEntities"));
}

#[test]
fn leaves_learn_distance_to_logs() {
    let mut chunk = LegacyChunk::new();
    for y in 60..64 {
        chunk = chunk.block(8, y, 8, 17, 0);
    }
    for x in 9..12 {
        chunk = chunk.block(x, 63, 8, 18, 0);
    }
    chunk = chunk.block(8, 64, 8, 18, 4);
    let upgraded = upgrade(&chunk.build());

    assert_eq!(block_at(&upgraded, 8, 62, 8).name, "minecraft:oak_log");
    for (x, distance) in [(9, "1"), (10, "2"), (11, "3")] {
        let leaves = block_at(&upgraded, x, 63, 8);
        assert_eq!(leaves.name, "minecraft:oak_leaves");
        assert_eq!(leaves.property("distance"), distance);
        assert_eq!(leaves.property("persistent"), "false");
    }
    let top = block_at(&upgraded, 8, 64, 8);
    assert_eq!(top.property("distance"), "1");
    assert_eq!(top.property("persistent"), "true");
}

#[test]
fn flowing_liquids_and_melons_are_renamed() {
    let chunk = LegacyChunk::new()
        .block(1, 1, 1, 8, 0)
        .block(2, 1, 1, 103, 0)
        .build();
    let upgraded = upgrade(&chunk);
    assert_eq!(block_at(&upgraded, 1, 1, 1).name, "minecraft:water");
    assert_eq!(block_at(&upgraded, 2, 1, 1).name, "minecraft:melon");
}

#[test]
fn nested_entities_and_items_are_fixed() {
    let skeleton = Tree::empty_map()
        .with("id", "Skeleton")
        .with("SkeletonType", 1i8)
        .with("HandItems", vec![
            Tree::empty_map().with("id", "minecraft:melon").with("Count", 2i8),
            Tree::empty_map().with("id", "minecraft:totem").with("Count", 1i8),
        ])
        .with("Passengers", vec![Tree::empty_map().with("id", "LavaSlime")]);
    let chunk = LegacyChunk::new()
        .block(5, 5, 5, 84, 0)
        .block_entity("RecordPlayer", 5, 5, 5, &[("Record", Tree::from(2258i32))])
        .entity(skeleton)
        .build();
    let upgraded = upgrade(&chunk);

    let entity = &upgraded.get_path(&["Level", "Entities"]).unwrap().as_list().unwrap()[0];
    assert_eq!(entity.get_str_or("id", ""), "minecraft:wither_skeleton");
    assert!(!entity.contains_key("SkeletonType"));
    let items = entity.get("HandItems").unwrap().as_list().unwrap();
    assert_eq!(items[0].get_str_or("id", ""), "minecraft:melon_slice");
    assert_eq!(items[1].get_str_or("id", ""), "minecraft:totem_of_undying");
    assert_eq!(
        entity.get_path(&["Passengers"]).unwrap().as_list().unwrap()[0].get_str_or("id", ""),
        "minecraft:magma_cube",
    );

    let jukebox = &upgraded.get_path(&["Level", "TileEntities"]).unwrap().as_list().unwrap()[0];
    assert_eq!(jukebox.get_str_or("id", ""), "minecraft:jukebox");
    assert!(!jukebox.contains_key("Record"));
    assert_eq!(
        jukebox.get_path(&["RecordItem", "id"]).and_then(Tree::as_str),
        Some("minecraft:music_disc_blocks"),
    );
}

#[test]
fn upgrade_data_defers_neighbor_dependent_blocks() {
    let chunk = LegacyChunk::new()
        .block(0, 3, 5, 54, 2)
        .block(5, 70, 5, 53, 0)
        .build();
    let upgraded = upgrade(&chunk);
    let level = upgraded.get("Level").unwrap();
    let mut upgrade_data = UpgradeData::read(level);
    assert_eq!(upgrade_data.sides.bits(), Side::West.mask());
    let stair_sli = (70 & 15) << 8 | 5 << 4 | 5;
    assert_eq!(upgrade_data.indices.get(&4), Some(&vec![stair_sli]));

    let mut pending = Vec::new();
    let mut sides = Vec::new();
    upgrade_data.resolve(
        |side| side != Side::West,
        |y, sli| pending.push((y, sli)),
        |side| sides.push(side),
    );
    assert_eq!(pending, vec![(4, stair_sli)]);
    assert!(sides.is_empty());
    assert_eq!(upgrade_data.sides.bits(), Side::West.mask());

    upgrade_data.resolve(|_| true, |_, _| (), |side| sides.push(side));
    assert_eq!(sides, vec![Side::West]);
    assert!(upgrade_data.is_empty());
}

#[test]
fn future_records_are_refused() {
    let registry = default_registry().unwrap();
    let record = Tree::empty_map().with("DataVersion", (CURRENT_VERSION.data_version() + 1) as i32);
    let e = envelope::upgrade(&registry, &record, TypeRef::Chunk).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::VersionOrder);
}

#[test]
fn failed_migration_leaves_record_untouched() {
    #[derive(Debug)]
    struct Broken;

    impl Fixer for Broken {
        fn name(&self) -> &'static str {
            "Broken"
        }

        fn version(&self) -> SchemaVersion {
            SchemaVersion::of_data(2)
        }

        fn target(&self) -> FixTarget {
            FixTarget::choice(TypeRef::Entity, "Pig")
        }

        fn fix(&self, tree: Tree, _: &FixContext) -> Result<Tree> {
            Ok(tree.with("id", "Cow"))
        }
    }

    let mut builder = RegistryBuilder::new();
    builder
        .add_schema(SchemaVersion::of_data(1), |schema| {
            schema.register_choices(TypeRef::Entity, &["Pig", "Cow"]);
        })
        .add_schema(SchemaVersion::of_data(2), |_| ())
        .add_fixer(Broken);
    let registry: Registry = builder.build().unwrap();

    let envelope = Envelope::default();
    let pig = Tree::empty_map().with("id", "Pig").with("DataVersion", 1i32);
    let e = envelope.upgrade(&registry, &pig, TypeRef::Entity).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::SchemaMismatch);
    assert_eq!(e.fixer(), Some("Broken"));
    assert_eq!(pig.get_str_or("id", ""), "Pig");
}

#[test]
fn registry_rejects_fixers_of_unknown_choices() {
    #[derive(Debug)]
    struct Unicorns;

    impl Fixer for Unicorns {
        fn name(&self) -> &'static str {
            "Unicorns"
        }

        fn version(&self) -> SchemaVersion {
            schemas::V705
        }

        fn target(&self) -> FixTarget {
            FixTarget::choice(TypeRef::Entity, "Unicorn")
        }

        fn fix(&self, tree: Tree, _: &FixContext) -> Result<Tree> {
            Ok(tree)
        }
    }

    let mut builder = RegistryBuilder::new();
    schemas::register_schemas(&mut builder);
    builder.add_fixer(Unicorns);
    let e = builder.build().unwrap_err();
    assert_eq!(e.kind(), ErrorKind::SchemaMismatch);
    assert_eq!(e.fixer(), Some("Unicorns"));
}
