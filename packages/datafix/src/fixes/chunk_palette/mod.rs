//! Upgrade of legacy chunk block storage to palette storage.
//!
//! Legacy sections store a byte array of block ids plus nibble arrays of
//! auxiliary data and id extension bits. Each position is mapped through the
//! legacy block table into a per-section palette. Blocks whose state the
//! table alone cannot determine are then resolved from their neighbors and
//! from their block entities, which are folded into the block state where
//! possible. Neighbor-dependent blocks which only the live world can finish
//! are recorded in the chunk's `UpgradeData`.

mod overlays;
mod section;
mod tables;

use self::{
    overlays::Overlays,
    section::Section,
};
use crate::{
    block_state::{
        BlockState,
        air,
    },
    error::Result,
    fixer::{
        Fixer,
        FixContext,
    },
    legacy,
    schemas::V1451_1,
    type_ref::{
        FixTarget,
        TypeRef,
    },
    upgrade_data::UpgradeData,
    version::SchemaVersion,
};
use chunk_data::{
    Face,
    Sides,
    NUM_SECTIONS,
    lci_relative,
    lci_section,
    lci_to_sli,
    section_sli_to_lci,
};
use data_tree::Tree;
use std::collections::BTreeMap;


#[derive(Debug)]
pub struct ChunkPalettedStorageFix;

impl Fixer for ChunkPalettedStorageFix {
    fn name(&self) -> &'static str {
        "ChunkPalettedStorageFix"
    }

    fn version(&self) -> SchemaVersion {
        V1451_1
    }

    fn target(&self) -> FixTarget {
        FixTarget::all(TypeRef::Chunk)
    }

    fn fix(&self, mut chunk: Tree, _: &FixContext) -> Result<Tree> {
        match chunk.get("Level") {
            Some(level) if level.is_map() => match level.get("Sections") {
                Some(&Tree::List(_)) => (),
                Some(other) => {
                    debug!(kind = other.kind_name(), "passing through chunk whose sections are not a list");
                    return Ok(chunk);
                }
                None => {
                    debug!("passing through chunk without sections");
                    return Ok(chunk);
                }
            },
            _ => {
                debug!("passing through chunk without level");
                return Ok(chunk);
            }
        }
        if let Some(level) = chunk.get_mut("Level") {
            let upgrade = UpgradeChunk::read(std::mem::take(level));
            *level = upgrade.write();
        }
        Ok(chunk)
    }
}


struct UpgradeChunk {
    level: Tree,
    converted_from_alpha: bool,
    sides: Sides,
    sections: [Option<Section>; NUM_SECTIONS],
    // sections with a y outside the column, kept as read
    stray_sections: Vec<Tree>,
    overlays: Overlays,
}

impl UpgradeChunk {
    fn read(mut level: Tree) -> Self {
        let block_x = level.get_i32_or("xPos", 0) << 4;
        let block_z = level.get_i32_or("zPos", 0) << 4;

        let overlays = match level.remove("TileEntities") {
            Some(Tree::List(list)) => Overlays::read(list, block_x, block_z),
            Some(other) => {
                warn!(kind = other.kind_name(), "dropping block entities which are not a list");
                Overlays::default()
            }
            None => Overlays::default(),
        };
        let converted_from_alpha = level.get_bool_or("convertedFromAlphaFormat", false);

        let mut chunk = UpgradeChunk {
            level,
            converted_from_alpha,
            sides: Sides::NONE,
            sections: std::array::from_fn(|_| None),
            stray_sections: Vec::new(),
            overlays,
        };

        let raw_sections = match chunk.level.remove("Sections") {
            Some(Tree::List(list)) => list,
            _ => Vec::new(),
        };
        for raw in raw_sections {
            if !raw.is_map() {
                warn!(kind = raw.kind_name(), "dropping chunk section which is not a map");
                continue;
            }
            let mut section = Section::read(raw);
            let slot = match usize::try_from(section.y).ok().filter(|&y| y < NUM_SECTIONS) {
                Some(slot) => slot,
                None => {
                    warn!(y = section.y, "keeping chunk section with out of range y as is");
                    chunk.stray_sections.push(section.into_raw());
                    continue;
                }
            };
            section.upgrade(&mut chunk.sides);
            if chunk.sections[slot].is_some() {
                warn!(y = section.y, "found a duplicate chunk section, later one wins");
            }
            chunk.sections[slot] = Some(section);
        }

        for slot in 0..NUM_SECTIONS {
            let to_fix = match chunk.sections[slot].as_mut() {
                Some(section) => std::mem::take(&mut section.to_fix),
                None => continue,
            };
            for (id, slis) in to_fix {
                for sli in slis {
                    chunk.resolve(id, section_sli_to_lci(slot, sli));
                }
            }
        }

        chunk
    }

    fn block(&self, lci: Option<u16>) -> &BlockState {
        lci
            .and_then(|lci| self.sections[lci_section(lci)].as_ref()
                .map(|section| section.get(lci_to_sli(lci))))
            .unwrap_or_else(|| air())
    }

    fn set_block(&mut self, lci: u16, state: &BlockState) {
        if let Some(section) = self.sections[lci_section(lci)].as_mut() {
            section.set(lci_to_sli(lci), state);
        }
    }

    fn resolve(&mut self, id: u16, lci: u16) {
        match id {
            2 | 3 | 110 => self.resolve_snowy(lci),
            25 => self.resolve_note_block(lci),
            26 => self.resolve_bed(lci),
            64 | 71 | 193..=197 => self.resolve_door(lci),
            86 => self.resolve_pumpkin(lci),
            140 => self.resolve_flower_pot(lci),
            144 => self.resolve_skull(lci),
            175 => self.resolve_double_plant(lci),
            176 => self.resolve_banner(lci, false),
            177 => self.resolve_banner(lci, true),
            _ => (),
        }
    }

    fn resolve_snowy(&mut self, lci: u16) {
        let snowy = match tables::snowy(&self.block(Some(lci)).name) {
            Some(snowy) => snowy,
            None => return,
        };
        if tables::is_snow(&self.block(lci_relative(lci, Face::Up)).name) {
            self.set_block(lci, &snowy);
        }
    }

    fn resolve_note_block(&mut self, lci: u16) {
        if let Some(overlay) = self.overlays.remove(lci as i32) {
            let state = tables::note_block(
                overlay.get_bool_or("powered", false),
                overlay.get_i32_or("note", 0),
            );
            self.set_block(lci, &state);
        }
    }

    fn resolve_bed(&mut self, lci: u16) {
        let key = lci as i32;
        let color = match self.overlays.get(key) {
            Some(overlay) => overlay.get_i32_or("color", 0),
            None => return,
        };
        if color == 14 {
            // red is the state the block table already gave
            self.overlays.fold(key, &["color"]);
            return;
        }
        let color = match legacy::dye_color(color) {
            Some(color) => color,
            None => return,
        };
        let bed = self.block(Some(lci));
        let colored = tables::colored_bed(
            color,
            bed.property("facing"),
            bed.property("occupied"),
            bed.property("part"),
        );
        if let Some(colored) = colored {
            self.set_block(lci, &colored);
            self.overlays.fold(key, &["color"]);
        }
    }

    fn resolve_door(&mut self, lci: u16) {
        let lower = self.block(Some(lci));
        if !lower.name.ends_with("_door") || lower.property("half") != "lower" {
            return;
        }
        let upper_lci = match lci_relative(lci, Face::Up) {
            Some(upper_lci) => upper_lci,
            None => return,
        };
        let upper = self.block(Some(upper_lci));
        if upper.name != lower.name {
            return;
        }

        let facing = lower.property("facing");
        let open = lower.property("open");
        let (hinge, powered) = if self.converted_from_alpha {
            ("left", "false")
        } else {
            (upper.property("hinge"), upper.property("powered"))
        };
        let halves = tables::door(&lower.name, facing, "lower", hinge, open, powered)
            .zip(tables::door(&lower.name, facing, "upper", hinge, open, powered));
        if let Some((lower, upper)) = halves {
            self.set_block(lci, &lower);
            self.set_block(upper_lci, &upper);
        }
    }

    fn resolve_pumpkin(&mut self, lci: u16) {
        if !self.block(Some(lci)).is("minecraft:carved_pumpkin") {
            return;
        }
        let below = self.block(lci_relative(lci, Face::Down));
        if below.is("minecraft:grass_block") || below.is("minecraft:dirt") {
            self.set_block(lci, &BlockState::new("minecraft:pumpkin"));
        }
    }

    fn resolve_flower_pot(&mut self, lci: u16) {
        if let Some(overlay) = self.overlays.remove(lci as i32) {
            let key = format!(
                "{}{}",
                overlay.get_str_or("Item", ""),
                overlay.get_i32_or("Data", 0),
            );
            let state = tables::flower_pot(&key)
                .cloned()
                .unwrap_or_else(tables::empty_flower_pot);
            self.set_block(lci, &state);
        }
    }

    fn resolve_skull(&mut self, lci: u16) {
        let key = lci as i32;
        let overlay = match self.overlays.get(key) {
            Some(overlay) => overlay,
            None => return,
        };
        let skull_type = overlay.get_i32_or("SkullType", 0);
        let facing = self.block(Some(lci)).property("facing");
        let skull_key = if facing == "up" || facing == "down" {
            format!("{}{}", skull_type, overlay.get_i32_or("Rot", 0))
        } else {
            format!("{}{}", skull_type, facing)
        };
        let state = tables::skull(&skull_key).unwrap_or_else(|| tables::default_skull());
        self.set_block(lci, state);
        self.overlays.fold(key, &["SkullType", "facing", "Rot"]);
    }

    fn resolve_double_plant(&mut self, lci: u16) {
        if self.block(Some(lci)).property("half") != "upper" {
            return;
        }
        let below = self.block(lci_relative(lci, Face::Down));
        if let Some(upper) = tables::upper_plant(&below.name) {
            self.set_block(lci, &upper);
        }
    }

    fn resolve_banner(&mut self, lci: u16, wall: bool) {
        let key = lci as i32;
        let base = match self.overlays.get(key) {
            Some(overlay) => overlay.get_i32_or("Base", 0),
            None => return,
        };
        if base == 15 {
            // white is the state the block table already gave
            self.overlays.fold(key, &["Base"]);
            return;
        }
        let color = match tables::banner_color(base) {
            Some(color) => color,
            None => return,
        };
        let banner = self.block(Some(lci));
        let orientation = banner.property(if wall { "facing" } else { "rotation" });
        if let Some(colored) = tables::colored_banner(color, wall, orientation) {
            self.set_block(lci, &colored);
            self.overlays.fold(key, &["Base"]);
        }
    }

    fn write(self) -> Tree {
        let UpgradeChunk { mut level, sides, sections, stray_sections, overlays, .. } = self;

        if overlays.is_empty() {
            level.remove("TileEntities");
        } else {
            level.set("TileEntities", overlays.into_list());
        }

        let mut upgrade_data = UpgradeData {
            sides,
            indices: BTreeMap::new(),
        };
        let mut written = Vec::new();
        for mut section in sections.into_iter().flatten() {
            upgrade_data.indices.insert(section.y, std::mem::take(&mut section.update));
            written.push(section.write());
        }
        written.extend(stray_sections);

        upgrade_data.write(&mut level);
        level.set("Sections", written);
        level
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chunk_data::{
        NUM_SLIS,
        packed_words,
        palette_bits,
        slc_to_sli,
    };
    use vek::*;

    /// Legacy chunk builder for tests.
    pub struct LegacyChunk {
        sections: BTreeMap<i32, (Vec<i8>, Vec<i8>)>,
        block_entities: Vec<Tree>,
        converted: bool,
    }

    impl LegacyChunk {
        pub fn new() -> Self {
            LegacyChunk {
                sections: BTreeMap::new(),
                block_entities: Vec::new(),
                converted: false,
            }
        }

        pub fn block(mut self, x: i32, y: i32, z: i32, id: u8, data: u8) -> Self {
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

        pub fn block_entity(mut self, entity: Tree) -> Self {
            self.block_entities.push(entity);
            self
        }

        pub fn converted(mut self) -> Self {
            self.converted = true;
            self
        }

        pub fn level(self) -> Tree {
            let sections = self.sections.into_iter()
                .map(|(y, (blocks, data))| Tree::empty_map()
                    .with("Y", y as i8)
                    .with("Blocks", blocks)
                    .with("Data", data))
                .collect::<Vec<_>>();
            let mut level = Tree::empty_map()
                .with("xPos", 0i32)
                .with("zPos", 0i32)
                .with("Sections", sections)
                .with("TileEntities", self.block_entities);
            if self.converted {
                level.set("convertedFromAlphaFormat", true);
            }
            level
        }

        pub fn upgrade(self) -> Tree {
            let chunk = Tree::empty_map().with("Level", self.level());
            let ctx = FixContext { from: V1451_1, to: V1451_1 };
            let chunk = ChunkPalettedStorageFix.fix(chunk, &ctx).unwrap();
            chunk.get("Level").cloned().unwrap()
        }
    }

    fn block_at(level: &Tree, x: i32, y: i32, z: i32) -> BlockState {
        let section = level.get("Sections").unwrap()
            .as_list().unwrap()
            .iter()
            .find(|section| section.get_i32_or("Y", -1) == y >> 4)
            .unwrap();
        let palette = section.get("Palette").unwrap().as_list().unwrap();
        let words = section.get("BlockStates").unwrap().as_long_array().unwrap();
        let ids = packed_words::decode(words, palette_bits(palette.len()), NUM_SLIS);
        let sli = ((y & 15) << 8 | z << 4 | x) as usize;
        BlockState::from_tree(&palette[ids[sli] as usize])
    }

    fn overlay(id: &str, x: i32, y: i32, z: i32) -> Tree {
        Tree::empty_map()
            .with("id", id)
            .with("x", x)
            .with("y", y)
            .with("z", z)
    }

    #[test]
    fn test_passthrough() {
        let chunk = Tree::empty_map().with("Level", Tree::empty_map().with("xPos", 1i32));
        let ctx = FixContext { from: V1451_1, to: V1451_1 };
        assert_eq!(ChunkPalettedStorageFix.fix(chunk.clone(), &ctx).unwrap(), chunk);
        let chunk = Tree::empty_map().with("Level", Tree::empty_map().with("Sections", 3i32));
        assert_eq!(ChunkPalettedStorageFix.fix(chunk.clone(), &ctx).unwrap(), chunk);
        let chunk = Tree::empty_map().with("Other", 1i32);
        assert_eq!(ChunkPalettedStorageFix.fix(chunk.clone(), &ctx).unwrap(), chunk);
    }

    #[test]
    fn test_snowy() {
        let level = LegacyChunk::new()
            .block(3, 64, 3, 2, 0)
            .block(3, 65, 3, 78, 0)
            .block(4, 64, 3, 2, 0)
            .block(5, 15, 5, 110, 0)
            .block(5, 16, 5, 78, 2)
            .upgrade();
        assert_eq!(block_at(&level, 3, 64, 3), BlockState::new("minecraft:grass_block").with("snowy", "true"));
        assert_eq!(block_at(&level, 4, 64, 3), BlockState::new("minecraft:grass_block").with("snowy", "false"));
        // across a section boundary
        assert_eq!(block_at(&level, 5, 15, 5).property("snowy"), "true");
    }

    #[test]
    fn test_door() {
        let level = LegacyChunk::new()
            .block(2, 10, 2, 64, 4 | 1)
            .block(2, 11, 2, 64, 8 | 1 | 2)
            .upgrade();
        let lower = block_at(&level, 2, 10, 2);
        let upper = block_at(&level, 2, 11, 2);
        assert_eq!(lower.property("half"), "lower");
        assert_eq!(upper.property("half"), "upper");
        for property in ["facing", "hinge", "open", "powered"] {
            assert_eq!(lower.property(property), upper.property(property));
        }
        assert_eq!(lower.property("facing"), "south");
        assert_eq!(lower.property("open"), "true");
        assert_eq!(lower.property("hinge"), "right");
        assert_eq!(lower.property("powered"), "true");

        let level = LegacyChunk::new()
            .block(2, 10, 2, 71, 0)
            .block(2, 11, 2, 71, 8 | 1 | 2)
            .converted()
            .upgrade();
        assert_eq!(block_at(&level, 2, 11, 2).property("hinge"), "left");
        assert_eq!(block_at(&level, 2, 11, 2).property("powered"), "false");
    }

    #[test]
    fn test_note_block_and_banner() {
        let level = LegacyChunk::new()
            .block(1, 1, 1, 25, 0)
            .block(2, 1, 1, 176, 4)
            .block(3, 1, 1, 177, 5)
            .block_entity(overlay("minecraft:noteblock", 1, 1, 1)
                .with("powered", 1i8)
                .with("note", 12i8))
            .block_entity(overlay("minecraft:banner", 2, 1, 1).with("Base", 3i32))
            .block_entity(overlay("minecraft:banner", 3, 1, 1)
                .with("Base", 0i32)
                .with("Patterns", vec![Tree::empty_map().with("Color", 1i32)]))
            .upgrade();
        assert_eq!(
            block_at(&level, 1, 1, 1),
            BlockState::new("minecraft:note_block").with("note", "12").with("powered", "true"),
        );
        assert_eq!(
            block_at(&level, 2, 1, 1),
            BlockState::new("minecraft:brown_banner").with("rotation", "4"),
        );
        assert_eq!(
            block_at(&level, 3, 1, 1),
            BlockState::new("minecraft:black_wall_banner").with("facing", "east"),
        );
        let remaining = level.get("TileEntities").unwrap().as_list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].contains_key("Patterns"));
        assert!(!remaining[0].contains_key("Base"));
    }

    #[test]
    fn test_overlays_removed_when_empty() {
        let level = LegacyChunk::new()
            .block(1, 1, 1, 140, 0)
            .block(2, 1, 1, 26, 8)
            .block_entity(overlay("minecraft:flower_pot", 1, 1, 1)
                .with("Item", "minecraft:red_flower")
                .with("Data", 2i32))
            .block_entity(overlay("minecraft:bed", 2, 1, 1).with("color", 11i32))
            .upgrade();
        assert_eq!(block_at(&level, 1, 1, 1).name, "minecraft:potted_allium");
        assert_eq!(block_at(&level, 2, 1, 1).name, "minecraft:blue_bed");
        assert_eq!(block_at(&level, 2, 1, 1).property("part"), "head");
        assert!(!level.contains_key("TileEntities"));
    }

    #[test]
    fn test_occupied_foot_bed_untouched() {
        let level = LegacyChunk::new()
            .block(2, 1, 1, 26, 4)
            .block_entity(overlay("minecraft:bed", 2, 1, 1).with("color", 11i32))
            .upgrade();
        assert_eq!(block_at(&level, 2, 1, 1).name, "minecraft:red_bed");
        let remaining = level.get("TileEntities").unwrap().as_list().unwrap();
        assert_eq!(remaining[0].get_i32_or("color", -1), 11);
    }

    #[test]
    fn test_skull() {
        let level = LegacyChunk::new()
            .block(1, 1, 1, 144, 1)
            .block(2, 1, 1, 144, 4)
            .block(3, 1, 1, 144, 4)
            .block_entity(overlay("minecraft:skull", 1, 1, 1)
                .with("SkullType", 4i8)
                .with("Rot", 7i8))
            .block_entity(overlay("minecraft:skull", 2, 1, 1)
                .with("SkullType", 3i8)
                .with("Owner", Tree::empty_map().with("Name", "someone")))
            .block_entity(overlay("minecraft:skull", 3, 1, 1).with("SkullType", 9i8))
            .upgrade();
        assert_eq!(
            block_at(&level, 1, 1, 1),
            BlockState::new("minecraft:creeper_head").with("rotation", "7"),
        );
        assert_eq!(
            block_at(&level, 2, 1, 1),
            BlockState::new("minecraft:player_wall_head").with("facing", "west"),
        );
        assert_eq!(block_at(&level, 3, 1, 1), *tables::default_skull());
        let remaining = level.get("TileEntities").unwrap().as_list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].contains_key("Owner"));
        assert!(!remaining[0].contains_key("SkullType"));
    }

    #[test]
    fn test_pumpkin_and_double_plant() {
        let level = LegacyChunk::new()
            .block(1, 1, 1, 3, 0)
            .block(1, 2, 1, 86, 0)
            .block(2, 2, 1, 86, 0)
            .block(3, 1, 1, 175, 4)
            .block(3, 2, 1, 175, 8)
            .upgrade();
        assert_eq!(block_at(&level, 1, 2, 1).name, "minecraft:pumpkin");
        assert_eq!(block_at(&level, 2, 2, 1).name, "minecraft:carved_pumpkin");
        assert_eq!(
            block_at(&level, 3, 2, 1),
            BlockState::new("minecraft:rose_bush").with("half", "upper"),
        );
    }

    #[test]
    fn test_upgrade_data() {
        let level = LegacyChunk::new()
            .block(0, 1, 0, 54, 0)
            .block(15, 1, 7, 85, 0)
            .block(7, 20, 7, 53, 0)
            .upgrade();
        let upgrade_data = UpgradeData::read(&level);
        assert_eq!(upgrade_data.sides.bits(), 128 | 4);
        assert_eq!(upgrade_data.indices.get(&0), Some(&vec![]));
        let interior = slc_to_sli(Vec3::new(7, 4, 7)) as i32;
        assert_eq!(upgrade_data.indices.get(&1), Some(&vec![interior]));
    }

    #[test]
    fn test_section_y_policy() {
        let mut level = LegacyChunk::new().block(1, 1, 1, 1, 0).level();
        let sections = level.get_mut("Sections").unwrap().as_list_mut().unwrap();
        let stray = Tree::empty_map().with("Y", -1i8).with("Blocks", vec![1i8; NUM_SLIS]);
        sections.push(stray.clone());
        let duplicate = Tree::empty_map().with("Y", 0i8).with("Blocks", vec![4i8; NUM_SLIS]);
        sections.push(duplicate);

        let chunk = Tree::empty_map().with("Level", level);
        let ctx = FixContext { from: V1451_1, to: V1451_1 };
        let chunk = ChunkPalettedStorageFix.fix(chunk, &ctx).unwrap();
        let level = chunk.get("Level").unwrap();
        let sections = level.get("Sections").unwrap().as_list().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1], stray);
        assert_eq!(block_at(level, 1, 1, 1).name, "minecraft:cobblestone");
    }
}
