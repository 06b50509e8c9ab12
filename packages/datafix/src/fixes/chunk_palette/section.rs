//! One section of a chunk being upgraded.

use crate::{
    block_state::{
        BlockState,
        air,
        FILTER_ME,
    },
    legacy,
};
use chunk_data::{
    NibbleArray,
    Palette,
    Sides,
    NUM_SLIS,
    sli_get_x,
    sli_get_z,
    packed_words,
};
use data_tree::Tree;


/// Legacy ids whose block state depends on more than the id and data of the
/// block itself.
pub fn needs_fix(id: u16) -> bool {
    matches!(id, 2 | 3 | 25 | 26 | 64 | 71 | 86 | 110 | 140 | 144 | 175 | 176 | 177 | 193..=197)
}

/// Legacy ids whose block state in the live world depends on neighboring
/// blocks, such as stair shape or fence connections.
pub fn is_virtual(id: u16) -> bool {
    matches!(
        id,
        25 | 26 | 51 | 53 | 54 | 55 | 67 | 85 | 93 | 94 | 101 | 102 | 106 | 107 | 108 | 109
            | 113 | 114 | 128 | 132 | 134 | 135 | 136 | 139 | 146 | 156 | 160 | 163 | 164
            | 180 | 183..=192 | 199 | 203
    )
}


#[derive(Debug)]
pub struct Section {
    pub y: i32,
    raw: Tree,
    has_data: bool,
    palette: Palette<BlockState>,
    buffer: Vec<u32>,
    /// Positions needing a resolver, per legacy id, in first seen order.
    pub to_fix: Vec<(u16, Vec<u16>)>,
    /// Positions of interior neighbor-dependent blocks.
    pub update: Vec<i32>,
}

impl Section {
    pub fn read(raw: Tree) -> Self {
        let has_data = match raw.get("Blocks") {
            Some(&Tree::ByteArray(_)) => true,
            Some(other) => {
                warn!(kind = other.kind_name(), "ignoring section Blocks which is not a byte array");
                false
            }
            None => false,
        };
        Section {
            y: raw.get_i32_or("Y", 0),
            raw,
            has_data,
            palette: Palette::new(),
            buffer: vec![0; NUM_SLIS],
            to_fix: Vec::new(),
            update: Vec::new(),
        }
    }

    /// Convert the legacy arrays to palette storage, noting positions which
    /// need resolving and OR-ing the sides of edge positions which need
    /// neighbors into `sides`.
    pub fn upgrade(&mut self, sides: &mut Sides) {
        if !self.has_data {
            return;
        }

        let mut blocks = self.raw.get("Blocks")
            .and_then(Tree::as_byte_array)
            .map(<[i8]>::to_vec)
            .unwrap_or_default();
        if blocks.len() != NUM_SLIS {
            warn!(y = self.y, len = blocks.len(), "section Blocks has wrong length");
            blocks.resize(NUM_SLIS, 0);
        }
        let data = self.nibbles("Data");
        let add = self.nibbles("Add");

        self.palette.id_for(air());

        for sli in 0..NUM_SLIS as u16 {
            let key = legacy::compose_key(add.get(sli), blocks[sli as usize] as u8, data.get(sli));
            let id = legacy::key_id(key);

            if needs_fix(id) {
                match self.to_fix.iter_mut().find(|(fix_id, _)| *fix_id == id) {
                    Some((_, slis)) => slis.push(sli),
                    None => self.to_fix.push((id, vec![sli])),
                }
            }

            if is_virtual(id) {
                let tile_sides = Sides::of_tile(sli_get_x(sli), sli_get_z(sli));
                if tile_sides.is_empty() {
                    self.update.push(sli as i32);
                } else {
                    *sides = sides.union(tile_sides);
                }
            }

            self.set(sli, legacy::lookup(key));
        }
    }

    // nibble array field, or all zero if absent or malformed
    fn nibbles(&self, field: &str) -> NibbleArray {
        match self.raw.get(field) {
            None => NibbleArray::new(),
            Some(tree) => tree.as_byte_array()
                .and_then(NibbleArray::from_bytes)
                .unwrap_or_else(|| {
                    warn!(y = self.y, field, "treating malformed section nibble array as absent");
                    NibbleArray::new()
                }),
        }
    }

    pub fn get(&self, sli: u16) -> &BlockState {
        self.buffer.get(sli as usize)
            .and_then(|&id| self.palette.by_id(id))
            .unwrap_or_else(|| air())
    }

    /// Set a position's block. No effect on sections without block data.
    pub fn set(&mut self, sli: u16, state: &BlockState) {
        if self.has_data {
            self.buffer[sli as usize] = self.palette.id_for(state);
        }
    }

    /// The upgraded section, or the original section if it had no block
    /// data.
    pub fn write(self) -> Tree {
        let Section { mut raw, has_data, palette, buffer, .. } = self;
        if !has_data {
            return raw;
        }
        let bits = palette.bits();
        let palette = palette.into_entries()
            .into_iter()
            .map(|state| if state.name == FILTER_ME {
                air().to_tree()
            } else {
                state.to_tree()
            })
            .collect::<Vec<_>>();
        raw.set("Palette", palette);
        raw.set("BlockStates", packed_words::encode(&buffer, bits));
        raw.remove("Blocks");
        raw.remove("Data");
        raw.remove("Add");
        raw
    }

    /// The section as read, discarding any upgrade.
    pub fn into_raw(self) -> Tree {
        self.raw
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chunk_data::{
        Side,
        slc_to_sli,
    };
    use vek::*;

    fn section(blocks: Vec<i8>, data: Option<Vec<i8>>) -> Tree {
        let mut tree = Tree::empty_map()
            .with("Y", 0i8)
            .with("Blocks", blocks);
        if let Some(data) = data {
            tree.set("Data", data);
        }
        tree
    }

    #[test]
    fn test_upgrade_section() {
        let mut blocks = vec![0i8; NUM_SLIS];
        let mut data = vec![0i8; NUM_SLIS / 2];
        // granite at <1,0,0>
        blocks[1] = 1;
        data[0] = 1 << 4;
        // interior chest and edge chest
        let interior = slc_to_sli(Vec3::new(5, 1, 5));
        blocks[interior as usize] = 54;
        blocks[slc_to_sli(Vec3::new(0, 1, 5)) as usize] = 54;
        // grass twice
        blocks[2] = 2;
        blocks[3] = 2;
        // unknown id
        blocks[4] = -3;

        let mut section = Section::read(section(blocks, Some(data)));
        let mut sides = Sides::NONE;
        section.upgrade(&mut sides);

        assert_eq!(sides, Sides::from(Side::West));
        assert_eq!(section.update, vec![interior as i32]);
        assert_eq!(section.to_fix, vec![(2, vec![2, 3])]);
        assert_eq!(section.get(0).name, "minecraft:air");
        assert_eq!(section.get(1).name, "minecraft:granite");
        assert_eq!(section.get(4).name, FILTER_ME);

        let tree = section.write();
        assert!(!tree.contains_key("Blocks"));
        assert!(!tree.contains_key("Data"));
        let palette = tree.get("Palette").unwrap().as_list().unwrap();
        // air, granite, grass, filter sentinel written as air, chest
        assert_eq!(palette.len(), 5);
        assert_eq!(palette[3].get_str_or("Name", ""), "minecraft:air");
        assert_eq!(palette[4].get_str_or("Name", ""), "minecraft:chest");
        let states = tree.get("BlockStates").unwrap().as_long_array().unwrap();
        assert_eq!(states.len(), 256);
        let ids = packed_words::decode(states, 4, NUM_SLIS);
        assert_eq!(&ids[0..5], &[0, 1, 2, 2, 3]);
        assert_eq!(ids[interior as usize], 4);
    }

    #[test]
    fn test_section_without_blocks() {
        let raw = Tree::empty_map().with("Y", 3i8).with("SkyLight", vec![0i8; 2048]);
        let mut section = Section::read(raw.clone());
        let mut sides = Sides::NONE;
        section.upgrade(&mut sides);
        section.set(0, air());
        assert_eq!(section.y, 3);
        assert_eq!(section.write(), raw);
    }

    #[test]
    fn test_bad_lengths() {
        let mut section = Section::read(section(vec![1i8; 10], Some(vec![0x11; 7])));
        let mut sides = Sides::NONE;
        section.upgrade(&mut sides);
        assert_eq!(section.get(9).name, "minecraft:stone");
        assert_eq!(section.get(10).name, "minecraft:air");
    }
}
