//! Leaves learn how far they are from the nearest log.
//!
//! Legacy leaves carry a `decayable` flag. Modern leaves are `persistent` or
//! not, and carry a `distance` from 1 to 7 to the nearest log, 7 meaning none
//! within reach. Distances are propagated breadth first through the chunk.
//! Leaves on a chunk edge may be closer to a log in the neighboring chunk,
//! which the live world re-checks through the `UpgradeData` side mask.

use crate::{
    block_state::BlockState,
    error::Result,
    fixer::{
        Fixer,
        FixContext,
    },
    schemas::V1496,
    type_ref::{
        FixTarget,
        TypeRef,
    },
    upgrade_data::UPGRADE_DATA,
    version::SchemaVersion,
};
use chunk_data::{
    FACES,
    NUM_SECTIONS,
    NUM_SLIS,
    PackedBitArray,
    Sides,
    lci_relative,
    lci_section,
    lci_to_sli,
    palette_bits,
    section_sli_to_lci,
    sli_get_x,
    sli_get_z,
    words_needed,
};
use data_tree::Tree;
use std::collections::HashMap;


const DECAY_DISTANCE: u8 = 7;

const LEAVES: [&'static str; 6] = [
    "minecraft:acacia_leaves",
    "minecraft:birch_leaves",
    "minecraft:dark_oak_leaves",
    "minecraft:jungle_leaves",
    "minecraft:oak_leaves",
    "minecraft:spruce_leaves",
];

const WOODS: [&'static str; 6] = ["acacia", "birch", "dark_oak", "jungle", "oak", "spruce"];

fn leaf_kind(name: &str) -> Option<u8> {
    LEAVES.iter().position(|&leaves| leaves == name).map(|i| i as u8)
}

fn is_log(name: &str) -> bool {
    let wood = match name.strip_prefix("minecraft:") {
        Some(rest) => rest.strip_prefix("stripped_").unwrap_or(rest),
        None => return false,
    };
    WOODS.iter().any(|&kind| {
        wood.strip_prefix(kind)
            .map(|suffix| suffix == "_log" || suffix == "_bark")
            .unwrap_or(false)
    })
}

fn leaf_tree(kind: u8, persistent: bool, distance: u8) -> Tree {
    BlockState::new(LEAVES[kind as usize])
        .with("persistent", if persistent { "true" } else { "false" })
        .with("distance", distance.to_string())
        .to_tree()
}


#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct Leaf {
    kind: u8,
    persistent: bool,
    distance: u8,
}

/// A section with leaves or logs.
#[derive(Debug)]
struct LeavesSection {
    palette: Vec<Tree>,
    storage: PackedBitArray,
    leaves: HashMap<u32, Leaf>,
    leaf_ids: HashMap<Leaf, u32>,
    logs: Vec<u32>,
}

impl LeavesSection {
    /// None if the section has neither leaves nor logs, or has malformed
    /// storage.
    fn read(section: &Tree) -> Option<Self> {
        let mut palette = section.get("Palette")?.as_list()?.to_vec();
        let mut leaves = HashMap::new();
        let mut leaf_ids = HashMap::new();
        let mut logs = Vec::new();
        for (i, entry) in palette.iter_mut().enumerate() {
            let state = BlockState::from_tree(entry);
            if let Some(kind) = leaf_kind(&state.name) {
                let leaf = Leaf {
                    kind,
                    persistent: state.property("decayable") == "false",
                    distance: DECAY_DISTANCE,
                };
                leaves.insert(i as u32, leaf);
                leaf_ids.insert(leaf, i as u32);
                *entry = leaf_tree(leaf.kind, leaf.persistent, leaf.distance);
            }
            if is_log(&state.name) {
                logs.push(i as u32);
            }
        }
        if leaves.is_empty() && logs.is_empty() {
            return None;
        }

        let bits = palette_bits(palette.len());
        let words = section.get("BlockStates").and_then(Tree::as_long_array).unwrap_or(&[]);
        if words.len() != words_needed(NUM_SLIS, bits) {
            warn!(
                y = section.get_i32_or("Y", 0),
                len = words.len(),
                bits,
                "skipping leaves in section with wrong BlockStates length",
            );
            return None;
        }
        Some(LeavesSection {
            palette,
            storage: PackedBitArray::from_raw(bits, NUM_SLIS, words),
            leaves,
            leaf_ids,
            logs,
        })
    }

    fn is_log(&self, id: u32) -> bool {
        self.logs.contains(&id)
    }

    fn leaf(&self, sli: u16) -> Option<Leaf> {
        self.leaves.get(&self.storage.get(sli as usize)).copied()
    }

    fn set_distance(&mut self, sli: u16, leaf: Leaf, distance: u8) {
        let leaf = Leaf { distance, ..leaf };
        let id = match self.leaf_ids.get(&leaf) {
            Some(&id) => id,
            None => {
                let id = self.palette.len() as u32;
                self.palette.push(leaf_tree(leaf.kind, leaf.persistent, leaf.distance));
                self.leaves.insert(id, leaf);
                self.leaf_ids.insert(leaf, id);
                id
            }
        };
        if 1 << self.storage.bits() <= id {
            self.storage = self.storage.repack(self.storage.bits() + 1);
        }
        self.storage.set(sli as usize, id);
    }

    fn write(self, section: &mut Tree) {
        section.set("Palette", self.palette);
        section.set("BlockStates", self.storage.into_raw());
    }
}


#[derive(Debug)]
pub struct LeavesFix;

impl Fixer for LeavesFix {
    fn name(&self) -> &'static str {
        "LeavesFix"
    }

    fn version(&self) -> SchemaVersion {
        V1496
    }

    fn target(&self) -> FixTarget {
        FixTarget::all(TypeRef::Chunk)
    }

    fn fix(&self, mut chunk: Tree, _: &FixContext) -> Result<Tree> {
        if let Some(level) = chunk.get_mut("Level") {
            fix_level(level);
        }
        Ok(chunk)
    }
}

fn fix_level(level: &mut Tree) {
    let sections = match level.get_mut("Sections").and_then(Tree::as_list_mut) {
        Some(sections) => sections,
        None => return,
    };

    // parallel to the section list
    let mut read = sections.iter()
        .map(LeavesSection::read)
        .collect::<Vec<_>>();
    if read.iter().all(Option::is_none) {
        return;
    }

    // list index of the section in each column slot
    let mut slots = [None; NUM_SECTIONS];
    for (i, section) in sections.iter().enumerate() {
        if read[i].is_none() {
            continue;
        }
        let y = section.get_i32_or("Y", 0);
        match usize::try_from(y).ok().filter(|&y| y < NUM_SECTIONS) {
            Some(slot) => {
                if slots[slot].is_some() {
                    warn!(y, "found a duplicate section while fixing leaves, later one wins");
                }
                slots[slot] = Some(i);
            }
            None => warn!(y, "not propagating leaf distance through out of range section"),
        }
    }

    let mut sides = Sides::NONE;
    let mut frontier = Vec::new();
    for section in read.iter().flatten() {
        for sli in 0..NUM_SLIS as u16 {
            if section.leaf(sli).is_some() {
                sides = sides.union(Sides::of_tile(sli_get_x(sli), sli_get_z(sli)));
            }
        }
    }
    for (slot, &i) in slots.iter().enumerate() {
        if let Some(section) = i.and_then(|i| read[i].as_ref()) {
            for sli in 0..NUM_SLIS as u16 {
                if section.is_log(section.storage.get(sli as usize)) {
                    frontier.push(section_sli_to_lci(slot, sli));
                }
            }
        }
    }

    for distance in 1..DECAY_DISTANCE {
        let mut next = Vec::new();
        for lci in frontier {
            for face in FACES {
                let neighbor = match lci_relative(lci, face) {
                    Some(neighbor) => neighbor,
                    None => continue,
                };
                let section = match slots[lci_section(neighbor)].and_then(|i| read[i].as_mut()) {
                    Some(section) => section,
                    None => continue,
                };
                let sli = lci_to_sli(neighbor);
                if let Some(leaf) = section.leaf(sli) {
                    if leaf.distance > distance {
                        section.set_distance(sli, leaf, distance);
                        next.push(neighbor);
                    }
                }
            }
        }
        frontier = next;
    }

    for (section, fixed) in sections.iter_mut().zip(read.iter_mut()) {
        if let Some(fixed) = fixed.take() {
            fixed.write(section);
        }
    }

    if !sides.is_empty() {
        if let Some(upgrade_data) = level.map_entry(UPGRADE_DATA) {
            let prior = upgrade_data.get_i32_or("Sides", 0) as u8;
            upgrade_data.set("Sides", sides.union(Sides(prior)).bits() as i8);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chunk_data::{
        Side,
        packed_words,
        slc_to_sli,
    };
    use vek::*;

    fn state(name: &str) -> Tree {
        Tree::empty_map().with("Name", name)
    }

    fn legacy_leaves(decayable: &str) -> Tree {
        Tree::empty_map()
            .with("Name", "minecraft:oak_leaves")
            .with("Properties", Tree::empty_map()
                .with("check_decay", "false")
                .with("decayable", decayable))
    }

    fn section(y: i8, palette: Vec<Tree>, ids: &[(Vec3<i32>, u32)]) -> Tree {
        let mut buffer = vec![0; NUM_SLIS];
        for &(slc, id) in ids {
            buffer[slc_to_sli(slc) as usize] = id;
        }
        let bits = palette_bits(palette.len());
        Tree::empty_map()
            .with("Y", y)
            .with("Palette", palette)
            .with("BlockStates", packed_words::encode(&buffer, bits))
    }

    fn decode(section: &Tree) -> (Vec<BlockState>, Vec<u32>) {
        let palette = section.get("Palette").unwrap().as_list().unwrap()
            .iter()
            .map(BlockState::from_tree)
            .collect::<Vec<_>>();
        let words = section.get("BlockStates").unwrap().as_long_array().unwrap();
        let bits = (words.len() * 64 / NUM_SLIS) as u32;
        let ids = packed_words::decode(words, bits, NUM_SLIS);
        (palette, ids)
    }

    fn fix(level: Tree) -> Tree {
        let ctx = FixContext { from: V1496, to: V1496 };
        let chunk = Tree::empty_map().with("Level", level);
        LeavesFix.fix(chunk, &ctx).unwrap().get("Level").cloned().unwrap()
    }

    #[test]
    fn test_log_names() {
        assert!(is_log("minecraft:oak_log"));
        assert!(is_log("minecraft:dark_oak_bark"));
        assert!(is_log("minecraft:stripped_spruce_log"));
        assert!(!is_log("minecraft:oak_leaves"));
        assert!(!is_log("minecraft:oak_planks"));
        assert!(!is_log("oak_log"));
    }

    #[test]
    fn test_distance_propagation() {
        let palette = vec![
            state("minecraft:air"),
            state("minecraft:oak_log"),
            legacy_leaves("true"),
            legacy_leaves("false"),
        ];
        // a log with a row of leaves running east, the last one persistent,
        // and a leaf in the section above
        let mut ids = vec![(Vec3::new(5, 15, 5), 1)];
        for x in 6..14 {
            ids.push((Vec3::new(x, 15, 5), 2));
        }
        ids.push((Vec3::new(14, 15, 5), 3));
        let lower = section(0, palette.clone(), &ids);
        let upper = section(1, palette, &[(Vec3::new(5, 0, 5), 2)]);
        let level = fix(Tree::empty_map().with("Sections", vec![lower, upper]));

        let sections = level.get("Sections").unwrap().as_list().unwrap();
        let (palette, ids) = decode(&sections[0]);
        let at = |x: i32| &palette[ids[slc_to_sli(Vec3::new(x, 15, 5)) as usize] as usize];
        assert_eq!(at(5).name, "minecraft:oak_log");
        for x in 6..13 {
            assert_eq!(at(x).property("distance"), ((x - 5).min(7)).to_string());
            assert_eq!(at(x).property("persistent"), "false");
        }
        assert_eq!(at(13).property("distance"), "7");
        assert_eq!(at(14).property("persistent"), "true");
        assert_eq!(at(14).property("distance"), "7");
        assert!(!at(6).properties.contains_key("decayable"));

        let (palette, ids) = decode(&sections[1]);
        let above = &palette[ids[slc_to_sli(Vec3::new(5, 0, 5)) as usize] as usize];
        assert_eq!(above.property("distance"), "1");

        // no leaves on an edge
        assert!(!level.contains_key(UPGRADE_DATA));
    }

    #[test]
    fn test_palette_growth() {
        // 16 entries fill 4 bits, so the first new distance state needs 5
        let mut palette = vec![state("minecraft:air"), state("minecraft:oak_log"), legacy_leaves("true")];
        for i in 0..13 {
            palette.push(state(&format!("minecraft:filler_{}", i)));
        }
        let tree = section(0, palette, &[
            (Vec3::new(5, 5, 5), 1),
            (Vec3::new(6, 5, 5), 2),
            (Vec3::new(7, 5, 5), 2),
        ]);
        let level = fix(Tree::empty_map().with("Sections", vec![tree]));
        let section = &level.get("Sections").unwrap().as_list().unwrap()[0];
        let (palette, ids) = decode(section);
        assert_eq!(palette.len(), 18);
        assert_eq!(section.get("BlockStates").unwrap().as_long_array().unwrap().len(), 320);
        let at = |x: i32| &palette[ids[slc_to_sli(Vec3::new(x, 5, 5)) as usize] as usize];
        assert_eq!(at(6).property("distance"), "1");
        assert_eq!(at(7).property("distance"), "2");
        assert_eq!(at(5).name, "minecraft:oak_log");
        assert_eq!(at(4).name, "minecraft:air");
    }

    #[test]
    fn test_edge_leaves_mark_sides() {
        let palette = vec![state("minecraft:air"), legacy_leaves("true")];
        let tree = section(0, palette, &[(Vec3::new(0, 3, 15), 1), (Vec3::new(15, 3, 7), 1)]);
        let level = Tree::empty_map()
            .with("Sections", vec![tree])
            .with(UPGRADE_DATA, Tree::empty_map().with("Sides", Side::North.mask() as i8));
        let level = fix(level);
        assert_eq!(
            level.get_path(&[UPGRADE_DATA, "Sides"]).and_then(Tree::as_i32),
            Some((Side::North.mask() | Side::SouthWest.mask() | Side::East.mask()) as i32),
        );
    }

    #[test]
    fn test_sections_without_trees_untouched() {
        let plain = section(0, vec![state("minecraft:air"), state("minecraft:stone")], &[]);
        let level = Tree::empty_map().with("Sections", vec![plain]);
        assert_eq!(fix(level.clone()), level);

        let malformed = section(0, vec![state("minecraft:air"), legacy_leaves("true")], &[])
            .with("BlockStates", vec![0i64; 3]);
        let level = Tree::empty_map().with("Sections", vec![malformed]);
        assert_eq!(fix(level.clone()), level);
    }
}
