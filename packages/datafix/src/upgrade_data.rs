//! The deferred fixup table legacy chunk upgrades leave behind.
//!
//! Some legacy blocks can only be upgraded correctly by looking at their
//! neighbors, which may lie in chunks not available while a chunk record is
//! migrated. The upgrade resolves what it can from the chunk itself, and
//! records the rest in the level's `UpgradeData` field:
//!
//! - `Sides`: side mask of neighbor chunks whose shared edge still needs to be
//!   re-checked once that neighbor is loaded.
//! - `Indices`: per section y, section local indices of blocks whose
//!   neighbor-dependent properties should be recomputed by the live world.
//!
//! The world loader consumes this with `UpgradeData::resolve`.

use chunk_data::{
    Side,
    Sides,
};
use data_tree::Tree;
use std::collections::BTreeMap;


/// Field of a chunk level holding the table.
pub const UPGRADE_DATA: &'static str = "UpgradeData";


/// Pending neighbor-dependent fixups of one chunk.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct UpgradeData {
    pub sides: Sides,
    /// Section y to pending section local indices.
    pub indices: BTreeMap<i32, Vec<i32>>,
}

impl UpgradeData {
    /// Read from a chunk level. Missing or malformed parts read as empty.
    pub fn read(level: &Tree) -> Self {
        let mut upgrade_data = UpgradeData::default();
        let tree = match level.get(UPGRADE_DATA) {
            Some(tree) => tree,
            None => return upgrade_data,
        };
        upgrade_data.sides = Sides(tree.get_i32_or("Sides", 0) as u8);
        if let Some(indices) = tree.get("Indices").and_then(Tree::as_map) {
            for (key, value) in indices {
                let y = match key.parse::<i32>() {
                    Ok(y) => y,
                    Err(_) => {
                        warn!(key = %key, "skipping upgrade indices with non-numeric section key");
                        continue;
                    }
                };
                let list = value.as_int_array().map(<[i32]>::to_vec).unwrap_or_default();
                upgrade_data.indices.insert(y, list);
            }
        }
        upgrade_data
    }

    pub fn to_tree(&self) -> Tree {
        let indices = self.indices.iter()
            .map(|(y, list)| (y.to_string(), Tree::from(list.clone())))
            .collect::<BTreeMap<_, _>>();
        Tree::empty_map()
            .with("Sides", self.sides.bits() as i8)
            .with("Indices", indices)
    }

    /// Write into a chunk level, replacing any existing table.
    pub fn write(&self, level: &mut Tree) {
        level.set(UPGRADE_DATA, self.to_tree());
    }

    /// Write into a chunk level, or remove the field if nothing is pending.
    pub fn store(&self, level: &mut Tree) {
        if self.is_empty() {
            level.remove(UPGRADE_DATA);
        } else {
            self.write(level);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sides.is_empty() && self.indices.values().all(Vec::is_empty)
    }

    /// Hand pending work to the caller.
    ///
    /// Every pending index is passed to `on_index` as `(section_y, sli)`, and
    /// every pending side for which `loaded` returns true is passed to
    /// `on_side`. Exactly those entries are then cleared. Sides whose
    /// neighbor is not loaded stay pending.
    pub fn resolve<L, I, S>(&mut self, loaded: L, mut on_index: I, mut on_side: S)
    where
        L: Fn(Side) -> bool,
        I: FnMut(i32, i32),
        S: FnMut(Side),
    {
        for (&y, indices) in &self.indices {
            for &sli in indices {
                on_index(y, sli);
            }
        }
        self.indices.clear();

        for side in self.sides.iter() {
            if loaded(side) {
                on_side(side);
                self.sides.remove(side);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UpgradeData {
        let mut upgrade_data = UpgradeData::default();
        upgrade_data.sides.insert(Side::North);
        upgrade_data.sides.insert(Side::SouthWest);
        upgrade_data.indices.insert(0, vec![17, 18]);
        upgrade_data.indices.insert(3, vec![]);
        upgrade_data
    }

    #[test]
    fn test_read_write() {
        let mut level = Tree::empty_map();
        sample().write(&mut level);
        assert_eq!(
            level.get_path(&[UPGRADE_DATA, "Sides"]).and_then(Tree::as_i32),
            Some(1 | 32),
        );
        assert_eq!(
            level.get_path(&[UPGRADE_DATA, "Indices", "0"]).and_then(Tree::as_int_array),
            Some(&[17, 18][..]),
        );
        assert_eq!(UpgradeData::read(&level), sample());
        assert_eq!(UpgradeData::read(&Tree::empty_map()), UpgradeData::default());
    }

    #[test]
    fn test_resolve_clears_only_loaded_sides() {
        let mut upgrade_data = sample();
        let mut indices = Vec::new();
        let mut sides = Vec::new();
        upgrade_data.resolve(
            |side| side == Side::North,
            |y, sli| indices.push((y, sli)),
            |side| sides.push(side),
        );
        assert_eq!(indices, vec![(0, 17), (0, 18)]);
        assert_eq!(sides, vec![Side::North]);
        assert!(upgrade_data.indices.is_empty());
        assert_eq!(upgrade_data.sides, Sides::from(Side::SouthWest));
        assert!(!upgrade_data.is_empty());

        upgrade_data.resolve(|_| true, |_, _| (), |_| ());
        assert!(upgrade_data.is_empty());

        let mut level = Tree::empty_map().with(UPGRADE_DATA, Tree::empty_map());
        upgrade_data.store(&mut level);
        assert!(!level.contains_key(UPGRADE_DATA));
    }
}
