//! Block entities of the chunk being upgraded, indexed by position.

use data_tree::Tree;
use std::collections::HashMap;


// fields every block entity has which carry no block state
const POSITION_FIELDS: [&'static str; 4] = ["id", "x", "y", "z"];


/// Insertion-ordered block entities keyed by column local position
/// `y << 8 | z << 4 | x`, where x and z are relative to the chunk.
#[derive(Debug, Default)]
pub struct Overlays {
    entries: Vec<Option<Tree>>,
    index: HashMap<i32, usize>,
}

impl Overlays {
    /// Index block entities of the chunk whose minimum block coordinates are
    /// `block_x` and `block_z`. A later entry at the same position replaces
    /// an earlier one in place.
    pub fn read(list: Vec<Tree>, block_x: i32, block_z: i32) -> Self {
        let mut overlays = Overlays::default();
        for entry in list {
            if !entry.is_map() {
                warn!(kind = entry.kind_name(), "dropping block entity which is not a map");
                continue;
            }
            let x = entry.get_i32_or("x", 0).wrapping_sub(block_x) & 15;
            let y = entry.get_i32_or("y", 0);
            let z = entry.get_i32_or("z", 0).wrapping_sub(block_z) & 15;
            let key = y.wrapping_shl(8) | z << 4 | x;
            if overlays.insert(key, entry) {
                warn!(
                    chunk_x = block_x >> 4,
                    chunk_z = block_z >> 4,
                    x, y, z,
                    "found a duplicate block entity",
                );
            }
        }
        overlays
    }

    /// Insert, returning whether this replaced an entry.
    pub fn insert(&mut self, key: i32, entry: Tree) -> bool {
        match self.index.get(&key) {
            Some(&i) => {
                self.entries[i] = Some(entry);
                true
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(Some(entry));
                false
            }
        }
    }

    pub fn get(&self, key: i32) -> Option<&Tree> {
        self.index.get(&key).and_then(|&i| self.entries[i].as_ref())
    }

    pub fn remove(&mut self, key: i32) -> Option<Tree> {
        self.index.remove(&key).and_then(|i| self.entries[i].take())
    }

    /// Remove the given state-bearing fields from the entry at `key` now that
    /// its block state carries them. Drops the entry entirely if nothing but
    /// its id and position remain.
    pub fn fold(&mut self, key: i32, fields: &[&str]) {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => return,
        };
        let exhausted = match self.entries[i].as_mut() {
            Some(entry) => {
                for field in fields {
                    entry.remove(field);
                }
                entry.as_map()
                    .map(|map| map.keys().all(|k| POSITION_FIELDS.contains(&k.as_str())))
                    .unwrap_or(true)
            }
            None => false,
        };
        if exhausted {
            self.remove(key);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Remaining entries in insertion order.
    pub fn into_list(self) -> Vec<Tree> {
        self.entries.into_iter().flatten().collect()
    }
}
