
use crate::packed::palette_bits;
use std::{
    collections::HashMap,
    hash::Hash,
};


/// Append-only, deduplicating mapping from values to small integer ids.
///
/// Ids are assigned in insertion order starting at 0 and are never reused or
/// compacted. A palette read back from storage may contain duplicate entries,
/// in which case lookup by value finds the first one.
#[derive(Debug, Clone)]
pub struct Palette<T> {
    entries: Vec<T>,
    ids: HashMap<T, u32>,
}

impl<T: Hash + Eq + Clone> Palette<T> {
    pub fn new() -> Self {
        Palette {
            entries: Vec::new(),
            ids: HashMap::new(),
        }
    }

    /// Construct with a default value, which gets id 0.
    pub fn with_default(default: T) -> Self {
        let mut palette = Self::new();
        palette.push(default);
        palette
    }

    /// Construct from stored entries, keeping their order and any duplicates.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item=T>,
    {
        let mut palette = Self::new();
        for entry in entries {
            palette.push(entry);
        }
        palette
    }

    /// Id of the value, inserting it if not already present.
    pub fn id_for(&mut self, value: &T) -> u32 {
        match self.ids.get(value) {
            Some(&id) => id,
            None => self.push(value.clone()),
        }
    }

    /// Id of the value, if present.
    pub fn get_id(&self, value: &T) -> Option<u32> {
        self.ids.get(value).copied()
    }

    /// Append a value even if equal to an existing entry. Lookup by value
    /// keeps finding the first equal entry.
    pub fn push(&mut self, value: T) -> u32 {
        let id = self.entries.len() as u32;
        self.ids.entry(value.clone()).or_insert(id);
        self.entries.push(value);
        id
    }

    /// Replace the entry at `id` in place. Panics if out of bounds.
    pub fn replace(&mut self, id: u32, value: T) {
        let old = std::mem::replace(&mut self.entries[id as usize], value.clone());
        if self.ids.get(&old) == Some(&id) {
            self.ids.remove(&old);
            // a later duplicate of the old value takes over its lookup
            if let Some(pos) = self.entries.iter().position(|entry| entry == &old) {
                self.ids.insert(old, pos as u32);
            }
        }
        let first = self.entries.iter().position(|entry| entry == &value).unwrap_or(id as usize);
        self.ids.insert(value, first as u32);
    }

    pub fn by_id(&self, id: u32) -> Option<&T> {
        self.entries.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }

    /// Bits per element of block storage indexing this palette.
    pub fn bits(&self) -> u32 {
        palette_bits(self.len())
    }
}

impl<T: Hash + Eq + Clone> Default for Palette<T> {
    fn default() -> Self {
        Palette::new()
    }
}


#[test]
fn test_palette_default_first() {
    let mut palette = Palette::with_default("air");
    assert_eq!(palette.id_for(&"stone"), 1);
    assert_eq!(palette.id_for(&"air"), 0);
    assert_eq!(palette.by_id(1), Some(&"stone"));
    assert_eq!(palette.by_id(2), None);
}

#[test]
fn test_palette_insertion_idempotent() {
    let seq = ["stone", "dirt", "stone", "grass", "dirt", "sand", "stone"];
    let mut palette = Palette::with_default("air");
    let first = seq.iter().map(|v| palette.id_for(v)).collect::<Vec<_>>();
    let second = seq.iter().map(|v| palette.id_for(v)).collect::<Vec<_>>();
    assert_eq!(first, vec![1, 2, 1, 3, 2, 4, 1]);
    assert_eq!(first, second);
    assert_eq!(palette.len(), 5);

    let mut fresh = Palette::with_default("air");
    let third = seq.iter().map(|v| fresh.id_for(v)).collect::<Vec<_>>();
    assert_eq!(first, third);
}

#[test]
fn test_palette_duplicates_and_replace() {
    let mut palette = Palette::from_entries(["air", "leaves", "air", "log"]);
    assert_eq!(palette.len(), 4);
    assert_eq!(palette.get_id(&"air"), Some(0));
    palette.replace(0, "stone");
    assert_eq!(palette.get_id(&"air"), Some(2));
    assert_eq!(palette.get_id(&"stone"), Some(0));
    palette.replace(1, "log");
    assert_eq!(palette.get_id(&"log"), Some(1));
    assert_eq!(palette.get_id(&"leaves"), None);
    assert_eq!(palette.bits(), 4);
}
