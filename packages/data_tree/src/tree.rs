//! The tree value all persisted records are made of.
//!
//! Chunks, entities, item stacks and option blobs are all just a `Tree`.
//! Field access is done with plain visitor methods (`get`, `set`, `update`,
//! `map_list`, ...) which treat a missing field or a node of the wrong kind
//! the same way: as absent. Callers pick the default.

use crate::number::Number;
use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};


/// Recursive, dynamically typed record value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tree {
    Number(Number),
    String(String),
    List(Vec<Tree>),
    Map(BTreeMap<String, Tree>),
    ByteArray(Vec<i8>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tree {
    /// Construct an empty map.
    pub fn empty_map() -> Self {
        Tree::Map(BTreeMap::new())
    }

    /// Name of this node's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            &Tree::Number(_) => "number",
            &Tree::String(_) => "string",
            &Tree::List(_) => "list",
            &Tree::Map(_) => "map",
            &Tree::ByteArray(_) => "byte array",
            &Tree::IntArray(_) => "int array",
            &Tree::LongArray(_) => "long array",
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Tree::Map(_))
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Tree>> {
        match self {
            &Tree::Map(ref map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, Tree>> {
        match self {
            &mut Tree::Map(ref mut map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tree]> {
        match self {
            &Tree::List(ref list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Tree>> {
        match self {
            &mut Tree::List(ref mut list) => Some(list),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            &Tree::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            &Tree::String(ref s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.as_number().map(Number::as_i32)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_number().map(Number::as_bool)
    }

    pub fn as_byte_array(&self) -> Option<&[i8]> {
        match self {
            &Tree::ByteArray(ref bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            &Tree::IntArray(ref ints) => Some(ints),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            &Tree::LongArray(ref longs) => Some(longs),
            _ => None,
        }
    }

    /// Get a field of this map. `None` if absent or if this is not a map.
    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.as_map().and_then(|map| map.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tree> {
        self.as_map_mut().and_then(|map| map.get_mut(key))
    }

    /// Follow a path of map keys.
    pub fn get_path(&self, path: &[&str]) -> Option<&Tree> {
        let mut curr = self;
        for key in path {
            curr = curr.get(key)?;
        }
        Some(curr)
    }

    pub fn get_path_mut(&mut self, path: &[&str]) -> Option<&mut Tree> {
        let mut curr = self;
        for key in path {
            curr = curr.get_mut(key)?;
        }
        Some(curr)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Integer field, or `default` if absent or not a number.
    pub fn get_i32_or(&self, key: &str, default: i32) -> i32 {
        self.get(key).and_then(Tree::as_i32).unwrap_or(default)
    }

    /// String field, or `default` if absent or not a string.
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Tree::as_str).unwrap_or(default)
    }

    /// Boolean field (a non-zero number), or `default` if absent or not a
    /// number.
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Tree::as_bool).unwrap_or(default)
    }

    /// Set a field of this map, returning the previous value.
    ///
    /// Has no effect if this is not a map.
    pub fn set<K, V>(&mut self, key: K, value: V) -> Option<Tree>
    where
        K: Into<String>,
        V: Into<Tree>,
    {
        self.as_map_mut().and_then(|map| map.insert(key.into(), value.into()))
    }

    /// Builder-style `set`.
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Tree>,
    {
        self.set(key, value);
        self
    }

    /// Remove a field of this map, returning it.
    pub fn remove(&mut self, key: &str) -> Option<Tree> {
        self.as_map_mut().and_then(|map| map.remove(key))
    }

    /// Replace a field with a function of its current value, if present.
    /// Returns whether the field was present.
    pub fn update<F>(&mut self, key: &str, f: F) -> bool
    where
        F: FnOnce(Tree) -> Tree,
    {
        match self.remove(key) {
            Some(value) => {
                self.set(key, f(value));
                true
            }
            None => false,
        }
    }

    /// Replace every element of a list field with a function of itself, if
    /// the field is present and is a list.
    pub fn map_list<F>(&mut self, key: &str, f: F)
    where
        F: FnMut(Tree) -> Tree,
    {
        if let Some(list) = self.get_mut(key).and_then(Tree::as_list_mut) {
            let elems = std::mem::take(list);
            *list = elems.into_iter().map(f).collect();
        }
    }

    /// Get a map field, inserting an empty map if it is absent or not a map.
    ///
    /// `None` only if this itself is not a map.
    pub fn map_entry(&mut self, key: &str) -> Option<&mut Tree> {
        let map = self.as_map_mut()?;
        let field = map.entry(key.to_owned()).or_insert_with(Tree::empty_map);
        if !field.is_map() {
            *field = Tree::empty_map();
        }
        Some(field)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::empty_map()
    }
}

impl From<Number> for Tree {
    fn from(n: Number) -> Self {
        Tree::Number(n)
    }
}

macro_rules! from_number {
    ($($t:ty),*)=>{$(
        impl From<$t> for Tree {
            fn from(n: $t) -> Self {
                Tree::Number(Number::from(n))
            }
        }
    )*};
}

from_number!(i8, i16, i32, i64, f32, f64, bool);

impl From<String> for Tree {
    fn from(s: String) -> Self {
        Tree::String(s)
    }
}

impl<'a> From<&'a str> for Tree {
    fn from(s: &'a str) -> Self {
        Tree::String(s.to_owned())
    }
}

impl From<Vec<Tree>> for Tree {
    fn from(list: Vec<Tree>) -> Self {
        Tree::List(list)
    }
}

impl From<BTreeMap<String, Tree>> for Tree {
    fn from(map: BTreeMap<String, Tree>) -> Self {
        Tree::Map(map)
    }
}

impl From<Vec<i8>> for Tree {
    fn from(bytes: Vec<i8>) -> Self {
        Tree::ByteArray(bytes)
    }
}

impl From<Vec<i32>> for Tree {
    fn from(ints: Vec<i32>) -> Self {
        Tree::IntArray(ints)
    }
}

impl From<Vec<i64>> for Tree {
    fn from(longs: Vec<i64>) -> Self {
        Tree::LongArray(longs)
    }
}


#[test]
fn test_field_access_defaults() {
    let tree = Tree::empty_map()
        .with("x", 5i32)
        .with("name", "minecraft:stone")
        .with("flag", 1i8)
        .with("list", vec![Tree::from(1i32)]);
    assert_eq!(tree.get_i32_or("x", 0), 5);
    assert_eq!(tree.get_i32_or("missing", 9), 9);
    assert_eq!(tree.get_i32_or("name", 9), 9);
    assert_eq!(tree.get_str_or("name", ""), "minecraft:stone");
    assert_eq!(tree.get_str_or("x", "none"), "none");
    assert!(tree.get_bool_or("flag", false));
    assert!(Tree::from(3i32).get("x").is_none());
}

#[test]
fn test_set_on_non_map_is_noop() {
    let mut tree = Tree::from("leaf");
    assert!(tree.set("x", 1i32).is_none());
    assert_eq!(tree, Tree::from("leaf"));
}

#[test]
fn test_update_and_map_list() {
    let mut tree = Tree::empty_map()
        .with("n", 1i32)
        .with("items", vec![Tree::from(1i32), Tree::from(2i32)]);
    assert!(tree.update("n", |n| Tree::from(n.as_i32().unwrap() + 1)));
    assert!(!tree.update("absent", |n| n));
    tree.map_list("items", |n| Tree::from(n.as_i32().unwrap() * 10));
    assert_eq!(tree.get_i32_or("n", 0), 2);
    assert_eq!(
        tree.get("items").unwrap().as_list().unwrap(),
        &[Tree::from(10i32), Tree::from(20i32)],
    );
    assert!(!tree.contains_key("absent"));
}

#[test]
fn test_paths_and_map_entry() {
    let mut tree = Tree::empty_map()
        .with("Level", Tree::empty_map().with("xPos", 3i32).with("bad", 1i8));
    assert_eq!(tree.get_path(&["Level", "xPos"]), Some(&Tree::from(3i32)));
    assert!(tree.get_path(&["Level", "xPos", "deeper"]).is_none());
    tree.get_path_mut(&["Level"]).unwrap().set("zPos", 4i32);
    assert_eq!(tree.get_path(&["Level", "zPos"]).and_then(Tree::as_i32), Some(4));

    let level = tree.get_mut("Level").unwrap();
    level.map_entry("Upgrade").unwrap().set("Sides", 1i8);
    level.map_entry("bad").unwrap();
    assert_eq!(level.get_path(&["Upgrade", "Sides"]), Some(&Tree::from(1i8)));
    assert_eq!(level.get("bad"), Some(&Tree::empty_map()));
}

#[test]
fn test_json_representation() {
    let tree = Tree::empty_map()
        .with("DataVersion", 1343i32)
        .with("BlockStates", vec![1i64, -1]);
    let json = serde_json::to_string(&tree).unwrap();
    let tree2: Tree = serde_json::from_str(&json).unwrap();
    assert_eq!(tree, tree2);
}
