
use data_tree::Tree;
use std::{
    collections::BTreeMap,
    sync::OnceLock,
};


pub const AIR: &'static str = "minecraft:air";

/// Name given to legacy ids which have no block state. Collapsed to air when
/// a palette is written.
pub const FILTER_ME: &'static str = "%%FILTER_ME%%";


/// A block name plus string properties, as stored in a section palette.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BlockState {
    pub name: String,
    pub properties: BTreeMap<String, String>,
}

impl BlockState {
    pub fn new<N: Into<String>>(name: N) -> Self {
        BlockState {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Property value, or `""` if absent.
    pub fn property(&self, key: &str) -> &str {
        self.properties.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Read a palette entry. Missing name reads as `""`, non-string
    /// properties are skipped.
    pub fn from_tree(tree: &Tree) -> Self {
        let mut state = BlockState::new(tree.get_str_or("Name", ""));
        if let Some(properties) = tree.get("Properties").and_then(Tree::as_map) {
            for (key, value) in properties {
                if let Some(value) = value.as_str() {
                    state.properties.insert(key.clone(), value.to_owned());
                }
            }
        }
        state
    }

    /// Write a palette entry. `Properties` is omitted when empty.
    pub fn to_tree(&self) -> Tree {
        let mut tree = Tree::empty_map().with("Name", self.name.as_str());
        if !self.properties.is_empty() {
            let properties = self.properties.iter()
                .map(|(key, value)| (key.clone(), Tree::from(value.as_str())))
                .collect::<BTreeMap<_, _>>();
            tree.set("Properties", properties);
        }
        tree
    }
}

/// Shared air state.
pub fn air() -> &'static BlockState {
    static AIR_STATE: OnceLock<BlockState> = OnceLock::new();
    AIR_STATE.get_or_init(|| BlockState::new(AIR))
}

/// Shared unknown-legacy-id sentinel state.
pub fn filter_me() -> &'static BlockState {
    static FILTER_ME_STATE: OnceLock<BlockState> = OnceLock::new();
    FILTER_ME_STATE.get_or_init(|| BlockState::new(FILTER_ME))
}


#[test]
fn test_block_state_tree() {
    let state = BlockState::new("minecraft:oak_door")
        .with("half", "lower")
        .with("open", "false");
    let tree = state.to_tree();
    assert_eq!(tree.get_str_or("Name", ""), "minecraft:oak_door");
    assert_eq!(tree.get_path(&["Properties", "half"]).and_then(Tree::as_str), Some("lower"));
    assert_eq!(BlockState::from_tree(&tree), state);

    assert!(!air().to_tree().contains_key("Properties"));
    assert_eq!(BlockState::from_tree(&Tree::empty_map()).name, "");
    assert_eq!(state.property("hinge"), "");
}
