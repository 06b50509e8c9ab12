
use data_tree::Tree;
use std::fmt::{self, Formatter, Display};


/// Field holding the discriminant of a tagged record type.
pub const ID_FIELD: &'static str = "id";


/// Which shape of record something is.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TypeRef {
    Chunk,
    /// Tagged by `id`.
    BlockEntity,
    /// Tagged by `id`.
    Entity,
    ItemStack,
    Player,
    Options,
}

pub const TYPE_REFS: [TypeRef; 6] = [
    TypeRef::Chunk,
    TypeRef::BlockEntity,
    TypeRef::Entity,
    TypeRef::ItemStack,
    TypeRef::Player,
    TypeRef::Options,
];

impl TypeRef {
    pub fn name(self) -> &'static str {
        match self {
            TypeRef::Chunk => "chunk",
            TypeRef::BlockEntity => "block_entity",
            TypeRef::Entity => "entity",
            TypeRef::ItemStack => "item_stack",
            TypeRef::Player => "player",
            TypeRef::Options => "options",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        TYPE_REFS.into_iter().find(|type_ref| type_ref.name() == name)
    }

    /// Whether records of this type are a tagged union of choices,
    /// discriminated by their `id` field.
    pub fn is_tagged(self) -> bool {
        matches!(self, TypeRef::BlockEntity | TypeRef::Entity)
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}


/// What a fixer applies to: a type, optionally narrowed to one choice of a
/// tagged type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FixTarget {
    pub type_ref: TypeRef,
    pub choice: Option<&'static str>,
}

impl FixTarget {
    /// Every record of a type.
    pub const fn all(type_ref: TypeRef) -> Self {
        FixTarget { type_ref, choice: None }
    }

    /// Records of a tagged type whose `id` is `choice`.
    pub const fn choice(type_ref: TypeRef, choice: &'static str) -> Self {
        FixTarget { type_ref, choice: Some(choice) }
    }

    /// Whether a record of the target type matches the choice, if any.
    pub fn matches(&self, tree: &Tree) -> bool {
        match self.choice {
            Some(choice) => tree.get_str_or(ID_FIELD, "") == choice,
            None => true,
        }
    }
}

impl Display for FixTarget {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.choice {
            Some(choice) => write!(f, "{}:{}", self.type_ref, choice),
            None => write!(f, "{}", self.type_ref),
        }
    }
}


#[test]
fn test_type_ref_names() {
    for type_ref in TYPE_REFS {
        assert_eq!(TypeRef::from_name(type_ref.name()), Some(type_ref));
    }
    assert_eq!(TypeRef::from_name("bogus"), None);
}

#[test]
fn test_fix_target_matches() {
    let target = FixTarget::choice(TypeRef::BlockEntity, "minecraft:jukebox");
    assert!(target.matches(&Tree::empty_map().with("id", "minecraft:jukebox")));
    assert!(!target.matches(&Tree::empty_map().with("id", "minecraft:chest")));
    assert!(!target.matches(&Tree::empty_map()));
    assert!(FixTarget::all(TypeRef::BlockEntity).matches(&Tree::empty_map()));
    assert_eq!(target.to_string(), "block_entity:minecraft:jukebox");
}
