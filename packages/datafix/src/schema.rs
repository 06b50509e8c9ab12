//! Schemas: which choices each tagged type has at some version.

use crate::{
    type_ref::TypeRef,
    version::SchemaVersion,
};
use std::collections::{
    BTreeMap,
    BTreeSet,
};


/// The shape of records at one schema version.
///
/// Only the tagged types carry information beyond their existence: the set of
/// `id` strings a record of that type may have at this version. A schema is
/// derived from its parent by editing that set.
#[derive(Debug, Clone)]
pub struct Schema {
    version: SchemaVersion,
    choices: BTreeMap<TypeRef, BTreeSet<String>>,
}

impl Schema {
    pub(crate) fn new(version: SchemaVersion) -> Self {
        Schema {
            version,
            choices: BTreeMap::new(),
        }
    }

    /// Derive a child schema, identical to this one until edited.
    pub(crate) fn derive(&self, version: SchemaVersion) -> Self {
        Schema {
            version,
            choices: self.choices.clone(),
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn register_choice(&mut self, type_ref: TypeRef, id: &str) {
        debug_assert!(type_ref.is_tagged(), "{} is not a tagged type", type_ref);
        self.choices.entry(type_ref).or_default().insert(id.to_owned());
    }

    pub fn register_choices(&mut self, type_ref: TypeRef, ids: &[&str]) {
        for id in ids {
            self.register_choice(type_ref, id);
        }
    }

    pub fn remove_choice(&mut self, type_ref: TypeRef, id: &str) -> bool {
        self.choices.get_mut(&type_ref)
            .map(|ids| ids.remove(id))
            .unwrap_or(false)
    }

    /// Replace each `old` choice with its `new` name. Pairs whose old
    /// choice is absent are ignored.
    pub fn rename_choices(&mut self, type_ref: TypeRef, renames: &[(&str, &str)]) {
        for &(old, new) in renames {
            if self.remove_choice(type_ref, old) {
                self.register_choice(type_ref, new);
            }
        }
    }

    pub fn has_choice(&self, type_ref: TypeRef, id: &str) -> bool {
        self.choices.get(&type_ref)
            .map(|ids| ids.contains(id))
            .unwrap_or(false)
    }

    /// Choices of a tagged type, in sorted order.
    pub fn choices(&self, type_ref: TypeRef) -> impl Iterator<Item=&str> + '_ {
        self.choices.get(&type_ref)
            .into_iter()
            .flat_map(|ids| ids.iter().map(String::as_str))
    }
}


#[test]
fn test_schema_derive() {
    let mut parent = Schema::new(SchemaVersion::of_data(99));
    parent.register_choices(TypeRef::BlockEntity, &["Chest", "Furnace"]);

    let mut child = parent.derive(SchemaVersion::of_data(704));
    child.rename_choices(TypeRef::BlockEntity, &[
        ("Chest", "minecraft:chest"),
        ("Missing", "minecraft:missing"),
    ]);

    assert!(parent.has_choice(TypeRef::BlockEntity, "Chest"));
    assert!(!child.has_choice(TypeRef::BlockEntity, "Chest"));
    assert!(child.has_choice(TypeRef::BlockEntity, "minecraft:chest"));
    assert!(!child.has_choice(TypeRef::BlockEntity, "minecraft:missing"));
    assert_eq!(
        child.choices(TypeRef::BlockEntity).collect::<Vec<_>>(),
        vec!["Furnace", "minecraft:chest"],
    );
    assert_eq!(child.choices(TypeRef::Entity).count(), 0);
}
