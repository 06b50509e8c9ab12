//! Versioned migration of persisted world records.
//!
//! ## versions, schemas
//!
//! Every stored record is stamped with the data version it was written at. A
//! `Schema` describes the shape of records at one `SchemaVersion`: in
//! particular, which `id` choices the tagged record types have. Schemas form
//! a chain, each derived from the one before.
//!
//! ## fixers
//!
//! A `Fixer` is a named transformation registered at the version it migrates
//! records into, targeting one `TypeRef` (optionally narrowed to one choice).
//! `Registry::migrate` applies every fixer between a record's version and the
//! target version in order, to every occurrence of the fixer's target type
//! within the record, children before parents.
//!
//! ## chunks
//!
//! The largest fixer upgrades legacy chunk block storage, a byte of block id
//! and a nibble of data per block, to palette storage. Neighbor-dependent
//! blocks it cannot finish are left for the world loader in `UpgradeData`.

#[macro_use]
extern crate tracing;

pub mod error;
pub mod version;
pub mod type_ref;
pub mod schema;
pub mod fixer;
pub mod walker;
pub mod registry;
pub mod block_state;
pub mod legacy;
pub mod upgrade_data;
pub mod schemas;
pub mod fixes;
pub mod envelope;


pub use crate::{
    error::{
        Error,
        ErrorKind,
        Result,
    },
    version::{
        SchemaVersion,
        DEFAULT_DATA_VERSION,
    },
    type_ref::{
        TypeRef,
        FixTarget,
    },
    schema::Schema,
    fixer::{
        Fixer,
        FixContext,
    },
    registry::{
        Registry,
        RegistryBuilder,
    },
    block_state::BlockState,
    upgrade_data::UpgradeData,
    schemas::CURRENT_VERSION,
    envelope::Envelope,
};


/// Registry of every schema and fixer of the world format.
pub fn default_registry() -> Result<Registry> {
    let mut builder = RegistryBuilder::new();
    schemas::register_schemas(&mut builder);
    fixes::register_all(&mut builder);
    builder.build()
}


#[test]
fn test_default_registry_builds() {
    let registry = default_registry().unwrap();
    assert_eq!(registry.current_version(), CURRENT_VERSION);
    let names = registry.fixers().map(|fixer| fixer.name()).collect::<Vec<_>>();
    assert_eq!(names.first(), Some(&"EntitySkeletonSplitFix"));
    assert_eq!(names.last(), Some(&"BitStorageAlignFix"));
    let versions = registry.fixers().map(|fixer| fixer.version()).collect::<Vec<_>>();
    assert!(versions.windows(2).all(|w| w[0] <= w[1]));
}
