//! Records as they are stored: stamped with the data version they were
//! written at.

use crate::{
    error::{
        Result,
        bail,
        ensure,
    },
    registry::Registry,
    type_ref::TypeRef,
    version::{
        SchemaVersion,
        DEFAULT_DATA_VERSION,
    },
};
use data_tree::Tree;


/// Field stored records carry their data version in.
pub const DATA_VERSION_FIELD: &'static str = "DataVersion";


/// How stored records are stamped, and what version to upgrade them to.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Field holding the data version.
    pub version_field: String,
    /// Data version to upgrade to. The registry's current version if none.
    pub target_data_version: Option<u32>,
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope {
            version_field: DATA_VERSION_FIELD.to_owned(),
            target_data_version: None,
        }
    }
}

impl Envelope {
    /// Data version a record is stamped with, or `DEFAULT_DATA_VERSION` if it
    /// carries none.
    pub fn record_version(&self, record: &Tree) -> Result<u32> {
        let field = match record.get(&self.version_field) {
            Some(field) => field,
            None => return Ok(DEFAULT_DATA_VERSION),
        };
        match field.as_i32() {
            Some(version) if version >= 0 => Ok(version as u32),
            Some(version) => bail!(MalformedData, None, "negative data version {}", version),
            None => bail!(
                MalformedData, None,
                "{} is a {}, not an integer", self.version_field, field.kind_name(),
            ),
        }
    }

    /// Version records are upgraded to.
    pub fn target_version(&self, registry: &Registry) -> SchemaVersion {
        self.target_data_version
            .map(SchemaVersion::of_data)
            .unwrap_or_else(|| registry.current_version())
    }

    /// Upgrade a copy of a stored record of type `type_ref` to the target
    /// version and stamp it. The record itself is never modified, and the
    /// copy is only stamped once every fixer succeeded.
    pub fn upgrade(&self, registry: &Registry, record: &Tree, type_ref: TypeRef) -> Result<Tree> {
        let target = self.target_version(registry);
        let from = SchemaVersion::of_data(self.record_version(record)?);
        ensure!(
            from <= registry.current_version(),
            VersionOrder, None,
            "{} record is from data version {}, newer than current version {}",
            type_ref, from, registry.current_version(),
        );
        ensure!(
            from <= target,
            VersionOrder, None,
            "{} record is from data version {}, newer than target version {}",
            type_ref, from, target,
        );

        let mut upgraded = registry.migrate(record.clone(), type_ref, from, target)?;
        if !upgraded.is_map() {
            bail!(MalformedData, None, "{} record is a {}, not a map", type_ref, upgraded.kind_name());
        }
        upgraded.set(self.version_field.as_str(), target.data_version() as i32);
        Ok(upgraded)
    }
}

/// Upgrade a copy of a stored record to the registry's current version,
/// with the version in the `DataVersion` field.
pub fn upgrade(registry: &Registry, record: &Tree, type_ref: TypeRef) -> Result<Tree> {
    Envelope::default().upgrade(registry, record, type_ref)
}
