
use std::fmt::{self, Formatter, Display};


/// Data version assumed for a record which carries none. Older than every
/// registered schema.
pub const DEFAULT_DATA_VERSION: u32 = 99;

// sub-versions per data version
const SUB_VERSIONS: u32 = 10;


/// Position in the schema chain.
///
/// Records are stamped with a plain _data version_. Several schema steps may
/// share one data version by way of a sub-version, so the ordering key is
/// `data_version * 10 + sub_version`, and a stamped data version `v` means
/// key `v * 10`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SchemaVersion(u32);

impl SchemaVersion {
    pub const fn new(data_version: u32, sub_version: u32) -> Self {
        assert!(sub_version < SUB_VERSIONS, "sub version out of range");
        SchemaVersion(data_version * SUB_VERSIONS + sub_version)
    }

    /// The schema version a record stamped with this data version is at.
    pub const fn of_data(data_version: u32) -> Self {
        SchemaVersion::new(data_version, 0)
    }

    pub const fn from_key(key: u32) -> Self {
        SchemaVersion(key)
    }

    pub const fn key(self) -> u32 {
        self.0
    }

    pub const fn data_version(self) -> u32 {
        self.0 / SUB_VERSIONS
    }

    pub const fn sub_version(self) -> u32 {
        self.0 % SUB_VERSIONS
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.sub_version() == 0 {
            write!(f, "{}", self.data_version())
        } else {
            write!(f, "{}.{}", self.data_version(), self.sub_version())
        }
    }
}


#[test]
fn test_version_keys() {
    let v = SchemaVersion::new(1451, 1);
    assert_eq!(v.key(), 14511);
    assert_eq!(v.data_version(), 1451);
    assert_eq!(v.sub_version(), 1);
    assert_eq!(v.to_string(), "1451.1");
    assert_eq!(SchemaVersion::of_data(1451).to_string(), "1451");
    assert!(SchemaVersion::of_data(1451) < v);
    assert!(v < SchemaVersion::of_data(1452));
    assert_eq!(SchemaVersion::from_key(14515), SchemaVersion::new(1451, 5));
}
