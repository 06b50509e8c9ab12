
use datafix::{
    Envelope,
    envelope::DATA_VERSION_FIELD,
};
use std::{
    path::Path,
    fs::File,
    io::{
        BufReader,
        BufWriter,
    },
};
use serde::{Serialize, Deserialize};
use anyhow::*;


pub const SETTINGS_FILE_NAME: &'static str = "upgrade_settings.json";


/// What to do with a record that fails to upgrade.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum OnFailure {
    /// Log it and write nothing for it.
    Skip,
    /// Log it and write an empty record stamped with the target version.
    WriteDefault,
}

/// Batch upgrade settings.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeSettings {
    /// Worker threads. One per CPU if none.
    pub threads: Option<usize>,
    /// Data version to upgrade to. The newest known version if none.
    pub target_version: Option<u32>,
    pub version_field: String,
    pub on_failure: OnFailure,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for UpgradeSettings {
    fn default() -> Self {
        UpgradeSettings {
            threads: None,
            target_version: None,
            version_field: DATA_VERSION_FIELD.to_owned(),
            on_failure: OnFailure::Skip,
            pretty: false,
        }
    }
}

impl UpgradeSettings {
    pub fn read(path: impl AsRef<Path>) -> Self {
        Self::try_read(path).unwrap_or_default()
    }

    pub fn try_read(path: impl AsRef<Path>) -> Result<Self> {
        Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), self)?;
        Ok(())
    }

    /// Number of worker threads to actually run.
    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn envelope(&self) -> Envelope {
        Envelope {
            version_field: self.version_field.clone(),
            target_data_version: self.target_version,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        env,
        fs,
        process,
    };

    #[test]
    fn test_read_write() {
        let path = env::temp_dir()
            .join(format!("world_upgrade_settings_{}.json", process::id()));
        let settings = UpgradeSettings {
            threads: Some(3),
            target_version: Some(1451),
            on_failure: OnFailure::WriteDefault,
            ..UpgradeSettings::default()
        };
        settings.write(&path).unwrap();
        assert_eq!(UpgradeSettings::try_read(&path).unwrap(), settings);

        fs::write(&path, r#"{ "pretty": true }"#).unwrap();
        let partial = UpgradeSettings::try_read(&path).unwrap();
        assert!(partial.pretty);
        assert_eq!(partial.version_field, DATA_VERSION_FIELD);

        fs::write(&path, "not json").unwrap();
        assert!(UpgradeSettings::try_read(&path).is_err());
        assert_eq!(UpgradeSettings::read(&path), UpgradeSettings::default());
        fs::remove_file(&path).unwrap();

        assert_eq!(UpgradeSettings::read(&path), UpgradeSettings::default());
    }

    #[test]
    fn test_envelope_and_threads() {
        let settings = UpgradeSettings {
            threads: Some(0),
            target_version: Some(1125),
            version_field: "version".to_owned(),
            ..UpgradeSettings::default()
        };
        assert_eq!(settings.threads(), 1);
        let envelope = settings.envelope();
        assert_eq!(envelope.version_field, "version");
        assert_eq!(envelope.target_data_version, Some(1125));
        assert!(UpgradeSettings::default().threads() >= 1);
    }
}
