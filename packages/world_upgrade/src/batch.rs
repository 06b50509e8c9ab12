//! Upgrading a directory of record files on a pool of worker threads.
//!
//! Each file holds one record: `*.json` files are serde JSON, anything else
//! uses the binary tree codec. Upgraded records are written under the same
//! file name in the output directory, and only once fully migrated.

use crate::settings::{
    OnFailure,
    UpgradeSettings,
};
use data_tree::{
    Tree,
    codec,
};
use datafix::{
    Envelope,
    Registry,
    SchemaVersion,
    TypeRef,
};
use crossbeam_channel::{
    Receiver,
    Sender,
    unbounded,
};
use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
    sync::Arc,
    thread,
};
use anyhow::{
    Context,
    Result,
    bail,
};


/// How a record file is encoded, by its extension.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RecordFormat {
    Json,
    Binary,
}

impl RecordFormat {
    pub fn of_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => RecordFormat::Json,
            _ => RecordFormat::Binary,
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<Tree> {
        Ok(match self {
            RecordFormat::Json => serde_json::from_slice(bytes)?,
            RecordFormat::Binary => codec::decode(bytes)?,
        })
    }

    pub fn encode(self, tree: &Tree, pretty: bool) -> Result<Vec<u8>> {
        Ok(match self {
            RecordFormat::Json if pretty => serde_json::to_vec_pretty(tree)?,
            RecordFormat::Json => serde_json::to_vec(tree)?,
            RecordFormat::Binary => codec::encode(tree)?,
        })
    }
}


/// What became of one record.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Outcome {
    Upgraded,
    /// Already at the target version, written unchanged.
    Current,
    Failed,
}

/// Outcome counts of a batch.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Summary {
    pub upgraded: usize,
    pub current: usize,
    pub failed: usize,
}

impl Summary {
    fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Upgraded => self.upgraded += 1,
            Outcome::Current => self.current += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}


/// Upgrades record files of one type. Cheap to clone, workers share the
/// registry.
#[derive(Debug, Clone)]
pub struct Batch {
    registry: Arc<Registry>,
    envelope: Envelope,
    type_ref: TypeRef,
    on_failure: OnFailure,
    pretty: bool,
    threads: usize,
}

impl Batch {
    pub fn new(registry: Arc<Registry>, settings: &UpgradeSettings, type_ref: TypeRef) -> Self {
        Batch {
            registry,
            envelope: settings.envelope(),
            type_ref,
            on_failure: settings.on_failure,
            pretty: settings.pretty,
            threads: settings.threads(),
        }
    }

    /// Upgrade every file directly within `input`, writing results to
    /// `output`, which is created if missing.
    pub fn run(&self, input: &Path, output: &Path) -> Result<Summary> {
        fs::create_dir_all(output)
            .with_context(|| format!("unable to create {}", output.display()))?;
        let mut files = Vec::new();
        for entry in fs::read_dir(input)
            .with_context(|| format!("unable to list {}", input.display()))?
        {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        info!(
            files = files.len(),
            threads = self.threads,
            type_ref = %self.type_ref,
            target = %self.envelope.target_version(&self.registry),
            "upgrading records",
        );

        let (job_send, job_recv) = unbounded();
        let (result_send, result_recv) = unbounded();
        for file in files {
            job_send.send(file)?;
        }
        drop(job_send);

        let workers = (0..self.threads)
            .map(|_| {
                let batch = self.clone();
                let job_recv = job_recv.clone();
                let result_send = result_send.clone();
                let output = output.to_owned();
                thread::spawn(move || batch.work(job_recv, result_send, &output))
            })
            .collect::<Vec<_>>();
        drop(result_send);

        let mut summary = Summary::default();
        for (path, outcome) in result_recv {
            trace!(path = %path.display(), ?outcome, "record done");
            summary.add(outcome);
        }
        for worker in workers {
            if worker.join().is_err() {
                bail!("upgrade worker panicked");
            }
        }
        info!(
            upgraded = summary.upgraded,
            current = summary.current,
            failed = summary.failed,
            "finished upgrading records",
        );
        Ok(summary)
    }

    // worker thread body, until the job channel is drained
    fn work(&self, jobs: Receiver<PathBuf>, results: Sender<(PathBuf, Outcome)>, output: &Path) {
        for path in jobs {
            let outcome = match self.upgrade_file(&path, output) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(path = %path.display(), "unable to upgrade record: {:#}", e);
                    self.handle_failure(&path, output);
                    Outcome::Failed
                }
            };
            if results.send((path, outcome)).is_err() {
                return;
            }
        }
    }

    /// Upgrade one record file into `output`.
    pub fn upgrade_file(&self, path: &Path, output: &Path) -> Result<Outcome> {
        let bytes = fs::read(path)
            .with_context(|| format!("unable to read {}", path.display()))?;
        let record = RecordFormat::of_path(path).decode(&bytes)
            .context("unable to decode record")?;
        let (upgraded, outcome) = self.upgrade_record(&record)?;
        self.write(path, output, &upgraded)?;
        Ok(outcome)
    }

    /// Upgrade a decoded record, returning the stamped copy.
    pub fn upgrade_record(&self, record: &Tree) -> Result<(Tree, Outcome)> {
        let from = SchemaVersion::of_data(self.envelope.record_version(record)?);
        let target = self.envelope.target_version(&self.registry);
        let upgraded = self.envelope.upgrade(&self.registry, record, self.type_ref)?;
        let outcome = if from == target {
            Outcome::Current
        } else {
            Outcome::Upgraded
        };
        Ok((upgraded, outcome))
    }

    fn handle_failure(&self, path: &Path, output: &Path) {
        if self.on_failure != OnFailure::WriteDefault {
            return;
        }
        let target = self.envelope.target_version(&self.registry);
        let record = Tree::empty_map()
            .with(self.envelope.version_field.as_str(), target.data_version() as i32);
        if let Err(e) = self.write(path, output, &record) {
            error!(path = %path.display(), "unable to write default record: {:#}", e);
        }
    }

    fn write(&self, path: &Path, output: &Path, record: &Tree) -> Result<()> {
        let name = path.file_name().context("record path has no file name")?;
        let bytes = RecordFormat::of_path(path).encode(record, self.pretty)?;
        let out = output.join(name);
        fs::write(&out, bytes).with_context(|| format!("unable to write {}", out.display()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use datafix::{
        default_registry,
        CURRENT_VERSION,
    };
    use std::{
        env,
        process,
    };

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("world_upgrade_{}_{}", name, process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn batch(on_failure: OnFailure) -> Batch {
        let settings = UpgradeSettings {
            threads: Some(2),
            on_failure,
            ..UpgradeSettings::default()
        };
        Batch::new(Arc::new(default_registry().unwrap()), &settings, TypeRef::Options)
    }

    fn read(path: PathBuf) -> Tree {
        RecordFormat::of_path(&path).decode(&fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn test_record_format() {
        assert_eq!(RecordFormat::of_path(Path::new("a/b.json")), RecordFormat::Json);
        assert_eq!(RecordFormat::of_path(Path::new("b.JSON")), RecordFormat::Json);
        assert_eq!(RecordFormat::of_path(Path::new("b.dat")), RecordFormat::Binary);
        assert_eq!(RecordFormat::of_path(Path::new("b")), RecordFormat::Binary);
    }

    #[test]
    fn test_run() {
        let current = CURRENT_VERSION.data_version() as i32;
        let input = temp_dir("input");
        let old = Tree::empty_map().with("lang", "en_US");
        let up_to_date = Tree::empty_map().with("lang", "en_us").with("DataVersion", current);
        let future = Tree::empty_map().with("DataVersion", current + 1);
        fs::write(input.join("old.json"), serde_json::to_vec(&old).unwrap()).unwrap();
        fs::write(input.join("current.dat"), codec::encode(&up_to_date).unwrap()).unwrap();
        fs::write(input.join("future.json"), serde_json::to_vec(&future).unwrap()).unwrap();
        fs::write(input.join("garbage.dat"), [0xffu8, 0]).unwrap();

        let output = temp_dir("skip");
        let summary = batch(OnFailure::Skip).run(&input, &output).unwrap();
        assert_eq!(summary, Summary { upgraded: 1, current: 1, failed: 2 });
        assert_eq!(read(output.join("old.json")), up_to_date);
        assert_eq!(read(output.join("current.dat")), up_to_date);
        assert!(!output.join("future.json").exists());
        assert!(!output.join("garbage.dat").exists());
        assert_eq!(read(input.join("old.json")), old);

        let output = temp_dir("default");
        let summary = batch(OnFailure::WriteDefault).run(&input, &output).unwrap();
        assert_eq!(summary.failed, 2);
        let stub = Tree::empty_map().with("DataVersion", current);
        assert_eq!(read(output.join("future.json")), stub);
        assert_eq!(read(output.join("garbage.dat")), stub);
    }
}
