//! In-memory artifact registry with time-based eviction

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::RegistryConfig;

/// Metadata for one registered artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    /// Full path of the artifact file on disk
    pub path: PathBuf,

    /// Bare file name, suitable for a download disposition header
    pub file_name: String,

    /// When the artifact was registered; compared against retention
    pub created_at: SystemTime,

    /// Number of documents in the batch that produced the artifact
    pub document_count: usize,
}

impl ArtifactRecord {
    /// Describe an artifact
    ///
    /// `created_at` is stamped by the registry on insert; a value set
    /// here is not kept.
    pub fn new(path: PathBuf, file_name: impl Into<String>, document_count: usize) -> Self {
        Self {
            path,
            file_name: file_name.into(),
            created_at: SystemTime::now(),
            document_count,
        }
    }
}

/// Registry of downloadable artifacts, keyed by run id
///
/// Entries expire after the configured retention and eviction removes
/// both the map entry and the backing file. Expiry is enforced lazily on
/// lookup and eagerly by [`sweep`](ArtifactRegistry::sweep); lookups
/// never extend an entry's lifetime.
pub struct ArtifactRegistry<C: Clock = SystemClock> {
    records: Mutex<HashMap<String, ArtifactRecord>>,
    retention: Duration,
    clock: C,
}

impl ArtifactRegistry<SystemClock> {
    /// Create a registry on the system clock
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> ArtifactRegistry<C> {
    /// Create a registry reading time from `clock`
    pub fn with_clock(config: RegistryConfig, clock: C) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            retention: config.retention(),
            clock,
        }
    }

    /// Register an artifact under its run id
    ///
    /// Stamps `created_at` with the registry's clock. An existing entry
    /// under the same id is replaced.
    pub fn insert(&self, run_id: impl Into<String>, mut record: ArtifactRecord) {
        let run_id = run_id.into();
        record.created_at = self.clock.now();

        debug!("Registered artifact {} for run {}", record.file_name, run_id);
        self.records.lock().unwrap().insert(run_id, record);
    }

    /// Look up an artifact by run id
    ///
    /// Returns `None` for unknown ids. An entry found expired is
    /// evicted on the spot: the map entry is removed, the backing file
    /// deleted best-effort, and `None` returned.
    pub fn resolve(&self, run_id: &str) -> Option<ArtifactRecord> {
        let now = self.clock.now();
        let mut records = self.records.lock().unwrap();

        let expired = match records.get(run_id) {
            Some(record) => is_expired(record, now, self.retention),
            None => return None,
        };

        if expired {
            let record = records.remove(run_id);
            drop(records);

            if let Some(record) = record {
                debug!("Run {} expired on lookup; evicting", run_id);
                remove_artifact_file(&record);
            }
            return None;
        }

        records.get(run_id).cloned()
    }

    /// Remove an entry and delete its backing file
    ///
    /// Returns whether an entry existed.
    pub fn evict(&self, run_id: &str) -> bool {
        let record = self.records.lock().unwrap().remove(run_id);

        match record {
            Some(record) => {
                debug!("Evicted run {}", run_id);
                remove_artifact_file(&record);
                true
            }
            None => false,
        }
    }

    /// Evict every expired entry
    ///
    /// Returns the number of entries evicted. File deletion happens
    /// after the map lock is released.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();

        let expired: Vec<(String, ArtifactRecord)> = {
            let mut records = self.records.lock().unwrap();
            let keys: Vec<String> = records
                .iter()
                .filter(|(_, record)| is_expired(record, now, self.retention))
                .map(|(run_id, _)| run_id.clone())
                .collect();

            keys.into_iter()
                .filter_map(|run_id| records.remove(&run_id).map(|record| (run_id, record)))
                .collect()
        };

        for (run_id, record) in &expired {
            debug!("Swept expired run {}", run_id);
            remove_artifact_file(record);
        }

        expired.len()
    }

    /// Number of registered entries, expired ones included
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Whether the registry has no entries
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

/// An entry is expired once its age reaches the retention window.
/// A clock that moved backwards reads as not expired.
fn is_expired(record: &ArtifactRecord, now: SystemTime, retention: Duration) -> bool {
    match now.duration_since(record.created_at) {
        Ok(age) => age >= retention,
        Err(_) => false,
    }
}

/// Delete an artifact file, logging anything other than absence
fn remove_artifact_file(record: &ArtifactRecord) {
    if let Err(e) = std::fs::remove_file(&record.path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to delete artifact {}: {}", record.path.display(), e);
        }
    }
}
