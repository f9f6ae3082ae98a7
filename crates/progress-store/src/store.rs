use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::model::ProgressRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("checkpoint io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("checkpoint encoding failure: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// JSON checkpoint on disk. Saves go through a temp file and rename so a
/// crash mid-write leaves the previous checkpoint intact.
#[derive(Clone, Debug)]
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous checkpoint, if one exists.
    pub fn load(&self) -> Result<Option<ProgressRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let record = serde_json::from_reader(reader)?;
        Ok(Some(record))
    }

    pub fn save(&self, record: &ProgressRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = self.path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer_pretty(&mut writer, record)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        debug!(
            target: "progress_store",
            path = %self.path.display(),
            completed = record.completed_count(),
            "checkpoint saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sitegauge_core_types::{AuditResult, CriterionId, SiteId};

    use super::*;

    #[test]
    fn load_missing_checkpoint_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProgressStore::new(dir.path().join("progress.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProgressStore::new(dir.path().join("progress.json"));

        let mut record = ProgressRecord::new();
        record.record(AuditResult::deterministic(
            SiteId(1),
            CriterionId(10),
            true,
            "contrast 5.2:1",
        ));
        record.record(AuditResult::not_supported(
            SiteId(1),
            CriterionId(11),
            "needs instrumentation",
        ));
        store.save(&record).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.completed_count(), 2);
        assert!(loaded.is_completed(SiteId(1), CriterionId(10)));
        assert_eq!(loaded.results.len(), 2);
        assert_eq!(loaded.results[0].details, "contrast 5.2:1");
    }

    #[test]
    fn save_replaces_previous_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProgressStore::new(dir.path().join("progress.json"));

        let mut record = ProgressRecord::new();
        record.record(AuditResult::deterministic(SiteId(1), CriterionId(1), true, "a"));
        store.save(&record).unwrap();
        record.record(AuditResult::deterministic(SiteId(1), CriterionId(2), false, "b"));
        store.save(&record).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.completed_count(), 2);
        assert!(!dir.path().join("progress.tmp").exists());
    }
}
