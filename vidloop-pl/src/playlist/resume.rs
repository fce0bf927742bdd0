//! Resume record persistence
//!
//! The record is one decimal integer: the index of the last movie served
//! in sequential mode. A missing record means "start from the top".

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Read/write port for the single persisted index
pub trait ResumeStore {
    /// Last stored index, or None when no record exists
    fn load(&mut self) -> Result<Option<usize>>;

    /// Overwrite the record with `index`
    fn store(&mut self, index: usize) -> Result<()>;
}

/// Plain-text file holding the decimal index
#[derive(Debug, Clone)]
pub struct FileResumeStore {
    path: PathBuf,
}

impl FileResumeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl ResumeStore for FileResumeStore {
    fn load(&mut self) -> Result<Option<usize>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };

        let index = content.trim().parse::<usize>().map_err(|e| {
            Error::Resume(format!(
                "{} holds {:?}, not an index: {}",
                self.path.display(),
                content.trim(),
                e
            ))
        })?;

        Ok(Some(index))
    }

    fn store(&mut self, index: usize) -> Result<()> {
        // Temp + rename so a power cut never leaves a half-written record
        let temp = self.temp_path();
        std::fs::write(&temp, index.to_string())?;
        std::fs::rename(&temp, &self.path)?;
        debug!(index, path = %self.path.display(), "Resume index stored");
        Ok(())
    }
}

/// Shared in-memory record
///
/// Clones share the same cell, so a test can keep one handle and hand
/// another to the sequencer.
#[derive(Debug, Clone, Default)]
pub struct MemoryResumeStore {
    inner: Arc<Mutex<MemoryRecord>>,
}

#[derive(Debug, Default)]
struct MemoryRecord {
    index: Option<usize>,
    writes: usize,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a record
    pub fn with_index(index: usize) -> Self {
        let store = Self::default();
        store.record().index = Some(index);
        store
    }

    /// Current record value
    pub fn index(&self) -> Option<usize> {
        self.record().index
    }

    /// Number of `store` calls so far
    pub fn writes(&self) -> usize {
        self.record().writes
    }

    fn record(&self) -> std::sync::MutexGuard<'_, MemoryRecord> {
        // A poisoned cell still holds a valid integer
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ResumeStore for MemoryResumeStore {
    fn load(&mut self) -> Result<Option<usize>> {
        Ok(self.record().index)
    }

    fn store(&mut self, index: usize) -> Result<()> {
        let mut record = self.record();
        record.index = Some(index);
        record.writes += 1;
        Ok(())
    }
}
