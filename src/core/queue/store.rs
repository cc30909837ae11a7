//! core::queue::store
//!
//! Durable, file-backed commit queue.
//!
//! # Format
//!
//! A JSON array of [`QueueRecord`]s, pretty-printed. The file is rewritten
//! in full on every mutation (never appended to on disk), via
//! [`write_atomic`], so the on-disk and in-memory views stay in lockstep and
//! a reader never observes a half-written queue.
//!
//! # Corruption
//!
//! A queue file that exists but does not parse is reported as
//! [`QueueError::Corrupt`] and left untouched on disk. It is never treated as
//! empty: doing so would silently drop pending commits on the next save.
//!
//! # Concurrency
//!
//! The store itself has no locking. Callers that load, mutate and save hold
//! a [`QueueLock`](crate::core::lock::QueueLock) for the whole sequence.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::record::QueueRecord;
use crate::core::atomic::write_atomic;
use crate::core::paths::DevbotPaths;

/// Errors from queue persistence.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue file exists but could not be read.
    #[error("failed to read queue file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The queue file exists but is not a valid queue.
    #[error("queue file '{path}' is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// The queue file could not be replaced.
    #[error("failed to write queue file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Records could not be serialized.
    #[error("failed to serialize queue: {0}")]
    Serialize(String),
}

/// The persisted sequence of pending commit records.
///
/// # Example
///
/// ```
/// use devbot::core::queue::{QueueRecord, QueueStore};
/// use devbot::core::types::{CommitMessage, RepoPath};
///
/// let dir = tempfile::TempDir::new().unwrap();
/// let store = QueueStore::new(dir.path().join("queue.json"));
///
/// assert!(store.load().unwrap().is_empty());
///
/// let record = QueueRecord::now(
///     CommitMessage::new("fix bug").unwrap(),
///     vec![RepoPath::new("a.py").unwrap()],
/// )
/// .unwrap();
/// store.append(record.clone()).unwrap();
///
/// assert_eq!(store.load().unwrap(), vec![record]);
/// ```
#[derive(Debug, Clone)]
pub struct QueueStore {
    path: PathBuf,
}

impl QueueStore {
    /// A store backed by the file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The queue of the repository described by `paths`.
    pub fn for_repo(paths: &DevbotPaths) -> Self {
        Self::new(paths.queue_path())
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record, oldest first.
    ///
    /// # Errors
    ///
    /// - [`QueueError::Corrupt`] if the file exists but does not parse
    /// - [`QueueError::Read`] if the file exists but cannot be read
    pub fn load(&self) -> Result<Vec<QueueRecord>, QueueError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(QueueError::Corrupt {
                    path: self.path.clone(),
                    message: "not valid UTF-8".to_string(),
                })
            }
            Err(e) => {
                return Err(QueueError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|e| QueueError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Replace the whole persisted queue with `records`.
    pub fn save(&self, records: &[QueueRecord]) -> Result<(), QueueError> {
        let mut contents = serde_json::to_string_pretty(records)
            .map_err(|e| QueueError::Serialize(e.to_string()))?;
        contents.push('\n');

        write_atomic(&self.path, contents.as_bytes()).map_err(|e| QueueError::Write {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "queue saved");
        Ok(())
    }

    /// Add `record` at the back of the queue.
    ///
    /// Returns the queue length after the append.
    pub fn append(&self, record: QueueRecord) -> Result<usize, QueueError> {
        let mut records = self.load()?;
        records.push(record);
        self.save(&records)?;
        Ok(records.len())
    }
}
