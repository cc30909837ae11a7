//! core::queue::record
//!
//! One pending commit awaiting push.
//!
//! # On-disk shape
//!
//! ```json
//! {
//!   "message": "fix bug",
//!   "files": ["a.py"],
//!   "timestamp": "2025-06-01 14:03:22"
//! }
//! ```
//!
//! A record queued after its local commit already succeeded also carries
//! `"commit": "<oid>"`. Such a record is replayed by pushing only.

use serde::{Deserialize, Serialize};

use crate::core::types::{CommitMessage, Oid, QueueTimestamp, RepoPath, TypeError};

/// A persisted description of a commit that could not yet be pushed.
///
/// Records are immutable: message, files, and timestamp never change after
/// construction. [`QueueRecord::committed_as`] produces a *new* record for
/// the same intent.
///
/// # Example
///
/// ```
/// use devbot::core::queue::QueueRecord;
/// use devbot::core::types::{CommitMessage, QueueTimestamp, RepoPath};
///
/// let record = QueueRecord::new(
///     CommitMessage::new("fix bug").unwrap(),
///     vec![RepoPath::new("a.py").unwrap()],
///     QueueTimestamp::parse("2025-06-01 14:03:22").unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(record.message().as_str(), "fix bug");
/// assert!(record.local_commit().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct QueueRecord {
    message: CommitMessage,
    files: Vec<RepoPath>,
    timestamp: QueueTimestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<Oid>,
}

/// Unvalidated wire form; turned into a record by `TryFrom`.
#[derive(Deserialize)]
struct RawRecord {
    message: CommitMessage,
    files: Vec<RepoPath>,
    timestamp: QueueTimestamp,
    #[serde(default)]
    commit: Option<Oid>,
}

impl TryFrom<RawRecord> for QueueRecord {
    type Error = TypeError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let mut record = QueueRecord::new(raw.message, raw.files, raw.timestamp)?;
        record.commit = raw.commit;
        Ok(record)
    }
}

impl QueueRecord {
    /// Build a record.
    ///
    /// Duplicate paths are dropped, keeping the first occurrence, so `files`
    /// behaves as an ordered set.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::EmptyFileSet` if `files` is empty.
    pub fn new(
        message: CommitMessage,
        files: Vec<RepoPath>,
        timestamp: QueueTimestamp,
    ) -> Result<Self, TypeError> {
        let mut unique: Vec<RepoPath> = Vec::with_capacity(files.len());
        for file in files {
            if !unique.contains(&file) {
                unique.push(file);
            }
        }
        if unique.is_empty() {
            return Err(TypeError::EmptyFileSet);
        }

        Ok(Self {
            message,
            files: unique,
            timestamp,
            commit: None,
        })
    }

    /// Build a record stamped with the current local time.
    pub fn now(message: CommitMessage, files: Vec<RepoPath>) -> Result<Self, TypeError> {
        Self::new(message, files, QueueTimestamp::now())
    }

    /// The same intent, marked as already committed locally as `oid`.
    ///
    /// Message, files, and timestamp are carried over unchanged.
    pub fn committed_as(&self, oid: Oid) -> Self {
        Self {
            message: self.message.clone(),
            files: self.files.clone(),
            timestamp: self.timestamp,
            commit: Some(oid),
        }
    }

    /// Commit message.
    pub fn message(&self) -> &CommitMessage {
        &self.message
    }

    /// Files to stage, in order.
    pub fn files(&self) -> &[RepoPath] {
        &self.files
    }

    /// When the record was created.
    pub fn enqueued_at(&self) -> QueueTimestamp {
        self.timestamp
    }

    /// Local commit that only still needs pushing, if any.
    pub fn local_commit(&self) -> Option<&Oid> {
        self.commit.as_ref()
    }

    /// True when message, files, and timestamp match, ignoring commit state.
    pub fn same_intent(&self, other: &QueueRecord) -> bool {
        self.message == other.message
            && self.files == other.files
            && self.timestamp == other.timestamp
    }
}
