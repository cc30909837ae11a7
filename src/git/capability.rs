//! git::capability
//!
//! The version-control seam the engine is written against.
//!
//! [`Git`](super::Git) implements it over a real repository and
//! [`MockRepo`](super::mock::MockRepo) implements it in memory, so drain and
//! dispatch can be exercised without a network or a remote.
//!
//! Remote operations (`push`, `fetch`) report failure as values. A failed
//! push means "queue it", a failed fetch means "report degraded", and
//! neither ends the invocation. Local operations return [`GitError`].

use std::fmt;

use super::GitError;
use crate::core::types::{CommitMessage, Oid, RepoPath};

/// Why a remote operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// DNS, connection refused, unreachable host.
    Network,
    /// Credentials missing or rejected.
    Auth,
    /// The operation did not finish within the configured bound.
    Timeout,
    /// The remote refused the update (non-fast-forward, hook).
    Rejected,
    /// Anything the classifier does not recognize.
    Other,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Network => "network",
            FailureKind::Auth => "auth",
            FailureKind::Timeout => "timeout",
            FailureKind::Rejected => "rejected",
            FailureKind::Other => "other",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed push or fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub kind: FailureKind,
    /// Last meaningful line of git's stderr, or a synthesized description.
    pub detail: String,
}

impl RemoteFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{} failure", self.kind)
        } else {
            write!(f, "{} failure: {}", self.kind, self.detail)
        }
    }
}

pub type PushFailure = RemoteFailure;
pub type FetchFailure = RemoteFailure;

/// Result of a push attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    Failed(PushFailure),
}

impl PushOutcome {
    pub fn is_pushed(&self) -> bool {
        matches!(self, PushOutcome::Pushed)
    }
}

/// One local commit the remote does not have yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub oid: Oid,
    /// First line of the commit message.
    pub summary: String,
}

/// Stage, commit, push, fetch and the two read queries the status report
/// needs.
pub trait VersionControl {
    /// Bring the index in line with the working tree for `files`.
    ///
    /// A path that no longer exists on disk is staged as a deletion.
    fn stage(&self, files: &[RepoPath]) -> Result<(), GitError>;

    /// Commit the index on top of HEAD.
    ///
    /// Fails with [`GitError::NothingToCommit`] when the index matches HEAD.
    fn commit(&self, message: &CommitMessage) -> Result<Oid, GitError>;

    /// Push the current branch to the configured remote.
    fn push(&self) -> PushOutcome;

    /// Update remote-tracking refs from the configured remote.
    fn fetch(&self) -> Result<(), FetchFailure>;

    /// Commits reachable from HEAD but not from the remote-tracking branch,
    /// newest first.
    fn unpushed_commits(&self) -> Result<Vec<CommitSummary>, GitError>;

    /// Tracked paths whose content differs between the working tree, the
    /// index and HEAD, sorted. Untracked files are not included.
    fn uncommitted_paths(&self) -> Result<Vec<RepoPath>, GitError>;
}
