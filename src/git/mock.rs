//! git::mock
//!
//! In-memory version control for deterministic testing.
//!
//! # Design
//!
//! `MockRepo` keeps a linear history and a "pushed up to" marker. Staging
//! records paths, committing appends to history, and a successful push moves
//! the marker to the tip. Stage, commit, push and fetch failures are
//! scripted with [`FailOn`], and every call is recorded as a
//! [`MockOperation`].
//!
//! # Example
//!
//! ```
//! use devbot::git::mock::{FailOn, MockRepo};
//! use devbot::git::{FailureKind, RemoteFailure, VersionControl};
//! use devbot::core::types::{CommitMessage, RepoPath};
//!
//! let repo = MockRepo::new().fail_on(FailOn::PushAfter(
//!     1,
//!     RemoteFailure::new(FailureKind::Network, "connection refused"),
//! ));
//!
//! repo.stage(&[RepoPath::new("a.py").unwrap()]).unwrap();
//! repo.commit(&CommitMessage::new("A").unwrap()).unwrap();
//! assert!(repo.push().is_pushed());
//!
//! repo.stage(&[RepoPath::new("b.py").unwrap()]).unwrap();
//! repo.commit(&CommitMessage::new("B").unwrap()).unwrap();
//! assert!(!repo.push().is_pushed());
//!
//! assert_eq!(repo.pushed_messages(), vec!["A"]);
//! ```

use std::sync::{Arc, Mutex};

use super::capability::{
    CommitSummary, FetchFailure, PushFailure, PushOutcome, VersionControl,
};
use super::GitError;
use crate::core::types::{CommitMessage, Oid, RepoPath};

/// Mock repository for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockRepo {
    inner: Arc<Mutex<MockRepoInner>>,
}

#[derive(Debug, Default)]
struct MockRepoInner {
    staged: Vec<RepoPath>,
    history: Vec<MockCommit>,
    /// Number of leading history entries the remote has.
    pushed: usize,
    pushes_attempted: usize,
    uncommitted: Vec<RepoPath>,
    fail_on: Vec<FailOn>,
    operations: Vec<MockOperation>,
}

/// A commit in the mock history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCommit {
    pub oid: Oid,
    pub message: String,
    pub files: Vec<RepoPath>,
}

/// Scripted failures.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Every push fails.
    Push(PushFailure),
    /// The first `n` pushes succeed, every later one fails.
    PushAfter(usize, PushFailure),
    /// Every fetch fails.
    Fetch(FetchFailure),
    /// Every commit reports nothing to commit.
    CommitNothing,
    /// Every stage fails as if the first path were missing from disk.
    Stage,
    /// Every commit fails with this message.
    Commit(String),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Stage { files: Vec<RepoPath> },
    Commit { message: String },
    Push { pushed: bool },
    Fetch { ok: bool },
}

impl MockRepo {
    /// Create an empty mock repository where everything succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scripted failure.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.inner.lock().unwrap().fail_on.push(fail_on);
        self
    }

    /// Remove all scripted failures.
    pub fn clear_failures(&self) {
        self.inner.lock().unwrap().fail_on.clear();
    }

    /// Set the paths reported by `uncommitted_paths`.
    pub fn set_uncommitted(&self, paths: Vec<RepoPath>) {
        self.inner.lock().unwrap().uncommitted = paths;
    }

    /// Add a commit that exists locally but has not been pushed.
    pub fn with_local_commit(self, message: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let oid = next_oid(inner.history.len());
            inner.history.push(MockCommit {
                oid,
                message: message.to_string(),
                files: Vec::new(),
            });
        }
        self
    }

    /// All recorded operations, oldest first.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        self.inner.lock().unwrap().operations.clear();
    }

    /// The full local history, oldest first.
    pub fn history(&self) -> Vec<MockCommit> {
        self.inner.lock().unwrap().history.clone()
    }

    /// Messages of commits the remote has, oldest first.
    pub fn pushed_messages(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.history[..inner.pushed]
            .iter()
            .map(|c| c.message.clone())
            .collect()
    }

    /// Number of commit calls that created a commit.
    pub fn commit_count(&self) -> usize {
        self.inner.lock().unwrap().history.len()
    }
}

fn next_oid(n: usize) -> Oid {
    // 40 hex digits, distinct per commit
    Oid::new(format!("{:040x}", n + 1)).unwrap()
}

impl VersionControl for MockRepo {
    fn stage(&self, files: &[RepoPath]) -> Result<(), GitError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::Stage {
            files: files.to_vec(),
        });
        if inner.fail_on.iter().any(|f| matches!(f, FailOn::Stage)) {
            return Err(GitError::PathNotFound {
                path: files
                    .first()
                    .map(|f| f.as_str().to_string())
                    .unwrap_or_default(),
            });
        }
        for file in files {
            if !inner.staged.contains(file) {
                inner.staged.push(file.clone());
            }
        }
        Ok(())
    }

    fn commit(&self, message: &CommitMessage) -> Result<Oid, GitError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::Commit {
            message: message.as_str().to_string(),
        });

        let forced = inner.fail_on.iter().find_map(|f| match f {
            FailOn::Commit(message) => Some(message.clone()),
            _ => None,
        });
        if let Some(message) = forced {
            return Err(GitError::Internal { message });
        }

        let forced_empty = inner
            .fail_on
            .iter()
            .any(|f| matches!(f, FailOn::CommitNothing));
        if forced_empty || inner.staged.is_empty() {
            return Err(GitError::NothingToCommit);
        }

        let oid = next_oid(inner.history.len());
        let files = std::mem::take(&mut inner.staged);
        inner.history.push(MockCommit {
            oid: oid.clone(),
            message: message.as_str().to_string(),
            files,
        });
        Ok(oid)
    }

    fn push(&self) -> PushOutcome {
        let mut inner = self.inner.lock().unwrap();
        let attempt = inner.pushes_attempted;
        inner.pushes_attempted += 1;

        let failure = inner.fail_on.iter().find_map(|f| match f {
            FailOn::Push(failure) => Some(failure.clone()),
            FailOn::PushAfter(n, failure) if attempt >= *n => Some(failure.clone()),
            _ => None,
        });

        match failure {
            Some(failure) => {
                inner.operations.push(MockOperation::Push { pushed: false });
                PushOutcome::Failed(failure)
            }
            None => {
                inner.pushed = inner.history.len();
                inner.operations.push(MockOperation::Push { pushed: true });
                PushOutcome::Pushed
            }
        }
    }

    fn fetch(&self) -> Result<(), FetchFailure> {
        let mut inner = self.inner.lock().unwrap();
        let failure = inner.fail_on.iter().find_map(|f| match f {
            FailOn::Fetch(failure) => Some(failure.clone()),
            _ => None,
        });
        inner.operations.push(MockOperation::Fetch {
            ok: failure.is_none(),
        });
        match failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    fn unpushed_commits(&self) -> Result<Vec<CommitSummary>, GitError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.history[inner.pushed..]
            .iter()
            .rev()
            .map(|c| CommitSummary {
                oid: c.oid.clone(),
                summary: c.message.lines().next().unwrap_or("").to_string(),
            })
            .collect())
    }

    fn uncommitted_paths(&self) -> Result<Vec<RepoPath>, GitError> {
        let inner = self.inner.lock().unwrap();
        let mut paths = inner.uncommitted.clone();
        paths.extend(inner.staged.iter().cloned());
        paths.sort();
        paths.dedup();
        Ok(paths)
    }
}
