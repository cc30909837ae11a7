//! engine::status
//!
//! Read-only reconciliation of local, unpushed and queued work.

use crate::core::queue::{QueueRecord, QueueStore};
use crate::core::types::RepoPath;
use crate::git::{CommitSummary, FetchFailure, VersionControl};

use super::EngineError;

/// What is known about commits the remote does not have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unpushed {
    /// Fetched successfully; these commits are ahead of the remote.
    Known(Vec<CommitSummary>),
    /// The fetch failed, so the comparison was skipped.
    FetchFailed(FetchFailure),
}

/// Three-way summary of outstanding work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    /// Tracked paths with changes not yet committed.
    pub uncommitted: Vec<RepoPath>,
    pub unpushed: Unpushed,
    /// Records waiting in the offline queue, oldest first.
    pub queued: Vec<QueueRecord>,
}

impl StatusSummary {
    /// True only when all three sets are known and empty.
    ///
    /// A failed fetch is never "synced".
    pub fn is_fully_synced(&self) -> bool {
        self.uncommitted.is_empty()
            && self.queued.is_empty()
            && matches!(&self.unpushed, Unpushed::Known(commits) if commits.is_empty())
    }
}

/// Build a [`StatusSummary`].
///
/// Fetches first so the unpushed set is measured against the current remote
/// tip. Never mutates the working tree, the index or the queue.
pub fn report<V>(vcs: &V, store: &QueueStore) -> Result<StatusSummary, EngineError>
where
    V: VersionControl + ?Sized,
{
    let queued = store.load()?;
    let uncommitted = vcs.uncommitted_paths()?;

    let unpushed = match vcs.fetch() {
        Ok(()) => Unpushed::Known(vcs.unpushed_commits()?),
        Err(failure) => {
            tracing::info!(%failure, "fetch failed, unpushed commits unknown");
            Unpushed::FetchFailed(failure)
        }
    };

    Ok(StatusSummary {
        uncommitted,
        unpushed,
        queued,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{FailureKind, RemoteFailure};

    fn summary(unpushed: Unpushed) -> StatusSummary {
        StatusSummary {
            uncommitted: Vec::new(),
            unpushed,
            queued: Vec::new(),
        }
    }

    #[test]
    fn empty_sets_are_synced() {
        assert!(summary(Unpushed::Known(Vec::new())).is_fully_synced());
    }

    #[test]
    fn fetch_failure_is_not_synced() {
        let failed = summary(Unpushed::FetchFailed(RemoteFailure::new(
            FailureKind::Network,
            "unreachable",
        )));
        assert!(!failed.is_fully_synced());
    }

    #[test]
    fn uncommitted_paths_are_not_synced() {
        let mut dirty = summary(Unpushed::Known(Vec::new()));
        dirty.uncommitted.push(RepoPath::new("a.py").unwrap());
        assert!(!dirty.is_fully_synced());
    }
}
