//! engine
//!
//! Orchestrates one devbot invocation: Drain -> Dispatch -> Report.
//!
//! # Architecture
//!
//! The engine owns no I/O of its own. It is generic over the
//! [`VersionControl`] capability and the [`ConnectivityProbe`], reads and
//! writes the queue through [`QueueStore`], and reports every outcome as an
//! [`Event`] to an [`EventSink`]. Command handlers wire the real
//! implementations; tests wire [`MockRepo`](crate::git::mock::MockRepo) and
//! [`StaticProbe`](crate::net::mock::StaticProbe).
//!
//! # Invocation Lifecycle
//!
//! ```text
//! [work-hours notice] -> Drain -> Dispatch -> Report
//! ```
//!
//! # Invariants
//!
//! - Network failures are recovered locally (queued or reported)
//! - Only a corrupt queue or a missing repository ends the invocation
//! - Drain runs before dispatch, and dispatch queues behind anything the
//!   drain left, so commits reach the remote in the order they were made
//!
//! # Example
//!
//! ```ignore
//! let engine = Engine::new(git, probe, QueueStore::for_repo(&paths));
//! let mut events = Vec::new();
//!
//! engine.drain(&mut events).await?;
//! engine.dispatch(message, files, &mut events).await?;
//! engine.report(&mut events)?;
//! ```

pub mod dispatch;
pub mod drain;
pub mod events;
pub mod schedule;
pub mod status;

pub use dispatch::DispatchOutcome;
pub use drain::DrainOutcome;
pub use events::{Event, EventSink, HaltReason, QueueReason};
pub use status::{StatusSummary, Unpushed};

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::queue::{QueueError, QueueRecord, QueueStore};
use crate::core::types::{CommitMessage, RepoPath, TypeError};
use crate::git::{Git, GitError, VersionControl};
use crate::net::ConnectivityProbe;

/// Execution context for commands.
///
/// Global settings derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Registered project to operate on.
    pub project: Option<String>,
    /// Debug output enabled.
    pub debug: bool,
    /// Quiet mode (errors only).
    pub quiet: bool,
}

/// Errors that end an invocation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No repository at or above the target directory.
    #[error("no git repository at {path} (run `devbot init` to create one)")]
    RepositoryAbsent { path: PathBuf },

    /// The queue file exists but cannot be parsed. It is left untouched.
    #[error("commit queue at '{path}' is corrupt: {message}; fix or move the file aside, then retry")]
    CorruptState { path: PathBuf, message: String },

    /// The queue could not be read or written.
    #[error("queue error: {0}")]
    Queue(QueueError),

    /// A commit request was malformed.
    #[error("invalid commit request: {0}")]
    InvalidRequest(#[from] TypeError),

    /// Git error.
    #[error("git error: {0}")]
    Git(#[from] GitError),
}

impl From<QueueError> for EngineError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Corrupt { path, message } => EngineError::CorruptState { path, message },
            other => EngineError::Queue(other),
        }
    }
}

/// Open the repository containing `dir`.
///
/// # Errors
///
/// [`EngineError::RepositoryAbsent`] if there is none.
pub fn open_repository(dir: &Path) -> Result<Git, EngineError> {
    Git::detect(dir)?.ok_or_else(|| EngineError::RepositoryAbsent {
        path: dir.to_path_buf(),
    })
}

/// Create a repository at `dir` unless one already contains it.
pub fn init_repository(dir: &Path, sink: &mut dyn EventSink) -> Result<Git, EngineError> {
    if let Some(git) = Git::detect(dir)? {
        let path = git.work_dir()?.to_path_buf();
        sink.emit(Event::RepositoryAlreadyExists { path });
        return Ok(git);
    }

    let git = Git::init(dir)?;
    sink.emit(Event::RepositoryInitialized {
        path: dir.to_path_buf(),
    });
    Ok(git)
}

/// Drainer, dispatcher and reporter over one repository and queue.
#[derive(Debug)]
pub struct Engine<V, P> {
    vcs: V,
    probe: P,
    store: QueueStore,
}

impl<V, P> Engine<V, P>
where
    V: VersionControl,
    P: ConnectivityProbe,
{
    pub fn new(vcs: V, probe: P, store: QueueStore) -> Self {
        Self { vcs, probe, store }
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    pub fn store(&self) -> &QueueStore {
        &self.store
    }

    /// Push every queued record, oldest first, stopping at the first failure.
    pub async fn drain(&self, sink: &mut dyn EventSink) -> Result<DrainOutcome, EngineError> {
        drain::drain(&self.vcs, &self.probe, &self.store, sink).await
    }

    /// Commit and push now, or queue for later.
    pub async fn dispatch(
        &self,
        message: CommitMessage,
        files: Vec<RepoPath>,
        sink: &mut dyn EventSink,
    ) -> Result<DispatchOutcome, EngineError> {
        dispatch::dispatch(&self.vcs, &self.probe, &self.store, message, files, sink).await
    }

    /// Emit and return a [`StatusSummary`].
    pub fn report(&self, sink: &mut dyn EventSink) -> Result<StatusSummary, EngineError> {
        let summary = status::report(&self.vcs, &self.store)?;
        sink.emit(Event::Status(summary.clone()));
        Ok(summary)
    }

    /// Emit and return the queue contents.
    pub fn list_queue(&self, sink: &mut dyn EventSink) -> Result<Vec<QueueRecord>, EngineError> {
        let records = self.store.load()?;
        sink.emit(Event::QueueListing {
            records: records.clone(),
        });
        Ok(records)
    }

    /// The full commit lifecycle: drain, dispatch, report.
    pub async fn commit(
        &self,
        message: CommitMessage,
        files: Vec<RepoPath>,
        sink: &mut dyn EventSink,
    ) -> Result<DispatchOutcome, EngineError> {
        self.drain(sink).await?;
        let outcome = self.dispatch(message, files, sink).await?;
        self.report(sink)?;
        Ok(outcome)
    }
}
