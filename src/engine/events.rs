//! engine::events
//!
//! Structured notices the engine emits for the presentation layer.
//!
//! The engine never formats for a terminal. Every outcome worth telling the
//! operator about becomes an [`Event`] pushed into an [`EventSink`]; the
//! `ui` layer decides how it looks. Each fallback path has its own variant,
//! so "pushed", "queued" and "failed" are always distinguishable.

use std::path::PathBuf;

use crate::core::config::WorkHours;
use crate::core::queue::QueueRecord;
use crate::core::types::{CommitMessage, QueueTimestamp};
use crate::git::{PushFailure, RemoteFailure};

use super::status::StatusSummary;

/// Why a record went into the queue instead of reaching the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueReason {
    /// The probe said the network is down; nothing was committed.
    Offline,
    /// Older records are still pending, so committing now would push this
    /// one ahead of them; nothing was committed.
    Backlog,
    /// The commit exists locally but the push failed.
    PushFailed(PushFailure),
}

/// Why a drain stopped before the queue was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    /// The remote did not accept the push.
    Push(RemoteFailure),
    /// Staging or committing the record failed locally.
    Local(String),
}

impl std::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HaltReason::Push(failure) => write!(f, "push failed ({})", failure),
            HaltReason::Local(message) => write!(f, "{}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The local clock is outside the configured working window.
    OutsideWorkHours {
        now: QueueTimestamp,
        window: WorkHours,
    },

    /// A commit reached the remote immediately.
    Pushed {
        at: QueueTimestamp,
        message: CommitMessage,
    },

    /// A commit was queued for later.
    Queued {
        record: QueueRecord,
        reason: QueueReason,
        /// Queue length after the append.
        pending: usize,
    },

    /// Staging or committing failed; nothing was pushed or queued.
    CommitFailed {
        message: CommitMessage,
        error: String,
    },

    /// Drain found queued work but the network is down.
    DrainSkippedOffline { pending: usize },

    /// Replay found nothing left to commit for a record and pushed anyway.
    ReplayNothingToCommit { record: QueueRecord },

    /// A queued record reached the remote and left the queue.
    ReplayPushed { record: QueueRecord },

    /// Drain stopped at `record`; it and everything behind it stay queued.
    DrainHalted {
        record: QueueRecord,
        reason: HaltReason,
        remaining: usize,
    },

    /// Every queued record was pushed.
    DrainCompleted { pushed: usize },

    /// Contents of the queue, oldest first.
    QueueListing { records: Vec<QueueRecord> },

    /// Result of a status report.
    Status(StatusSummary),

    RepositoryInitialized { path: PathBuf },

    RepositoryAlreadyExists { path: PathBuf },
}

/// Receiver of engine events.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// Collects events in order. Used by tests and by callers that render later.
impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}
