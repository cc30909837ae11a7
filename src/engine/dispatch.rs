//! engine::dispatch
//!
//! Commit now, or queue for later.
//!
//! # Algorithm
//!
//! 1. Ask the probe. If offline: queue the intent (message, files, now)
//!    without touching the repository and emit [`Event::Queued`].
//! 2. If the queue still holds records (the drain before us halted or saw
//!    the network down), queue the intent behind them with
//!    [`QueueReason::Backlog`]. Committing now would push it first.
//! 3. Otherwise stage, commit, push.
//!    - Pushed: emit [`Event::Pushed`].
//!    - Push failed: the commit exists locally, so queue a push-only record
//!      carrying its id and emit [`Event::Queued`] with the failure.
//!
//! A local staging or commit failure is reported as
//! [`Event::CommitFailed`] and nothing is queued.

use crate::core::queue::{QueueRecord, QueueStore};
use crate::core::types::{CommitMessage, QueueTimestamp, RepoPath};
use crate::git::{PushOutcome, VersionControl};
use crate::net::ConnectivityProbe;

use super::events::{Event, EventSink, QueueReason};
use super::EngineError;

/// What happened to a commit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Pushed,
    Queued(QueueReason),
    /// Local stage or commit failed.
    Failed(String),
}

pub async fn dispatch<V, P>(
    vcs: &V,
    probe: &P,
    store: &QueueStore,
    message: CommitMessage,
    files: Vec<RepoPath>,
    sink: &mut dyn EventSink,
) -> Result<DispatchOutcome, EngineError>
where
    V: VersionControl + ?Sized,
    P: ConnectivityProbe + ?Sized,
{
    let record = QueueRecord::now(message, files)?;

    if !probe.is_online().await {
        tracing::info!("offline, queueing commit");
        return queue_intent(store, record, QueueReason::Offline, sink);
    }

    let backlog = store.load()?.len();
    if backlog > 0 {
        tracing::info!(backlog, "queue not drained, queueing commit behind it");
        return queue_intent(store, record, QueueReason::Backlog, sink);
    }

    let committed = vcs
        .stage(record.files())
        .and_then(|()| vcs.commit(record.message()));
    let oid = match committed {
        Ok(oid) => oid,
        Err(e) => {
            tracing::info!(error = %e, "commit failed");
            sink.emit(Event::CommitFailed {
                message: record.message().clone(),
                error: e.to_string(),
            });
            return Ok(DispatchOutcome::Failed(e.to_string()));
        }
    };

    match vcs.push() {
        PushOutcome::Pushed => {
            sink.emit(Event::Pushed {
                at: QueueTimestamp::now(),
                message: record.message().clone(),
            });
            Ok(DispatchOutcome::Pushed)
        }
        PushOutcome::Failed(failure) => {
            tracing::info!(%failure, %oid, "push failed, queueing for push-only replay");
            let reason = QueueReason::PushFailed(failure);
            let pending = store.append(record.committed_as(oid))?;
            sink.emit(Event::Queued {
                record: record.clone(),
                reason: reason.clone(),
                pending,
            });
            Ok(DispatchOutcome::Queued(reason))
        }
    }
}

fn queue_intent(
    store: &QueueStore,
    record: QueueRecord,
    reason: QueueReason,
    sink: &mut dyn EventSink,
) -> Result<DispatchOutcome, EngineError> {
    let pending = store.append(record.clone())?;
    sink.emit(Event::Queued {
        record,
        reason: reason.clone(),
        pending,
    });
    Ok(DispatchOutcome::Queued(reason))
}
