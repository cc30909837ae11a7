//! engine::drain
//!
//! Flush the commit queue to the remote, oldest first.
//!
//! # Algorithm
//!
//! 1. Load the queue. Empty: return. Offline: report and return.
//! 2. For the record at the front:
//!    - intent record: stage its files and commit its message, then persist
//!      it as push-only so a crash before the push never commits it twice
//!    - push-only record: nothing to do locally
//!    - push; on success remove it and persist the shorter queue
//! 3. Any failure stops the drain. The failed record and everything behind
//!    it stay queued, in order.
//!
//! # Invariants
//!
//! - Records leave the queue only after their push is confirmed
//! - The on-disk queue reflects completed steps only
//! - No record is skipped

use std::collections::VecDeque;

use crate::core::queue::{QueueRecord, QueueStore};
use crate::git::{GitError, PushOutcome, VersionControl};
use crate::net::ConnectivityProbe;

use super::events::{Event, EventSink, HaltReason};
use super::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Nothing was queued.
    Empty,
    /// Work was queued but the network is down.
    SkippedOffline { pending: usize },
    /// Every record was pushed.
    Completed { pushed: usize },
    /// Stopped early; `remaining` records are still queued.
    Halted {
        pushed: usize,
        remaining: usize,
        reason: HaltReason,
    },
}

pub async fn drain<V, P>(
    vcs: &V,
    probe: &P,
    store: &QueueStore,
    sink: &mut dyn EventSink,
) -> Result<DrainOutcome, EngineError>
where
    V: VersionControl + ?Sized,
    P: ConnectivityProbe + ?Sized,
{
    let records = store.load()?;
    if records.is_empty() {
        return Ok(DrainOutcome::Empty);
    }

    if !probe.is_online().await {
        tracing::info!(pending = records.len(), "offline, drain skipped");
        sink.emit(Event::DrainSkippedOffline {
            pending: records.len(),
        });
        return Ok(DrainOutcome::SkippedOffline {
            pending: records.len(),
        });
    }

    let mut pending: VecDeque<QueueRecord> = records.into();
    let mut pushed = 0;

    while let Some(front) = pending.front().cloned() {
        let record = match prepare(vcs, &front, sink) {
            Ok(record) => record,
            Err(e) => {
                let reason = HaltReason::Local(e.to_string());
                return Ok(halt(sink, front, reason, pushed, pending.len()));
            }
        };

        if record != front {
            pending[0] = record.clone();
            store.save(pending.make_contiguous())?;
        }

        match vcs.push() {
            PushOutcome::Pushed => {
                pending.pop_front();
                store.save(pending.make_contiguous())?;
                pushed += 1;
                tracing::debug!(remaining = pending.len(), "replayed record");
                sink.emit(Event::ReplayPushed { record });
            }
            PushOutcome::Failed(failure) => {
                let reason = HaltReason::Push(failure);
                return Ok(halt(sink, record, reason, pushed, pending.len()));
            }
        }
    }

    sink.emit(Event::DrainCompleted { pushed });
    Ok(DrainOutcome::Completed { pushed })
}

/// Make the local commit for `record` if it does not exist yet.
///
/// Returns the record as it should be persisted before pushing.
fn prepare<V>(
    vcs: &V,
    record: &QueueRecord,
    sink: &mut dyn EventSink,
) -> Result<QueueRecord, GitError>
where
    V: VersionControl + ?Sized,
{
    if record.local_commit().is_some() {
        return Ok(record.clone());
    }

    vcs.stage(record.files())?;
    match vcs.commit(record.message()) {
        Ok(oid) => Ok(record.committed_as(oid)),
        Err(GitError::NothingToCommit) => {
            tracing::info!(
                message = record.message().summary(),
                "nothing to commit on replay, pushing only"
            );
            sink.emit(Event::ReplayNothingToCommit {
                record: record.clone(),
            });
            Ok(record.clone())
        }
        Err(e) => Err(e),
    }
}

fn halt(
    sink: &mut dyn EventSink,
    record: QueueRecord,
    reason: HaltReason,
    pushed: usize,
    remaining: usize,
) -> DrainOutcome {
    tracing::info!(%reason, remaining, "drain halted");
    sink.emit(Event::DrainHalted {
        record,
        reason: reason.clone(),
        remaining,
    });
    DrainOutcome::Halted {
        pushed,
        remaining,
        reason,
    }
}
