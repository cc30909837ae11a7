//! commit command - Commit and push, or queue while offline

use std::path::PathBuf;

use anyhow::{bail, Result};

use super::session::{runtime, Session};
use crate::core::types::{CommitMessage, QueueTimestamp};
use crate::engine::{schedule, Context, DispatchOutcome};

/// Replay the queue, then commit `files` with `message`, then report.
///
/// Exits with an error only if the local commit itself failed; a queued
/// commit is a normal outcome.
pub fn commit(ctx: &Context, message: &str, files: &[PathBuf]) -> Result<()> {
    let message = CommitMessage::new(message)?;
    let session = Session::open(ctx)?;
    let files = session.repo_paths(files)?;
    let _lock = session.lock()?;

    let mut sink = session.sink();
    schedule::check_work_hours(session.config.work_hours(), QueueTimestamp::now(), &mut sink);

    let engine = session.into_engine()?;
    let outcome = runtime()?.block_on(engine.commit(message, files, &mut sink))?;

    if let DispatchOutcome::Failed(error) = outcome {
        bail!("commit failed: {}", error);
    }
    Ok(())
}
