//! drain command - Replay queued commits

use anyhow::Result;

use super::session::{runtime, Session};
use crate::engine::Context;

/// Replay the queue, then report.
pub fn drain(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx)?;
    let _lock = session.lock()?;
    let mut sink = session.sink();

    let engine = session.into_engine()?;
    runtime()?.block_on(engine.drain(&mut sink))?;
    engine.report(&mut sink)?;
    Ok(())
}
