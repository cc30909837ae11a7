//! check command - Full inspection of one repository
//!
//! Work-hours notice, replay, queue listing, then status.

use anyhow::Result;

use super::session::{runtime, Session};
use crate::core::types::QueueTimestamp;
use crate::engine::{schedule, Context};

pub fn check(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx)?;
    let _lock = session.lock()?;
    let mut sink = session.sink();

    schedule::check_work_hours(session.config.work_hours(), QueueTimestamp::now(), &mut sink);

    let engine = session.into_engine()?;
    runtime()?.block_on(engine.drain(&mut sink))?;
    engine.list_queue(&mut sink)?;
    engine.report(&mut sink)?;
    Ok(())
}
