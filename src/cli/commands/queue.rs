//! queue command - List queued commits

use anyhow::Result;

use super::session::Session;
use crate::engine::Context;

/// Print the queue as a table. Read-only; takes no lock.
pub fn queue(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx)?;
    let mut sink = session.sink();
    session.into_engine()?.list_queue(&mut sink)?;
    Ok(())
}
