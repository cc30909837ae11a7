//! status command - Uncommitted, unpushed and queued work

use anyhow::Result;

use super::session::Session;
use crate::engine::Context;

/// Report without changing anything. Takes no lock.
pub fn status(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx)?;
    let mut sink = session.sink();
    session.into_engine()?.report(&mut sink)?;
    Ok(())
}
