//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Builds a [`session::Session`] (config, target directory, repository)
//! 2. Takes the queue lock if it will mutate the queue
//! 3. Runs the engine with a terminal event sink
//!
//! Handlers do NOT call git or touch the queue file directly.
//!
//! # Async Commands
//!
//! The connectivity probe is async, so handlers that drain or dispatch
//! build a tokio runtime and `block_on` the engine.

mod check;
mod commit;
mod completion;
mod drain;
mod init;
mod projects;
mod queue;
pub mod session;
mod status;

pub use check::check;
pub use commit::commit;
pub use completion::completion;
pub use drain::drain;
pub use init::init;
pub use projects::projects;
pub use queue::queue;
pub use status::status;

use crate::cli::args::Command;
use crate::engine::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Commit { message, files } => commit::commit(ctx, &message, &files),
        Command::Drain => drain::drain(ctx),
        Command::Status => status::status(ctx),
        Command::Queue => queue::queue(ctx),
        Command::Check => check::check(ctx),
        Command::Projects => projects::projects(ctx),
        Command::Init { remote } => init::init(ctx, remote.as_deref()),
        Command::Completion { shell } => completion::completion(shell),
    }
}
