//! cli
//!
//! Command-line interface layer for devbot.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT run git or write the queue directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and hands off to the
//! [`crate::engine`], which emits events the [`crate::ui`] layer prints.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::engine;
use anyhow::Result;

/// Run a parsed command line.
///
/// This is the main entry point called from `main.rs`, after logging has
/// been set up from the same flags.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = engine::Context {
        cwd: cli.cwd.clone(),
        project: cli.project.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}
