//! init command - Create a repository in the target directory

use std::fs;

use anyhow::{Context as _, Result};

use super::session::resolve_target_dir;
use crate::core::config::{Config, RepoConfig};
use crate::core::paths::DevbotPaths;
use crate::engine::{self, Context};
use crate::ui::output::{self, Verbosity};
use crate::ui::TerminalSink;

/// Initialize a repository unless one already exists.
///
/// With `remote`, also record the push remote in the repository's devbot
/// config.
pub fn init(ctx: &Context, remote: Option<&str>) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    let config = Config::load(None)?.config;
    let dir = resolve_target_dir(ctx, &config)?;
    fs::create_dir_all(&dir).with_context(|| format!("cannot create {}", dir.display()))?;

    let mut sink = TerminalSink::new(verbosity);
    let git = engine::init_repository(&dir, &mut sink)?;

    if let Some(remote) = remote {
        let paths = DevbotPaths::from_repo_info(&git.info()?);
        let written = Config::write_repo(
            &paths,
            &RepoConfig {
                remote: Some(remote.to_string()),
            },
        )?;
        output::print(
            format!("Pushing to remote '{}' ({})", remote, written.display()),
            verbosity,
        );
    }
    Ok(())
}
