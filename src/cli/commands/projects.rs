//! projects command - List registered projects

use anyhow::Result;

use super::session::load_registry;
use crate::core::config::Config;
use crate::engine::Context;
use crate::ui::output::{self, Verbosity};

/// Print registered project names, marking the default with `*`.
pub fn projects(ctx: &Context) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    let config = Config::load(None)?.config;
    let registry = load_registry(&config)?;

    if registry.is_empty() {
        let location = config
            .projects_file()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "no registry file".to_string());
        output::print(format!("No projects registered ({})", location), verbosity);
        return Ok(());
    }

    let default = registry.default_name();
    for name in registry.names() {
        let marker = if Some(name) == default { "*" } else { " " };
        let path = registry.resolve(name)?;
        output::print(format!("{} {}  {}", marker, name, path.display()), verbosity);
    }
    Ok(())
}
