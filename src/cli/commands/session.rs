//! Shared setup for commands that operate on a repository.
//!
//! Order: global config, target directory, repository, repository config.
//! The repository config can only be read once the repository is known.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};

use crate::core::config::Config;
use crate::core::lock::QueueLock;
use crate::core::paths::DevbotPaths;
use crate::core::queue::QueueStore;
use crate::core::registry::ProjectRegistry;
use crate::core::types::RepoPath;
use crate::engine::{self, Context, Engine};
use crate::git::{Git, RemoteSettings};
use crate::net::HttpProbe;
use crate::ui::output::Verbosity;
use crate::ui::TerminalSink;

/// Everything a repository command needs.
pub struct Session {
    pub config: Config,
    pub paths: DevbotPaths,
    /// Directory the command was aimed at (may be below the work tree root).
    pub target_dir: PathBuf,
    pub work_dir: PathBuf,
    pub verbosity: Verbosity,
    git: Git,
}

impl Session {
    /// Resolve the target directory and open its repository.
    pub fn open(ctx: &Context) -> Result<Self> {
        let global = Config::load(None)?.config;
        let target_dir = resolve_target_dir(ctx, &global)?;

        let git = engine::open_repository(&target_dir)?;
        let info = git.info()?;
        let paths = DevbotPaths::from_repo_info(&info);
        let config = Config::load(Some(&paths))?.config;

        let git = git.with_remote(RemoteSettings {
            name: config.remote().to_string(),
            timeout: config.git_timeout(),
        });
        tracing::debug!(
            dir = %target_dir.display(),
            remote = config.remote(),
            global_config = ?config.global_config_loaded_from(),
            repo_config = ?config.repo_config_loaded_from(),
            "session opened"
        );

        Ok(Self {
            config,
            paths,
            target_dir,
            work_dir: info.work_dir,
            verbosity: Verbosity::from_flags(ctx.quiet, ctx.debug),
            git,
        })
    }

    /// Take the exclusive queue lock.
    pub fn lock(&self) -> Result<QueueLock> {
        Ok(QueueLock::acquire(&self.paths)?)
    }

    pub fn sink(&self) -> TerminalSink {
        TerminalSink::new(self.verbosity)
    }

    /// Convert command-line file arguments to repository paths.
    pub fn repo_paths(&self, files: &[PathBuf]) -> Result<Vec<RepoPath>> {
        let work_dir = canonical(&self.work_dir)?;
        let target_dir = canonical(&self.target_dir)?;
        files
            .iter()
            .map(|file| to_repo_path(&work_dir, &target_dir, file))
            .collect()
    }

    /// Wire the real repository and probe into an engine.
    pub fn into_engine(self) -> Result<Engine<Git, HttpProbe>> {
        let probe = HttpProbe::new(self.config.probe_url(), self.config.probe_timeout())?;
        let store = QueueStore::for_repo(&self.paths);
        Ok(Engine::new(self.git, probe, store))
    }
}

/// Pick the directory to operate on.
///
/// `--project`, then `--cwd`, then the registry's default project, then the
/// current directory.
pub fn resolve_target_dir(ctx: &Context, config: &Config) -> Result<PathBuf> {
    if let Some(name) = &ctx.project {
        let registry = load_registry(config)?;
        return Ok(registry.resolve(name)?.to_path_buf());
    }

    if let Some(cwd) = &ctx.cwd {
        return Ok(cwd.clone());
    }

    let registry = load_registry(config)?;
    if let Some((name, path)) = registry.default_project()? {
        tracing::debug!(project = name, "using default project");
        return Ok(path.to_path_buf());
    }

    std::env::current_dir().context("cannot determine current directory")
}

pub fn load_registry(config: &Config) -> Result<ProjectRegistry> {
    match config.projects_file() {
        Some(path) => Ok(ProjectRegistry::load(&path)?),
        None => Ok(ProjectRegistry::default()),
    }
}

/// Build a tokio runtime for the async engine calls.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to start async runtime")
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("cannot resolve {}", path.display()))
}

fn to_repo_path(work_dir: &Path, target_dir: &Path, file: &Path) -> Result<RepoPath> {
    let absolute = if file.is_absolute() {
        file.to_path_buf()
    } else {
        target_dir.join(file)
    };

    let Ok(relative) = absolute.strip_prefix(work_dir) else {
        bail!("'{}' is outside the repository at {}", file.display(), work_dir.display());
    };
    let Some(relative) = relative.to_str() else {
        bail!("'{}' is not valid UTF-8", file.display());
    };

    Ok(RepoPath::new(relative)?)
}
