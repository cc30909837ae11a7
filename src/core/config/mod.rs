//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! devbot has two configuration scopes:
//! - **Global**: User-level settings (probe endpoint, timeouts, registry
//!   location, work hours)
//! - **Repo**: Repository-level settings (which remote to push to)
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$DEVBOT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/devbot/config.toml`
//! 3. `~/.devbot/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use devbot::core::config::Config;
//!
//! let config = Config::load(None).unwrap().config;
//! println!("Probing {} for {:?}", config.probe_url(), config.probe_timeout());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, RepoConfig, WorkHours};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::atomic::write_atomic;
use crate::core::paths::DevbotPaths;

/// Default reachability probe target.
pub const DEFAULT_PROBE_URL: &str = "https://github.com";

/// Default probe bound.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Default bound for a single network git call.
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
}

/// Merged configuration from all sources.
///
/// Accessor methods apply defaults and precedence automatically.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo)
    pub repo: Option<RepoConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `paths` is provided, also loads the repository config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or fail
    /// validation. Missing config files are not an error.
    pub fn load(paths: Option<&DevbotPaths>) -> Result<ConfigLoadResult, ConfigError> {
        let (global, global_path) = Self::load_global()?;

        let (repo, repo_path) = match paths {
            Some(paths) => Self::load_repo(paths)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                repo,
                global_path,
                repo_path,
            },
        })
    }

    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        // 1. Check $DEVBOT_CONFIG
        if let Ok(path) = std::env::var("DEVBOT_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/devbot/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("devbot/config.toml");
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check ~/.devbot/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".devbot/config.toml");
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    fn load_repo(paths: &DevbotPaths) -> Result<(Option<RepoConfig>, Option<PathBuf>), ConfigError> {
        let path = paths.repo_config_path();
        if !path.exists() {
            return Ok((None, None));
        }
        let config = Self::read_toml(&path)?;
        Ok((Some(config), Some(path)))
    }

    fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write repo config atomically.
    pub fn write_repo(paths: &DevbotPaths, config: &RepoConfig) -> Result<PathBuf, ConfigError> {
        config.validate()?;
        let path = paths.repo_config_path();
        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        write_atomic(&path, contents.as_bytes()).map_err(|e| ConfigError::WriteError {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Remote that commits are pushed to. Defaults to "origin".
    pub fn remote(&self) -> &str {
        self.repo
            .as_ref()
            .and_then(|r| r.remote.as_deref())
            .unwrap_or("origin")
    }

    /// Reachability probe target. Defaults to [`DEFAULT_PROBE_URL`].
    pub fn probe_url(&self) -> &str {
        self.global.probe_url.as_deref().unwrap_or(DEFAULT_PROBE_URL)
    }

    /// Probe bound. Defaults to [`DEFAULT_PROBE_TIMEOUT`].
    pub fn probe_timeout(&self) -> Duration {
        self.global
            .probe_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT)
    }

    /// Bound for one push or fetch. Defaults to [`DEFAULT_GIT_TIMEOUT`].
    pub fn git_timeout(&self) -> Duration {
        self.global
            .git_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_GIT_TIMEOUT)
    }

    /// Project registry location.
    ///
    /// Defaults to `~/.devbot/projects.json`; `None` only when no home
    /// directory can be found and nothing is configured.
    pub fn projects_file(&self) -> Option<PathBuf> {
        self.global
            .projects_file
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(".devbot/projects.json")))
    }

    /// Scheduled working window. Defaults to 8:00-21:00.
    pub fn work_hours(&self) -> WorkHours {
        self.global.work_hours.unwrap_or_default()
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests below mutate process-wide environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn test_paths(temp: &TempDir) -> DevbotPaths {
        let git_dir = temp.path().join(".git");
        DevbotPaths::new(git_dir.clone(), git_dir)
    }

    #[test]
    fn load_global_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");

        fs::write(
            &config_path,
            r#"
            probe_url = "http://127.0.0.1:9"
            probe_timeout_secs = 1

            [work_hours]
            start = 6
            end = 18
            "#,
        )
        .unwrap();

        std::env::set_var("DEVBOT_CONFIG", config_path.to_str().unwrap());
        let result = Config::load(None);
        std::env::remove_var("DEVBOT_CONFIG");

        let config = result.unwrap().config;
        assert_eq!(config.probe_url(), "http://127.0.0.1:9");
        assert_eq!(config.probe_timeout(), Duration::from_secs(1));
        assert_eq!(config.work_hours(), WorkHours { start: 6, end: 18 });
        assert_eq!(config.global_config_loaded_from(), Some(config_path.as_path()));
    }

    #[test]
    fn invalid_global_value_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "git_timeout_secs = 0").unwrap();

        std::env::set_var("DEVBOT_CONFIG", config_path.to_str().unwrap());
        let result = Config::load(None);
        std::env::remove_var("DEVBOT_CONFIG");

        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn load_repo_config() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        let paths = test_paths(&temp);
        fs::create_dir_all(paths.devbot_dir()).unwrap();
        fs::write(paths.repo_config_path(), "remote = \"upstream\"").unwrap();

        let config = Config::load(Some(&paths)).unwrap().config;

        assert_eq!(config.remote(), "upstream");
        assert_eq!(
            config.repo_config_loaded_from(),
            Some(paths.repo_config_path().as_path())
        );
    }

    #[test]
    fn unknown_repo_fields_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        let paths = test_paths(&temp);
        fs::create_dir_all(paths.devbot_dir()).unwrap();
        fs::write(paths.repo_config_path(), "remote = \"origin\"\nbranch = \"x\"").unwrap();

        let result = Config::load(Some(&paths));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn write_repo_config_atomic() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        let paths = test_paths(&temp);

        let path = Config::write_repo(
            &paths,
            &RepoConfig {
                remote: Some("backup".to_string()),
            },
        )
        .unwrap();

        assert!(path.exists());
        let loaded = Config::load(Some(&paths)).unwrap().config;
        assert_eq!(loaded.remote(), "backup");
    }

    #[test]
    fn defaults_apply_without_files() {
        let config = Config::default();
        assert_eq!(config.remote(), "origin");
        assert_eq!(config.probe_url(), DEFAULT_PROBE_URL);
        assert_eq!(config.probe_timeout(), Duration::from_secs(3));
        assert_eq!(config.git_timeout(), Duration::from_secs(30));
        assert_eq!(config.work_hours(), WorkHours { start: 8, end: 21 });
    }

    #[test]
    fn configured_projects_file_wins() {
        let config = Config {
            global: GlobalConfig {
                projects_file: Some(PathBuf::from("/srv/projects.json")),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            config.projects_file(),
            Some(PathBuf::from("/srv/projects.json"))
        );
    }
}
