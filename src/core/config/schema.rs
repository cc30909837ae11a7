//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$DEVBOT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/devbot/config.toml`
//! 3. `~/.devbot/config.toml` (canonical write location)
//!
//! # Repo Config
//!
//! Located at `<common_dir>/devbot/config.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing (the probe URL must parse,
//! timeouts must be positive, the work-hours window must be ordered).

use std::path::PathBuf;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// probe_url = "https://github.com"
/// probe_timeout_secs = 3
/// git_timeout_secs = 30
/// projects_file = "/home/me/.devbot/projects.json"
///
/// [work_hours]
/// start = 8
/// end = 21
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Endpoint probed to decide whether the network is reachable
    pub probe_url: Option<String>,

    /// Upper bound for a single reachability probe
    pub probe_timeout_secs: Option<u64>,

    /// Upper bound for a single `git push` / `git fetch`
    pub git_timeout_secs: Option<u64>,

    /// Registry of named project directories
    pub projects_file: Option<PathBuf>,

    /// Scheduled working window
    pub work_hours: Option<WorkHours>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.probe_url {
            let parsed = reqwest::Url::parse(url).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid probe_url '{}': {}", url, e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidValue(format!(
                    "probe_url must be http or https, got '{}'",
                    parsed.scheme()
                )));
            }
        }

        if self.probe_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "probe_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.git_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "git_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if let Some(hours) = &self.work_hours {
            hours.validate()?;
        }

        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// remote = "origin"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Remote that commits are pushed to (default: "origin")
    pub remote: Option<String>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(remote) = &self.remote {
            if remote.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "remote cannot be empty".to_string(),
                ));
            }
            if remote.starts_with('-') || remote.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid remote name '{}'",
                    remote
                )));
            }
        }

        Ok(())
    }
}

/// Scheduled working window, in whole local hours.
///
/// Both ends are inclusive: with the default `8..=21`, 21:00:00 is inside
/// the window and 21:00:01 is not.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WorkHours {
    /// First working hour (0-23)
    pub start: u32,
    /// Last working hour (1-24)
    pub end: u32,
}

impl Default for WorkHours {
    fn default() -> Self {
        Self { start: 8, end: 21 }
    }
}

impl WorkHours {
    /// Validate the window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start >= self.end || self.end > 24 {
            return Err(ConfigError::InvalidValue(format!(
                "work_hours must satisfy start < end <= 24, got {}..{}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Check whether `time` falls inside the window.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveTime;
    /// use devbot::core::config::WorkHours;
    ///
    /// let hours = WorkHours::default();
    /// assert!(hours.contains(NaiveTime::from_hms_opt(8, 0, 0).unwrap()));
    /// assert!(hours.contains(NaiveTime::from_hms_opt(21, 0, 0).unwrap()));
    /// assert!(!hours.contains(NaiveTime::from_hms_opt(21, 0, 1).unwrap()));
    /// assert!(!hours.contains(NaiveTime::from_hms_opt(7, 59, 59).unwrap()));
    /// ```
    pub fn contains(&self, time: NaiveTime) -> bool {
        let seconds = time.num_seconds_from_midnight();
        if seconds < self.start * 3600 {
            return false;
        }
        self.end >= 24 || seconds <= self.end * 3600
    }
}

impl std::fmt::Display for WorkHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:00-{}:00", self.start, self.end)
    }
}
