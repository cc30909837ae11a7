//! core::paths
//!
//! Centralized path routing for devbot storage locations.
//!
//! # Architecture
//!
//! Every per-repository file devbot owns is computed here, so nothing else
//! joins `"devbot"` onto a git directory by hand. Storage is keyed on the
//! *common* git directory: linked worktrees of one repository share a
//! single queue, because they share a single remote.
//!
//! # Storage Layout
//!
//! All devbot data is stored under `<common_dir>/devbot/`:
//! - `queue.json` - Pending commit records
//! - `lock` - Exclusive lock file
//! - `config.toml` - Repository configuration
//!
//! # Example
//!
//! ```
//! use devbot::core::paths::DevbotPaths;
//! use std::path::PathBuf;
//!
//! let paths = DevbotPaths::new(
//!     PathBuf::from("/repo/.git"),
//!     PathBuf::from("/repo/.git"),
//! );
//!
//! assert_eq!(
//!     paths.queue_path(),
//!     PathBuf::from("/repo/.git/devbot/queue.json")
//! );
//! ```

use std::path::PathBuf;

use crate::git::RepoInfo;

/// Centralized path routing for devbot storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevbotPaths {
    /// Path to the per-worktree .git directory.
    pub git_dir: PathBuf,

    /// Path to the shared git directory (refs, objects, config).
    /// For normal repos, this equals git_dir.
    pub common_dir: PathBuf,
}

impl DevbotPaths {
    /// Create a new DevbotPaths from git_dir and common_dir.
    pub fn new(git_dir: PathBuf, common_dir: PathBuf) -> Self {
        Self {
            git_dir,
            common_dir,
        }
    }

    /// Create DevbotPaths from an opened repository's info.
    pub fn from_repo_info(info: &RepoInfo) -> Self {
        Self {
            git_dir: info.git_dir.clone(),
            common_dir: info.common_dir.clone(),
        }
    }

    /// Root devbot directory, `<common_dir>/devbot`.
    pub fn devbot_dir(&self) -> PathBuf {
        self.common_dir.join("devbot")
    }

    /// Persisted commit queue, `<common_dir>/devbot/queue.json`.
    pub fn queue_path(&self) -> PathBuf {
        self.devbot_dir().join("queue.json")
    }

    /// Lock file guarding the queue, `<common_dir>/devbot/lock`.
    pub fn lock_path(&self) -> PathBuf {
        self.devbot_dir().join("lock")
    }

    /// Repository configuration, `<common_dir>/devbot/config.toml`.
    pub fn repo_config_path(&self) -> PathBuf {
        self.devbot_dir().join("config.toml")
    }
}
