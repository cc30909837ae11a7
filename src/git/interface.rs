//! git::interface
//!
//! Git interface implementation using git2.
//!
//! Local reads and writes (discovery, index, commits, history) go through
//! `git2`. The two network operations shell out to the `git` binary via
//! [`process`](super::process), bounded by the configured timeout.
//!
//! # Error Handling
//!
//! Local failures are typed [`GitError`] variants:
//! - [`GitError::NotARepo`]: no repository at or above the path
//! - [`GitError::NothingToCommit`]: the index matches HEAD
//! - [`GitError::PathNotFound`]: a file to stage is neither on disk nor tracked
//! - [`GitError::MissingIdentity`]: no `user.name` / `user.email` configured
//!
//! # Example
//!
//! ```ignore
//! use devbot::git::{Git, VersionControl};
//! use devbot::core::types::{CommitMessage, RepoPath};
//!
//! let git = Git::open(Path::new("."))?;
//! git.stage(&[RepoPath::new("src/lib.rs")?])?;
//! let oid = git.commit(&CommitMessage::new("Tidy lib")?)?;
//! println!("committed {}", oid.short(7));
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::capability::{
    CommitSummary, FailureKind, FetchFailure, PushOutcome, RemoteFailure, VersionControl,
};
use super::process::run_remote;
use crate::core::config::DEFAULT_GIT_TIMEOUT;
use crate::core::types::{CommitMessage, Oid, RepoPath, TypeError};

/// Errors from local Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// The index has no changes relative to HEAD.
    #[error("nothing to commit")]
    NothingToCommit,

    /// A path given for staging is neither on disk nor in the index.
    #[error("path not found: {path}")]
    PathNotFound { path: String },

    /// Committer identity is not configured.
    #[error("cannot determine committer identity (set user.name and user.email): {message}")]
    MissingIdentity { message: String },

    /// A path reported by git could not be represented.
    #[error("invalid path from repository: {message}")]
    InvalidPath { message: String },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError { message: String },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal { message: String },
}

impl GitError {
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("{}: repository is locked: {}", context, err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidPath(message) => GitError::InvalidPath { message },
            other => GitError::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Information about a Git repository.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Path to the per-worktree .git directory
    pub git_dir: PathBuf,
    /// Path to the shared .git directory (differs from git_dir in linked worktrees)
    pub common_dir: PathBuf,
    /// Path to the working directory
    pub work_dir: PathBuf,
}

/// Where and how long the network operations run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub name: String,
    pub timeout: Duration,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            name: "origin".to_string(),
            timeout: DEFAULT_GIT_TIMEOUT,
        }
    }
}

/// The Git interface.
///
/// This is the single point of interaction with Git. No other module
/// imports `git2` or runs the `git` binary.
pub struct Git {
    repo: git2::Repository,
    remote: RemoteSettings,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .field("remote", &self.remote.name)
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open the repository containing `path`.
    ///
    /// `path` can be any directory inside the working tree.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self {
            repo,
            remote: RemoteSettings::default(),
        })
    }

    /// Open the repository containing `path`, or `None` if there is none.
    pub fn detect(path: &Path) -> Result<Option<Self>, GitError> {
        match Self::open(path) {
            Ok(git) => Ok(Some(git)),
            Err(GitError::NotARepo { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a new repository at `path`, creating the directory if needed.
    pub fn init(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::init(path)
            .map_err(|e| GitError::from_git2(e, &path.display().to_string()))?;
        tracing::info!(path = %path.display(), "initialized repository");

        Ok(Self {
            repo,
            remote: RemoteSettings::default(),
        })
    }

    /// Use `remote` for push, fetch and the unpushed-commit query.
    pub fn with_remote(mut self, remote: RemoteSettings) -> Self {
        self.remote = remote;
        self
    }

    /// Remote settings in effect.
    pub fn remote(&self) -> &RemoteSettings {
        &self.remote
    }

    /// Get repository information (git, common and work directories).
    pub fn info(&self) -> Result<RepoInfo, GitError> {
        Ok(RepoInfo {
            git_dir: self.repo.path().to_path_buf(),
            common_dir: self.repo.commondir().to_path_buf(),
            work_dir: self.work_dir()?.to_path_buf(),
        })
    }

    /// Root of the working tree.
    pub fn work_dir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or(GitError::BareRepo)
    }

    // =========================================================================
    // HEAD
    // =========================================================================

    /// Get the current branch name, if on a branch.
    ///
    /// Returns `None` if HEAD is detached. An unborn branch (no commits yet)
    /// still has a name.
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(String::from)),
            Ok(_) => Ok(None),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD")?;
                Ok(head
                    .symbolic_target()
                    .and_then(|t| t.strip_prefix("refs/heads/"))
                    .map(String::from))
            }
            Err(e) => Err(GitError::from_git2(e, "HEAD")),
        }
    }

    /// HEAD commit, or `None` in a repository with no commits.
    pub fn head_oid(&self) -> Result<Option<Oid>, GitError> {
        match self.head_commit()? {
            Some(commit) => Ok(Some(Oid::new(commit.id().to_string())?)),
            None => Ok(None),
        }
    }

    fn head_commit(&self) -> Result<Option<git2::Commit<'_>>, GitError> {
        match self.repo.head() {
            Ok(head) => Ok(Some(
                head.peel_to_commit()
                    .map_err(|e| GitError::from_git2(e, "HEAD"))?,
            )),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(GitError::from_git2(e, "HEAD")),
        }
    }

    fn tracking_ref(&self) -> Result<Option<git2::Oid>, GitError> {
        let Some(branch) = self.current_branch()? else {
            return Ok(None);
        };
        let refname = format!("refs/remotes/{}/{}", self.remote.name, branch);
        match self.repo.refname_to_id(&refname) {
            Ok(oid) => Ok(Some(oid)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::from_git2(e, &refname)),
        }
    }
}

impl VersionControl for Git {
    fn stage(&self, files: &[RepoPath]) -> Result<(), GitError> {
        let work_dir = self.work_dir()?;
        let mut index = self.repo.index().map_err(|e| GitError::from_git2(e, "index"))?;

        for file in files {
            let on_disk = work_dir.join(file.as_path()).symlink_metadata().is_ok();
            if on_disk {
                index
                    .add_path(file.as_path())
                    .map_err(|e| GitError::from_git2(e, file.as_str()))?;
            } else if index.get_path(file.as_path(), 0).is_some() {
                index
                    .remove_path(file.as_path())
                    .map_err(|e| GitError::from_git2(e, file.as_str()))?;
            } else {
                return Err(GitError::PathNotFound {
                    path: file.as_str().to_string(),
                });
            }
        }

        index.write().map_err(|e| GitError::from_git2(e, "index"))?;
        tracing::debug!(count = files.len(), "staged files");
        Ok(())
    }

    fn commit(&self, message: &CommitMessage) -> Result<Oid, GitError> {
        let mut index = self.repo.index().map_err(|e| GitError::from_git2(e, "index"))?;
        let tree_oid = index
            .write_tree()
            .map_err(|e| GitError::from_git2(e, "write tree"))?;

        let parent = self.head_commit()?;
        let unchanged = match &parent {
            Some(parent) => parent.tree_id() == tree_oid,
            None => index.is_empty(),
        };
        if unchanged {
            return Err(GitError::NothingToCommit);
        }

        let tree = self.repo.find_tree(tree_oid)?;
        let signature = self.repo.signature().map_err(|e| GitError::MissingIdentity {
            message: e.message().to_string(),
        })?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message.as_str(),
                &tree,
                &parents,
            )
            .map_err(|e| GitError::from_git2(e, "commit"))?;

        tracing::debug!(%oid, summary = message.summary(), "created commit");
        Ok(Oid::new(oid.to_string())?)
    }

    fn push(&self) -> PushOutcome {
        let work_dir = match self.work_dir() {
            Ok(dir) => dir,
            Err(e) => return PushOutcome::Failed(RemoteFailure::new(FailureKind::Other, e.to_string())),
        };

        match run_remote(
            work_dir,
            &["push", "--quiet", &self.remote.name, "HEAD"],
            self.remote.timeout,
        ) {
            Ok(()) => PushOutcome::Pushed,
            Err(failure) => PushOutcome::Failed(failure),
        }
    }

    fn fetch(&self) -> Result<(), FetchFailure> {
        let work_dir = self
            .work_dir()
            .map_err(|e| RemoteFailure::new(FailureKind::Other, e.to_string()))?;
        run_remote(
            work_dir,
            &["fetch", "--quiet", &self.remote.name],
            self.remote.timeout,
        )
    }

    fn unpushed_commits(&self) -> Result<Vec<CommitSummary>, GitError> {
        let Some(head) = self.head_commit()? else {
            return Ok(Vec::new());
        };

        let mut walk = self.repo.revwalk()?;
        walk.push(head.id())?;
        if let Some(tracking) = self.tracking_ref()? {
            walk.hide(tracking)?;
        }

        let mut commits = Vec::new();
        for oid in walk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(CommitSummary {
                oid: Oid::new(oid.to_string())?,
                summary: commit.summary().unwrap_or("").to_string(),
            });
        }
        Ok(commits)
    }

    fn uncommitted_paths(&self) -> Result<Vec<RepoPath>, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(false)
            .include_ignored(false)
            .renames_head_to_index(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::from_git2(e, "status"))?;

        let mut paths = Vec::new();
        for entry in statuses.iter() {
            let status = entry.status();
            if status.is_wt_new() || status.is_ignored() {
                continue;
            }
            let Some(path) = entry.path() else {
                tracing::warn!("skipping non-UTF-8 path in status");
                continue;
            };
            paths.push(RepoPath::new(path)?);
        }

        paths.sort();
        paths.dedup();
        Ok(paths)
    }
}
