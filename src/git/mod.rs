//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the only doorway to Git. No other module imports `git2`
//! or runs the `git` binary. The engine is written against the
//! [`VersionControl`] trait; [`Git`] implements it over a real repository
//! and [`mock::MockRepo`] implements it in memory.
//!
//! # Responsibilities
//!
//! - Repository discovery, opening and initialization
//! - Staging and committing (via `git2`)
//! - Push and fetch (via the `git` binary, bounded by a timeout)
//! - Unpushed-commit and uncommitted-path queries
//!
//! # Invariants
//!
//! - Push and fetch failures are values, never errors
//! - All operations return strong types (Oid, RepoPath)

pub mod capability;
mod interface;
pub mod mock;
mod process;

pub use capability::{
    CommitSummary, FailureKind, FetchFailure, PushFailure, PushOutcome, RemoteFailure,
    VersionControl,
};
pub use interface::{Git, GitError, RemoteSettings, RepoInfo};
