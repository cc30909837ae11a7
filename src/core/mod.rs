//! core
//!
//! Core domain types, persisted state, and configuration for devbot.
//!
//! # Modules
//!
//! - [`types`] - Strong types: CommitMessage, RepoPath, Oid, QueueTimestamp
//! - [`queue`] - Pending commit records and their durable store
//! - [`lock`] - Exclusive lock around queue mutation
//! - [`config`] - Configuration schema and loading
//! - [`registry`] - Named project directories
//! - [`paths`] - Centralized path routing for devbot storage
//! - [`atomic`] - Whole-file atomic replacement
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid records at construction time
//! - Persisted state is rewritten atomically, never patched in place
//! - Nothing here touches the network

pub mod atomic;
pub mod config;
pub mod lock;
pub mod paths;
pub mod queue;
pub mod registry;
pub mod types;
