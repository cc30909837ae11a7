//! devbot - commit, push, and queue commits while offline
//!
//! devbot stages and commits files, pushes them, and when the remote cannot
//! be reached keeps the commit in a durable queue that is replayed, in
//! order, on a later run.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Orchestrates Drain → Dispatch → Report and emits events
//! - [`core`] - Domain types, queue store, lock, config, and project registry
//! - [`git`] - Single interface for all Git operations
//! - [`net`] - Connectivity probe
//! - [`ui`] - Terminal rendering of engine events
//!
//! # Correctness Invariants
//!
//! devbot maintains the following invariants:
//!
//! 1. Queued commits are replayed in the order they were queued
//! 2. A record leaves the queue only after its push is confirmed
//! 3. A corrupt queue is reported, never overwritten
//! 4. Queueing while offline never changes the repository

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod net;
pub mod ui;
