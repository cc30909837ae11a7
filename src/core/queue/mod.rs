//! core::queue
//!
//! The offline-durable commit queue.
//!
//! # Modules
//!
//! - [`record`] - One pending commit (message, files, enqueue time)
//! - [`store`] - Atomic, file-backed FIFO of records
//!
//! # Invariants
//!
//! - Replay order equals enqueue order
//! - A record leaves the queue only after its push is confirmed
//! - Unreadable state is surfaced, never discarded

pub mod record;
pub mod store;

pub use record::QueueRecord;
pub use store::{QueueError, QueueStore};
