//! core::lock
//!
//! Exclusive lock around queue mutation.
//!
//! # Architecture
//!
//! Draining and dispatching both load the queue, change it, and save it back.
//! Two devbot processes doing that at once against one repository would
//! lose records, so every load-mutate-save sequence runs while holding this
//! lock. Read-only commands (`status`, `queue`) do not take it.
//!
//! The lock lives at `<common_dir>/devbot/lock`, shared by all worktrees of
//! the repository, matching where the queue itself lives.
//!
//! # Invariants
//!
//! - Acquisition is non-blocking (fails fast if another process holds it)
//! - The lock is released on drop (RAII)
//!
//! # Example
//!
//! ```ignore
//! use devbot::core::lock::QueueLock;
//!
//! let lock = QueueLock::acquire(&paths)?;
//! // drain, dispatch
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};

use fs2::FileExt;
use thiserror::Error;

use crate::core::paths::DevbotPaths;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("the commit queue is locked by another devbot process")]
    AlreadyLocked,

    /// Failed to create lock file or directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),
}

/// An exclusive lock on a repository's commit queue.
///
/// The OS lock is held for as long as this value lives.
#[derive(Debug)]
pub struct QueueLock {
    file: File,
}

impl QueueLock {
    /// Attempt to acquire the queue lock.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(paths: &DevbotPaths) -> Result<Self, LockError> {
        let dir = paths.devbot_dir();
        fs::create_dir_all(&dir).map_err(|e| {
            LockError::CreateFailed(format!("cannot create {}: {}", dir.display(), e))
        })?;

        let path = paths.lock_path();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "queue lock acquired");
                Ok(Self { file })
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(LockError::AlreadyLocked),
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
                Err(LockError::AlreadyLocked)
            }
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }
}

impl Drop for QueueLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
