//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`CommitMessage`] - Non-empty commit message
//! - [`RepoPath`] - Validated path relative to the working tree root
//! - [`Oid`] - Git object identifier (SHA)
//! - [`QueueTimestamp`] - Local wall-clock time in `YYYY-MM-DD HH:MM:SS` form
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so a queue record loaded from disk is exactly as
//! valid as one built in memory.
//!
//! # Examples
//!
//! ```
//! use devbot::core::types::{CommitMessage, Oid, RepoPath};
//!
//! let message = CommitMessage::new("fix bug").unwrap();
//! let path = RepoPath::new("src/main.rs").unwrap();
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//!
//! assert!(CommitMessage::new("   ").is_err());
//! assert!(RepoPath::new("../outside.txt").is_err());
//! assert!(Oid::new("not-a-sha").is_err());
//! # let _ = (message, path, oid);
//! ```

use std::path::{Component, Path};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid commit message: {0}")]
    InvalidMessage(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("a commit needs at least one file")]
    EmptyFileSet,
}

/// A commit message.
///
/// Must contain at least one non-whitespace character. The text is kept
/// exactly as given so the commit made on replay matches what was typed.
///
/// # Example
///
/// ```
/// use devbot::core::types::CommitMessage;
///
/// let msg = CommitMessage::new("Add parser").unwrap();
/// assert_eq!(msg.as_str(), "Add parser");
/// assert_eq!(msg.summary(), "Add parser");
///
/// assert!(CommitMessage::new("").is_err());
/// assert!(CommitMessage::new("\n\t").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitMessage(String);

impl CommitMessage {
    /// Create a new validated commit message.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidMessage` if the message is blank or
    /// contains a NUL byte.
    pub fn new(message: impl Into<String>) -> Result<Self, TypeError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(TypeError::InvalidMessage(
                "commit message cannot be empty".into(),
            ));
        }
        if message.contains('\0') {
            return Err(TypeError::InvalidMessage(
                "commit message cannot contain NUL".into(),
            ));
        }
        Ok(Self(message))
    }

    /// Get the message as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First line of the message, trimmed.
    pub fn summary(&self) -> &str {
        self.0.trim().lines().next().unwrap_or("").trim()
    }
}

impl TryFrom<String> for CommitMessage {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CommitMessage> for String {
    fn from(message: CommitMessage) -> Self {
        message.0
    }
}

impl AsRef<str> for CommitMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A path relative to the working tree root.
///
/// Paths are stored with `/` separators, as Git stores them in the index.
/// Rules:
/// - Cannot be empty
/// - Cannot be absolute
/// - Cannot contain `..` components (no escaping the working tree)
/// - Cannot point into `.git`
///
/// # Example
///
/// ```
/// use devbot::core::types::RepoPath;
///
/// let path = RepoPath::new("./src/lib.rs").unwrap();
/// assert_eq!(path.as_str(), "src/lib.rs");
///
/// assert!(RepoPath::new("").is_err());
/// assert!(RepoPath::new("/etc/passwd").is_err());
/// assert!(RepoPath::new("a/../../b").is_err());
/// assert!(RepoPath::new(".git/config").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoPath(String);

impl RepoPath {
    /// Create a new validated repository path.
    ///
    /// Leading `./` components are dropped and `\` separators are
    /// normalized to `/`.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPath` if the path breaks any rule above.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let raw = path.into();
        if raw.contains('\0') {
            return Err(TypeError::InvalidPath("path cannot contain NUL".into()));
        }

        let unified = raw.replace('\\', "/");
        if unified.starts_with('/') || Path::new(&raw).is_absolute() {
            return Err(TypeError::InvalidPath(format!(
                "'{}' must be relative to the repository root",
                raw
            )));
        }

        let mut parts = Vec::new();
        for component in Path::new(&unified).components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part) => {
                    let part = part.to_str().ok_or_else(|| {
                        TypeError::InvalidPath(format!("'{}' is not valid UTF-8", raw))
                    })?;
                    parts.push(part);
                }
                Component::ParentDir => {
                    return Err(TypeError::InvalidPath(format!(
                        "'{}' cannot contain '..'",
                        raw
                    )));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(TypeError::InvalidPath(format!(
                        "'{}' must be relative to the repository root",
                        raw
                    )));
                }
            }
        }

        if parts.is_empty() {
            return Err(TypeError::InvalidPath("path cannot be empty".into()));
        }
        if parts[0] == ".git" {
            return Err(TypeError::InvalidPath(format!(
                "'{}' points inside the .git directory",
                raw
            )));
        }

        Ok(Self(parts.join("/")))
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the path as a `Path`.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl TryFrom<String> for RepoPath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RepoPath> for String {
    fn from(path: RepoPath) -> Self {
        path.0
    }
}

impl AsRef<str> for RepoPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use devbot::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a valid hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    /// Get an abbreviated form of the OID.
    ///
    /// Returns the first `len` characters. If `len` exceeds the OID length,
    /// returns the full OID.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the OID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local wall-clock time with second precision.
///
/// Serialized as `YYYY-MM-DD HH:MM:SS`, the format of the persisted queue
/// file. No timezone is stored.
///
/// # Example
///
/// ```
/// use devbot::core::types::QueueTimestamp;
///
/// let ts = QueueTimestamp::parse("2024-03-01 09:15:00").unwrap();
/// assert_eq!(ts.to_string(), "2024-03-01 09:15:00");
/// assert_eq!(ts.time_of_day(), "09:15:00");
///
/// assert!(QueueTimestamp::parse("2024-03-01T09:15:00Z").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueueTimestamp(NaiveDateTime);

impl QueueTimestamp {
    /// On-disk format.
    pub const FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// The current local time, truncated to whole seconds.
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    /// Wrap a naive local time, dropping sub-second precision.
    pub fn from_naive(at: NaiveDateTime) -> Self {
        use chrono::Timelike;
        Self(at.with_nanosecond(0).unwrap_or(at))
    }

    /// Parse the on-disk format.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTimestamp` if `s` is not `YYYY-MM-DD HH:MM:SS`.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        NaiveDateTime::parse_from_str(s, Self::FORMAT)
            .map(Self)
            .map_err(|e| TypeError::InvalidTimestamp(format!("'{}': {}", s, e)))
    }

    /// The underlying naive time.
    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// `HH:MM:SS` part only.
    pub fn time_of_day(&self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }
}

impl TryFrom<String> for QueueTimestamp {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<QueueTimestamp> for String {
    fn from(ts: QueueTimestamp) -> Self {
        ts.to_string()
    }
}

impl std::fmt::Display for QueueTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}
