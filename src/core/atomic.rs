//! core::atomic
//!
//! Atomic whole-file replacement.
//!
//! Content is written to a sibling temp file, fsynced, and renamed over the
//! target. A reader sees either the old file or the new one, never a
//! partially written file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Replace the file at `path` with `contents` atomically.
///
/// Creates parent directories if needed.
///
/// # Example
///
/// ```
/// use devbot::core::atomic::write_atomic;
///
/// let dir = tempfile::TempDir::new().unwrap();
/// let path = dir.path().join("nested/state.json");
///
/// write_atomic(&path, b"[]").unwrap();
/// assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
/// ```
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_path_for(path);
    let result = (|| {
        let mut file = File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result?;

    // Persist the rename itself. Not every platform can open a directory.
    #[cfg(unix)]
    if let Some(parent) = path.parent() {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

/// Temp file used while replacing `path`: same directory, `.tmp` appended.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn replaces_existing_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("queue.json");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn leaves_no_temp_file_behind() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("queue.json");

        write_atomic(&path, b"[]").unwrap();

        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let path = Path::new("/repo/.git/devbot/queue.json");
        assert_eq!(
            temp_path_for(path),
            PathBuf::from("/repo/.git/devbot/queue.json.tmp")
        );
    }

    #[test]
    fn failed_rename_keeps_old_content() {
        let temp = TempDir::new().unwrap();
        // A directory in the way of the target makes the rename fail.
        let path = temp.path().join("blocked");
        fs::create_dir_all(path.join("inner")).unwrap();

        assert!(write_atomic(&path, b"data").is_err());
        assert!(path.is_dir());
        assert!(!temp_path_for(&path).exists());
    }
}
