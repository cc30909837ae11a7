//! core::registry
//!
//! Read-only lookup of named project directories.
//!
//! # Format
//!
//! ```json
//! {
//!   "projects": { "api": "/home/me/src/api", "site": "/home/me/src/site" },
//!   "default": "api"
//! }
//! ```
//!
//! devbot only reads this file. Adding or removing projects happens outside
//! the tool.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from registry lookups.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read project registry '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse project registry '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unknown project '{name}' (registered: {known})")]
    UnknownProject { name: String, known: String },

    #[error("default project '{0}' is not registered")]
    DanglingDefault(String),
}

/// Name-to-path mapping of registered projects.
///
/// # Example
///
/// ```
/// use devbot::core::registry::ProjectRegistry;
///
/// let registry: ProjectRegistry = serde_json::from_str(
///     r#"{"projects": {"api": "/src/api"}, "default": "api"}"#,
/// )
/// .unwrap();
///
/// assert_eq!(registry.names(), vec!["api"]);
/// assert_eq!(registry.resolve("api").unwrap().to_str(), Some("/src/api"));
/// assert!(registry.resolve("web").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRegistry {
    #[serde(default)]
    projects: BTreeMap<String, PathBuf>,
    #[serde(default)]
    default: Option<String>,
}

impl ProjectRegistry {
    /// Load the registry at `path`.
    ///
    /// A missing file is an empty registry.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(RegistryError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|e| RegistryError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Directory registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&Path, RegistryError> {
        self.projects
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| RegistryError::UnknownProject {
                name: name.to_string(),
                known: if self.projects.is_empty() {
                    "none".to_string()
                } else {
                    self.names().join(", ")
                },
            })
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.projects.keys().map(String::as_str).collect()
    }

    /// The default project and its directory, if one is set.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DanglingDefault`] if the default names a
    /// project that is not registered.
    pub fn default_project(&self) -> Result<Option<(&str, &Path)>, RegistryError> {
        match &self.default {
            None => Ok(None),
            Some(name) => match self.projects.get(name) {
                Some(path) => Ok(Some((name.as_str(), path.as_path()))),
                None => Err(RegistryError::DanglingDefault(name.clone())),
            },
        }
    }

    /// Name of the default project, without checking it is registered.
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// True when no projects are registered.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_registry(temp: &TempDir, json: &str) -> PathBuf {
        let path = temp.path().join("projects.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = ProjectRegistry::load(&temp.path().join("nope.json")).unwrap();
        assert!(registry.is_empty());
        assert!(registry.default_project().unwrap().is_none());
    }

    #[test]
    fn names_are_sorted() {
        let temp = TempDir::new().unwrap();
        let path = write_registry(
            &temp,
            r#"{"projects": {"zeta": "/z", "alpha": "/a"}, "default": null}"#,
        );

        let registry = ProjectRegistry::load(&path).unwrap();
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn unknown_project_lists_known_names() {
        let registry: ProjectRegistry =
            serde_json::from_str(r#"{"projects": {"api": "/src/api"}}"#).unwrap();

        let err = registry.resolve("web").unwrap_err();
        assert!(err.to_string().contains("api"));
    }

    #[test]
    fn default_must_be_registered() {
        let registry: ProjectRegistry =
            serde_json::from_str(r#"{"projects": {}, "default": "gone"}"#).unwrap();

        assert!(matches!(
            registry.default_project(),
            Err(RegistryError::DanglingDefault(_))
        ));
        assert_eq!(registry.default_name(), Some("gone"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = write_registry(&temp, "{not json");

        assert!(matches!(
            ProjectRegistry::load(&path),
            Err(RegistryError::Parse { .. })
        ));
    }
}
