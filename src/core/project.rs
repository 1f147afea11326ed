//! Store directory discovery and layout

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the directory that marks a store root
pub const STORE_DIR: &str = ".autoparts";

/// File name of the database inside the store directory
pub const DATABASE_FILE: &str = "store.db";

/// A directory containing a `.autoparts/` store
#[derive(Debug)]
pub struct Project {
    /// Parent of .autoparts/
    root: PathBuf,
}

impl Project {
    /// Find the store root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the store root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(STORE_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create the store directory with a default config.
    ///
    /// With `force` an existing directory is reused and its config rewritten.
    pub fn init(path: &Path, force: bool) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let store_dir = root.join(STORE_DIR);
        if store_dir.exists() && !force {
            return Err(ProjectError::AlreadyExists(root));
        }

        std::fs::create_dir_all(&store_dir).map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(store_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# Auto-parts store configuration

# Database file (default: .autoparts/store.db)
# database: ""

# Default output format (auto, tsv, csv, md, json, id)
# default_format: auto

# Ask before deleting records
# confirm_delete: true
"#
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The .autoparts directory
    pub fn store_dir(&self) -> PathBuf {
        self.root.join(STORE_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.store_dir().join("config.yaml")
    }

    pub fn database_path(&self) -> PathBuf {
        self.store_dir().join(DATABASE_FILE)
    }
}

/// Errors that can occur while locating or creating a store directory
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no auto-parts store found (searched from {searched_from:?}). Run 'autoparts init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("auto-parts store already exists at {0:?} (use --force to reinitialise)")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_store_dir() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();

        assert!(project.store_dir().is_dir());
        assert!(project.config_path().exists());
        assert_eq!(project.database_path().file_name().unwrap(), DATABASE_FILE);
    }

    #[test]
    fn test_init_fails_if_exists_unless_forced() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path(), false).unwrap();

        let err = Project::init(tmp.path(), false).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
        assert!(Project::init(tmp.path(), true).is_ok());
    }

    #[test]
    fn test_discover_walks_up() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path(), false).unwrap();

        let subdir = tmp.path().join("invoices/2024");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_discover_fails_without_store_dir() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }
}
