//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::Project;

/// Store configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Database file, overriding the discovered .autoparts/store.db
    pub database: Option<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,

    /// Ask before deleting records
    pub confirm_delete: Option<bool>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Global user config (~/.config/autoparts/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            let base = global_path.parent().map(Path::to_path_buf).unwrap_or_default();
            if let Some(global) = Self::read(&global_path, &base) {
                config.merge(global);
            }
        }

        // 2. Store config (.autoparts/config.yaml)
        if let Ok(project) = Project::discover() {
            if let Some(local) = Self::project_layer(&project) {
                config.merge(local);
            }
        }

        // 3. Environment variables
        if let Ok(database) = std::env::var("AUTOPARTS_DATABASE") {
            if !database.is_empty() {
                config.database = Some(PathBuf::from(database));
            }
        }
        if let Ok(format) = std::env::var("AUTOPARTS_FORMAT") {
            if !format.is_empty() {
                config.default_format = Some(format);
            }
        }

        config
    }

    /// The store's own config; a relative `database` is taken from the store root
    fn project_layer(project: &Project) -> Option<Config> {
        Self::read(&project.config_path(), project.root())
    }

    /// Read one config file, resolving a relative `database` against `base`
    fn read(path: &Path, base: &Path) -> Option<Config> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(mut config) => {
                if let Some(database) = config.database.take() {
                    config.database = Some(if database.is_relative() {
                        base.join(database)
                    } else {
                        database
                    });
                }
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "autoparts")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.confirm_delete.is_some() {
            self.confirm_delete = other.confirm_delete;
        }
    }

    pub fn confirm_delete(&self) -> bool {
        self.confirm_delete.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            database: Some(PathBuf::from("a.db")),
            default_format: Some("csv".to_string()),
            confirm_delete: None,
        };
        base.merge(Config {
            database: Some(PathBuf::from("b.db")),
            default_format: None,
            confirm_delete: Some(false),
        });

        assert_eq!(base.database, Some(PathBuf::from("b.db")));
        assert_eq!(base.default_format.as_deref(), Some("csv"));
        assert!(!base.confirm_delete());
    }

    #[test]
    fn test_parse_yaml() {
        let config: Config =
            serde_yml::from_str("database: /tmp/shop.db\nconfirm_delete: false\n").unwrap();
        assert_eq!(config.database, Some(PathBuf::from("/tmp/shop.db")));
        assert!(!config.confirm_delete());
        assert!(Config::default().confirm_delete());
    }

    #[test]
    fn test_relative_database_resolves_against_store_root() {
        let tmp = tempfile::TempDir::new().unwrap();
        Project::init(tmp.path(), false).unwrap();
        std::fs::write(
            tmp.path().join(".autoparts/config.yaml"),
            "database: shop.db\n",
        )
        .unwrap();
        let nested = tmp.path().join("invoices/2024");
        std::fs::create_dir_all(&nested).unwrap();

        let project = Project::discover_from(&nested).unwrap();
        let config = Config::project_layer(&project).unwrap();
        assert_eq!(config.database, Some(project.root().join("shop.db")));
    }

    #[test]
    fn test_absolute_database_is_kept() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "database: /srv/shop.db\n").unwrap();

        let config = Config::read(&path, Path::new("/elsewhere")).unwrap();
        assert_eq!(config.database, Some(PathBuf::from("/srv/shop.db")));
    }
}
