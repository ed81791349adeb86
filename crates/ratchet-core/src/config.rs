//! Configuration types and parsing for ratchet.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file names searched for in a project directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["ratchet.yml", "ratchet.yaml"];

/// Catalog names DuckDB reserves for itself.
const RESERVED_DATABASE_NAMES: [&str; 3] = ["memory", "system", "temp"];

/// Project configuration from ratchet.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the `.up.sql` / `.down.sql` pairs, relative to the project root
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,

    /// Target database connection
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Named target configurations (e.g., dev, staging, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Migrations directory override
    #[serde(default)]
    pub migrations_path: Option<String>,
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Catalog name the database is attached under
    #[serde(default = "default_db_name")]
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            name: default_db_name(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_path: default_migrations_path(),
            database: DatabaseConfig::default(),
            targets: HashMap::new(),
        }
    }
}

const DEFAULT_DB_PATH: &str = ":memory:";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_db_name() -> String {
    "main_db".to_string()
}

fn default_migrations_path() -> String {
    "migrations".to_string()
}

impl DatabaseConfig {
    /// Whether the database lives only in memory
    pub fn is_in_memory(&self) -> bool {
        self.path == DEFAULT_DB_PATH
    }

    /// Check that `name` can be used as an unquoted DuckDB catalog identifier.
    pub fn validate(&self) -> CoreResult<()> {
        let name = &self.name;
        let valid_chars = name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
        let starts_ok = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_chars || !starts_ok {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "database.name '{}' must start with a letter or '_' and contain only letters, digits, and '_'",
                    name
                ),
            });
        }
        if RESERVED_DATABASE_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
            return Err(CoreError::ConfigInvalid {
                message: format!("database.name '{}' is reserved by DuckDB", name),
            });
        }
        if self.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for ratchet.yml or ratchet.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Load from `dir` when a config file exists there, otherwise fall back to defaults.
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::load_from_dir(dir) {
            Err(CoreError::ConfigNotFound { path }) => {
                log::debug!("No config at {}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.migrations_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_path cannot be empty".to_string(),
            });
        }
        self.database.validate()?;
        for (name, target) in &self.targets {
            if let Some(db) = &target.database {
                db.validate().map_err(|e| CoreError::ConfigInvalid {
                    message: format!("target '{}': {}", name, e),
                })?;
            }
        }
        Ok(())
    }

    /// Sorted names of the configured targets
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn lookup_target(&self, name: &str) -> CoreResult<&TargetConfig> {
        self.targets.get(name).ok_or_else(|| CoreError::ConfigInvalid {
            message: format!(
                "Target '{}' not found. Available targets: {}",
                name,
                self.available_targets().join(", ")
            ),
        })
    }

    /// Get database configuration, optionally applying target overrides
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => Ok(self
                .lookup_target(name)?
                .database
                .clone()
                .unwrap_or_else(|| self.database.clone())),
            None => Ok(self.database.clone()),
        }
    }

    /// Absolute migrations directory, optionally applying target overrides
    pub fn migrations_path_absolute(&self, root: &Path, target: Option<&str>) -> CoreResult<PathBuf> {
        let relative = match target {
            Some(name) => self
                .lookup_target(name)?
                .migrations_path
                .as_deref()
                .unwrap_or(&self.migrations_path),
            None => &self.migrations_path,
        };
        Ok(root.join(relative))
    }

    /// Resolve target from CLI flag or RATCHET_TARGET environment variable
    ///
    /// Priority: CLI flag > RATCHET_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var("RATCHET_TARGET").ok())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
