//! Configuration types and parsing for schemaflow.yml

use crate::error::{CoreError, CoreResult};
use crate::sql_utils::is_valid_table_name;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Special database path that opens an in-memory DuckDB database.
pub const MEMORY_PATH: &str = ":memory:";

/// Main project configuration from schemaflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Table that records applied migrations
    #[serde(default = "default_history_table")]
    pub history_table: String,

    /// Directories containing migration SQL files, relative to the project root
    #[serde(default = "default_migration_paths")]
    pub migration_paths: Vec<String>,

    /// Named target configurations (e.g., dev, staging, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the DuckDB database file, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    /// Resolve the database path against the project root.
    ///
    /// `:memory:` and absolute paths are returned unchanged.
    pub fn resolve_path(&self, root: &Path) -> String {
        if self.path == MEMORY_PATH || Path::new(&self.path).is_absolute() {
            return self.path.clone();
        }
        root.join(&self.path).display().to_string()
    }
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

fn default_history_table() -> String {
    "schemaflow_migrations".to_string()
}

fn default_migration_paths() -> Vec<String> {
    vec!["migrations".to_string()]
}

fn default_db_path() -> String {
    "target/schemaflow.duckdb".to_string()
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
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for schemaflow.yml or schemaflow.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("schemaflow.yml");
        let yaml_path = dir.join("schemaflow.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if !is_valid_table_name(&self.history_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "history_table '{}' must be a plain identifier, optionally schema-qualified",
                    self.history_table
                ),
            });
        }

        if self.migration_paths.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one migration path must be configured".to_string(),
            });
        }

        Ok(())
    }

    /// Absolute migration directories for a project rooted at `root`.
    pub fn migration_paths_absolute(&self, root: &Path) -> Vec<PathBuf> {
        self.migration_paths.iter().map(|p| root.join(p)).collect()
    }

    /// Database settings for `target`, falling back to the top-level
    /// `database` section when no target is given or the target has no
    /// database override.
    pub fn database_for(&self, target: Option<&str>) -> CoreResult<&DatabaseConfig> {
        let Some(name) = target else {
            return Ok(&self.database);
        };
        let target_config = self.targets.get(name).ok_or_else(|| {
            let mut available: Vec<&str> = self.targets.keys().map(String::as_str).collect();
            available.sort_unstable();
            CoreError::ConfigInvalid {
                message: format!(
                    "Unknown target '{name}'. Available targets: [{}]",
                    available.join(", ")
                ),
            }
        })?;
        Ok(target_config.database.as_ref().unwrap_or(&self.database))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
