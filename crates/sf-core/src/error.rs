//! Error types for sf-core

use thiserror::Error;

/// Core error type for Schemaflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Migration directory not found
    #[error("[E003] Migration directory not found: {path}")]
    MigrationDirNotFound { path: String },

    /// E004: Two migration files resolve to the same name
    #[error("[E004] Duplicate migration name '{name}': {first} and {second}")]
    DuplicateMigration {
        name: String,
        first: String,
        second: String,
    },

    /// E005: Migration file name cannot be turned into a migration name
    #[error("[E005] Invalid migration file name: {path}")]
    InvalidMigrationFile { path: String },

    /// E006: IO error with file path context
    #[error("[E006] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E007: YAML parse error
    #[error("[E007] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
