//! sf-core - Core library for Schemaflow
//!
//! This crate provides shared types used across all Schemaflow components:
//! project configuration, the [`MigrationName`] newtype, the statement
//! [`Fingerprint`] used for drift detection, and SQL migration file discovery.

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod migration_file;
pub mod migration_name;
pub mod sql_utils;

pub use config::{Config, DatabaseConfig};
pub use error::{CoreError, CoreResult};
pub use fingerprint::Fingerprint;
pub use migration_file::{discover_migrations, MigrationFile};
pub use migration_name::MigrationName;
