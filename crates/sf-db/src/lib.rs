//! sf-db - History store layer for Schemaflow
//!
//! This crate defines the boundary between the migration engine and the
//! database: the [`HistoryStore`] and [`StoreTransaction`] traits, the
//! [`AppliedRecord`] row type, and a DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{AppliedRecord, HistoryStore, NewHistoryRow, StoreTransaction};
