//! History store trait definitions

use crate::error::DbResult;
use chrono::{DateTime, Utc};

/// One row of the migration history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRecord {
    /// Zero-based position of the migration in the supplied sequence
    pub ordinal: usize,
    /// Migration name at the time it was applied
    pub name: String,
    /// Fingerprint digest of the statements the migration issued
    pub hash: String,
    /// When the row was committed
    pub applied_at: DateTime<Utc>,
}

/// Payload for a new history row. The timestamp is filled in by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryRow {
    pub ordinal: usize,
    pub name: String,
    pub hash: String,
}

/// Persistent record of applied migrations.
///
/// Implementations are synchronous; one orchestration call drives one store
/// at a time.
pub trait HistoryStore {
    /// Cheap reachability probe
    fn ping(&self) -> DbResult<()>;

    /// Create the history table if it does not exist
    fn ensure_history_table(&self) -> DbResult<()>;

    /// Number of history rows
    fn applied_count(&self) -> DbResult<usize>;

    /// All history rows ordered by ordinal
    fn applied_records(&self) -> DbResult<Vec<AppliedRecord>>;

    /// Open a transaction
    fn begin(&self) -> DbResult<Box<dyn StoreTransaction + '_>>;

    /// Backend identifier for logging
    fn db_type(&self) -> &'static str;
}

/// A live transaction against a [`HistoryStore`].
///
/// Dropping a transaction without calling [`commit`](Self::commit) or
/// [`rollback`](Self::rollback) discards its effects.
pub trait StoreTransaction {
    /// Execute one SQL text; it may contain several statements
    fn execute(&mut self, sql: &str) -> DbResult<()>;

    /// Append a history row inside this transaction
    fn insert_history(&mut self, row: &NewHistoryRow) -> DbResult<()>;

    /// Make all effects of this transaction durable
    fn commit(self: Box<Self>) -> DbResult<()>;

    /// Discard all effects of this transaction
    fn rollback(self: Box<Self>) -> DbResult<()>;
}
