//! DuckDB history store implementation

use crate::error::{DbError, DbResult};
use crate::traits::{AppliedRecord, HistoryStore, NewHistoryRow, StoreTransaction};
use chrono::{DateTime, Utc};
use duckdb::Connection;
use sf_core::sql_utils::{is_valid_table_name, quote_ident, quote_qualified, split_schema};
use std::path::Path;

/// Default name of the history table.
pub const DEFAULT_HISTORY_TABLE: &str = "schemaflow_migrations";

/// DuckDB-backed history store.
///
/// Single-threaded: migrations run sequentially, so the connection is owned
/// directly rather than behind a `Mutex`.
pub struct DuckDbBackend {
    conn: Connection,
    table: String,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::from_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Wrap an existing connection using the default history table.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            table: DEFAULT_HISTORY_TABLE.to_string(),
        }
    }

    /// Use `name` as the history table instead of the default.
    pub fn with_history_table(mut self, name: &str) -> DbResult<Self> {
        if !is_valid_table_name(name) {
            return Err(DbError::InvalidTableName(name.to_string()));
        }
        self.table = name.to_string();
        Ok(self)
    }

    /// Name of the history table (unquoted).
    pub fn history_table(&self) -> &str {
        &self.table
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn quoted_table(&self) -> String {
        quote_qualified(&self.table)
    }
}

impl HistoryStore for DuckDbBackend {
    fn ping(&self) -> DbResult<()> {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
            .map_err(|e| DbError::ConnectionError(format!("ping failed: {e}")))?;
        Ok(())
    }

    fn ensure_history_table(&self) -> DbResult<()> {
        let mut ddl = String::new();
        if let (Some(schema), _) = split_schema(&self.table) {
            ddl.push_str(&format!("CREATE SCHEMA IF NOT EXISTS {};\n", quote_ident(schema)));
        }
        ddl.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 id          INTEGER     NOT NULL PRIMARY KEY,
                 name        VARCHAR     NOT NULL,
                 hash        VARCHAR(64) NOT NULL,
                 \"timestamp\" TIMESTAMP   NOT NULL DEFAULT now()
             );",
            self.quoted_table()
        ));
        self.conn.execute_batch(&ddl).map_err(|e| {
            DbError::ExecutionError(format!(
                "failed to create history table {}: {e}",
                self.table
            ))
        })?;
        log::debug!("History table {} ready", self.table);
        Ok(())
    }

    fn applied_count(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", self.quoted_table()),
                [],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(format!("count failed for {}: {e}", self.table)))?;
        usize::try_from(count).map_err(|_| DbError::MalformedRow(format!("negative count {count}")))
    }

    fn applied_records(&self) -> DbResult<Vec<AppliedRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, hash, epoch_ms(\"timestamp\") FROM {} ORDER BY id",
            self.quoted_table()
        ))?;
        let raw_rows: Vec<(i64, String, String, i64)> = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw_rows
            .into_iter()
            .map(|(id, name, hash, applied_ms)| {
                let ordinal = usize::try_from(id)
                    .map_err(|_| DbError::MalformedRow(format!("negative id {id} for {name}")))?;
                let applied_at = DateTime::<Utc>::from_timestamp_millis(applied_ms)
                    .ok_or_else(|| {
                        DbError::MalformedRow(format!("timestamp out of range for {name}"))
                    })?;
                Ok(AppliedRecord {
                    ordinal,
                    name,
                    hash,
                    applied_at,
                })
            })
            .collect()
    }

    fn begin(&self) -> DbResult<Box<dyn StoreTransaction + '_>> {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(Box::new(DuckDbTransaction {
            conn: &self.conn,
            table: self.quoted_table(),
            finished: false,
        }))
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// An open `BEGIN TRANSACTION` on a [`DuckDbBackend`] connection.
struct DuckDbTransaction<'a> {
    conn: &'a Connection,
    table: String,
    finished: bool,
}

impl StoreTransaction for DuckDbTransaction<'_> {
    fn execute(&mut self, sql: &str) -> DbResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn insert_history(&mut self, row: &NewHistoryRow) -> DbResult<()> {
        let id = i64::try_from(row.ordinal)
            .map_err(|_| DbError::ExecutionError(format!("ordinal {} too large", row.ordinal)))?;
        self.conn
            .execute(
                &format!("INSERT INTO {} (id, name, hash) VALUES (?, ?, ?)", self.table),
                duckdb::params![id, row.name, row.hash],
            )
            .map_err(|e| {
                DbError::ExecutionError(format!("failed to record migration {id}: {e}"))
            })?;
        Ok(())
    }

    fn commit(mut self: Box<Self>) -> DbResult<()> {
        self.finished = true;
        if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
            let _ = self.conn.execute_batch("ROLLBACK");
            return Err(DbError::TransactionError(format!(
                "COMMIT failed: {commit_err}"
            )));
        }
        Ok(())
    }

    fn rollback(mut self: Box<Self>) -> DbResult<()> {
        self.finished = true;
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }
}

impl Drop for DuckDbTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                log::warn!("Rollback of abandoned transaction failed: {e}");
            }
        }
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
