//! Error types for sf-db

use thiserror::Error;

/// History store errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction management error (D003)
    #[error("[D003] Transaction failed: {0}")]
    TransactionError(String),

    /// History table name rejected (D004)
    #[error("[D004] Invalid history table name '{0}': must be a plain identifier, optionally schema-qualified")]
    InvalidTableName(String),

    /// A history row could not be decoded (D005)
    #[error("[D005] Malformed history row: {0}")]
    MalformedRow(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
