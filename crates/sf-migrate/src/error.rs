//! Error types for the migration engine.

use crate::migration::StepError;
use sf_db::DbError;
use thiserror::Error;

/// Migration engine errors.
///
/// Every variant that concerns a specific step carries its ordinal and name.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// The store failed its reachability probe at construction (M001).
    #[error("[M001] Could not connect to database: {0}")]
    ConnectionError(#[source] DbError),

    /// The history table could not be created (M002).
    #[error("[M002] Could not create migration history table: {0}")]
    SchemaBootstrapError(#[source] DbError),

    /// More history rows than supplied migrations (M003).
    #[error("[M003] Found more applied migrations than supplied: {applied} applied, {supplied} supplied")]
    HistoryOverrun { applied: usize, supplied: usize },

    /// An applied migration was renamed (M004).
    #[error("[M004] Migration ({ordinal}) name changed: current \"{current}\" != applied \"{applied}\"")]
    NameDrift {
        ordinal: usize,
        current: String,
        applied: String,
    },

    /// An applied migration now issues different statements (M005).
    #[error("[M005] Migration ({ordinal}) \"{name}\" changed after it was applied: recorded hash {expected}, current hash {actual}")]
    HashDrift {
        ordinal: usize,
        name: String,
        expected: String,
        actual: String,
    },

    /// A pending step's code returned an error; its transaction was rolled back (M006).
    #[error("[M006] Migration ({ordinal}) \"{name}\" returned an error: {source}")]
    StepFailed {
        ordinal: usize,
        name: String,
        source: StepError,
    },

    /// The history row could not be written; the whole step was rolled back (M007).
    #[error("[M007] Migration ({ordinal}) \"{name}\" could not be recorded: {source}")]
    PersistenceError {
        ordinal: usize,
        name: String,
        source: DbError,
    },

    /// Opening or committing a step's transaction failed (M008).
    #[error("[M008] Migration ({ordinal}) \"{name}\" transaction failed: {source}")]
    TransactionError {
        ordinal: usize,
        name: String,
        source: DbError,
    },

    /// Rolling back a step's transaction failed (M009).
    #[error("[M009] Migration ({ordinal}) \"{name}\" could not be rolled back after: {cause}: {source}")]
    RollbackFailed {
        ordinal: usize,
        name: String,
        cause: String,
        source: DbError,
    },

    /// Reading the history table failed (M010).
    #[error("[M010] Could not read migration history: {0}")]
    Store(#[from] DbError),

    /// History ids are not the contiguous prefix 0..n (M011).
    #[error("[M011] Migration history has a gap: expected id {ordinal}, found id {found} (\"{name}\")")]
    HistoryGap {
        ordinal: usize,
        found: usize,
        name: String,
    },
}

impl MigrateError {
    /// Ordinal of the migration this error concerns, if any.
    pub fn ordinal(&self) -> Option<usize> {
        match self {
            MigrateError::NameDrift { ordinal, .. }
            | MigrateError::HashDrift { ordinal, .. }
            | MigrateError::StepFailed { ordinal, .. }
            | MigrateError::PersistenceError { ordinal, .. }
            | MigrateError::TransactionError { ordinal, .. }
            | MigrateError::RollbackFailed { ordinal, .. }
            | MigrateError::HistoryGap { ordinal, .. } => Some(*ordinal),
            MigrateError::ConnectionError(_)
            | MigrateError::SchemaBootstrapError(_)
            | MigrateError::HistoryOverrun { .. }
            | MigrateError::Store(_) => None,
        }
    }

    /// True for errors raised by the drift scan (renamed, modified or gapped history).
    pub fn is_drift(&self) -> bool {
        matches!(
            self,
            MigrateError::NameDrift { .. }
                | MigrateError::HashDrift { .. }
                | MigrateError::HistoryGap { .. }
        )
    }
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
