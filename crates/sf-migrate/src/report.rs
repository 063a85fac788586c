//! Results returned to callers.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of `migrate()` or `dry_run()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// True when nothing was committed
    pub dry_run: bool,
    /// Number of previously applied migrations that passed verification
    pub verified: usize,
    /// Steps executed in this run, in order
    pub steps: Vec<StepOutcome>,
}

impl MigrationReport {
    /// Ordinals executed in this run.
    pub fn ordinals(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.ordinal).collect()
    }

    /// True when there was nothing pending.
    pub fn is_up_to_date(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A single executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub ordinal: usize,
    pub name: String,
    /// Fingerprint digest written (or, in a dry run, that would be written)
    pub hash: String,
    /// Number of `execute` calls the step made
    pub statements: usize,
}

/// Where a migration stands relative to the history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationState {
    Applied,
    Pending,
    /// A history row with no supplied migration at its ordinal
    Unknown,
}

impl std::fmt::Display for MigrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationState::Applied => write!(f, "applied"),
            MigrationState::Pending => write!(f, "pending"),
            MigrationState::Unknown => write!(f, "unknown"),
        }
    }
}

/// One line of `status()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub ordinal: usize,
    pub name: String,
    pub state: MigrationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
}
