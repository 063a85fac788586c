//! sf-migrate - Migration engine for Schemaflow
//!
//! Given an ordered list of [`Migration`]s and a [`HistoryStore`], the
//! [`Migrator`] works out which steps are already applied, verifies that none
//! of them changed since (by name and by statement fingerprint), and applies
//! the rest one transaction per step.
//!
//! [`HistoryStore`]: sf_db::HistoryStore

pub mod error;
pub mod events;
pub mod executor;
pub mod migration;
pub mod migrator;
pub mod report;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{MigrateError, MigrateResult};
pub use events::{EventSink, LogSink, MigrationEvent, NullSink};
pub use migration::{Migration, StepError, StepResult, Transaction};
pub use migrator::Migrator;
pub use report::{MigrationReport, MigrationState, MigrationStatus, StepOutcome};
pub use verifier::{pure_digest, verify_history, FingerprintCollector};
