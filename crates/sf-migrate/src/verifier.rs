//! Drift detection against the recorded migration history.

use crate::error::{MigrateError, MigrateResult};
use crate::events::{EventSink, MigrationEvent};
use crate::migration::{Migration, StepResult, Transaction};
use sf_core::Fingerprint;
use sf_db::AppliedRecord;

/// A [`Transaction`] that only records statements.
///
/// Used to recompute a migration's digest without touching the database.
#[derive(Debug, Default)]
pub struct FingerprintCollector {
    fingerprint: Fingerprint,
}

impl FingerprintCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn digest(&self) -> String {
        self.fingerprint.digest()
    }
}

impl Transaction for FingerprintCollector {
    fn execute(&mut self, statement: &str) -> StepResult {
        self.fingerprint.record(statement);
        Ok(())
    }
}

/// Digest of the statements `migration` issues, computed without a database.
///
/// An error from the step code is ignored: the digest covers whatever was
/// issued before it, which is what the live executor hashed at apply time.
pub fn pure_digest(migration: &Migration) -> String {
    let mut collector = FingerprintCollector::new();
    if let Err(e) = migration.run(&mut collector) {
        log::trace!("pure run of \"{}\" returned {e}", migration.name());
    }
    collector.digest()
}

/// Check every history row against the supplied migration at the same ordinal.
///
/// Rows are read in id order and must carry ids `0..n`; a skipped id is a
/// [`MigrateError::HistoryGap`]. Names are compared before hashes, so a
/// renamed migration reports [`MigrateError::NameDrift`] even if its content
/// also changed. Returns the
/// number of verified rows, which is also the number of applied migrations.
pub fn verify_history(
    applied: &[AppliedRecord],
    supplied: &[Migration],
    sink: &dyn EventSink,
) -> MigrateResult<usize> {
    if applied.len() > supplied.len() {
        return Err(MigrateError::HistoryOverrun {
            applied: applied.len(),
            supplied: supplied.len(),
        });
    }

    for (ordinal, (record, migration)) in applied.iter().zip(supplied).enumerate() {
        if let Err(err) = verify_one(ordinal, record, migration) {
            sink.emit(&MigrationEvent::VerificationFailed {
                ordinal,
                name: record.name.clone(),
                reason: err.to_string(),
            });
            return Err(err);
        }
        sink.emit(&MigrationEvent::Verified {
            ordinal,
            name: record.name.clone(),
        });
    }
    Ok(applied.len())
}

fn verify_one(ordinal: usize, record: &AppliedRecord, migration: &Migration) -> MigrateResult<()> {
    if record.ordinal != ordinal {
        return Err(MigrateError::HistoryGap {
            ordinal,
            found: record.ordinal,
            name: record.name.clone(),
        });
    }
    if migration.name() != &record.name {
        return Err(MigrateError::NameDrift {
            ordinal,
            current: migration.name().to_string(),
            applied: record.name.clone(),
        });
    }
    let actual = pure_digest(migration);
    if actual != record.hash {
        return Err(MigrateError::HashDrift {
            ordinal,
            name: record.name.clone(),
            expected: record.hash.clone(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "verifier_test.rs"]
mod tests;
