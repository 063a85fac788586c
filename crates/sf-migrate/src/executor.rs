//! The live [`Transaction`] handed to pending steps.

use crate::events::{EventSink, MigrationEvent};
use crate::migration::{StepResult, Transaction};
use sf_core::Fingerprint;
use sf_db::StoreTransaction;

/// Records every statement into a [`Fingerprint`] and, unless running dry,
/// forwards it to the store transaction.
///
/// Statements are recorded before they execute, so the digest of a step that
/// fails mid-way covers the failing statement too. Pure-mode verification
/// records the same way, which keeps apply-time and verify-time digests equal.
pub struct Executor<'a> {
    tx: Box<dyn StoreTransaction + 'a>,
    fingerprint: Fingerprint,
    ordinal: usize,
    dry_run: bool,
    sink: &'a dyn EventSink,
}

impl<'a> Executor<'a> {
    pub fn new(
        tx: Box<dyn StoreTransaction + 'a>,
        ordinal: usize,
        dry_run: bool,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            tx,
            fingerprint: Fingerprint::new(),
            ordinal,
            dry_run,
            sink,
        }
    }

    /// Digest of the statements issued so far.
    pub fn digest(&self) -> String {
        self.fingerprint.digest()
    }

    /// Give back the transaction and the accumulated fingerprint.
    pub fn finish(self) -> (Box<dyn StoreTransaction + 'a>, Fingerprint) {
        (self.tx, self.fingerprint)
    }
}

impl Transaction for Executor<'_> {
    fn execute(&mut self, statement: &str) -> StepResult {
        self.fingerprint.record(statement);
        if self.dry_run {
            self.sink.emit(&MigrationEvent::StatementSkipped {
                ordinal: self.ordinal,
                statement: statement.to_string(),
            });
            return Ok(());
        }
        self.tx.execute(statement)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
