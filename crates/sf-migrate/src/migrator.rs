//! Migration orchestration.
//!
//! [`Migrator`] splits the supplied sequence into an applied prefix and a
//! pending suffix, verifies the prefix, and applies the suffix strictly in
//! order. Each pending step gets its own transaction:
//!
//! 1. `BEGIN`
//! 2. run the step through an [`Executor`]
//! 3. on error: `ROLLBACK`, stop with [`MigrateError::StepFailed`]
//! 4. insert the history row in the same transaction
//! 5. on insert error: `ROLLBACK`, stop with [`MigrateError::PersistenceError`]
//! 6. dry run: `ROLLBACK`; otherwise `COMMIT`
//!
//! The first failure halts the run. Nothing is retried.
//!
//! Concurrent migrators against one database are not guarded against; no lock
//! is taken on the history table.

use crate::error::{MigrateError, MigrateResult};
use crate::events::{EventSink, LogSink, MigrationEvent};
use crate::executor::Executor;
use crate::migration::Migration;
use crate::report::{MigrationReport, MigrationState, MigrationStatus, StepOutcome};
use crate::verifier::verify_history;
use sf_db::{AppliedRecord, HistoryStore, NewHistoryRow};

/// Applies an ordered list of migrations to a [`HistoryStore`].
pub struct Migrator<S: HistoryStore> {
    store: S,
    migrations: Vec<Migration>,
    sink: Box<dyn EventSink>,
}

impl<S: HistoryStore> Migrator<S> {
    /// Probe the store and make sure the history table exists.
    ///
    /// Fails fast with [`MigrateError::ConnectionError`] when the store is
    /// unreachable rather than on first use.
    pub fn new(store: S, migrations: Vec<Migration>) -> MigrateResult<Self> {
        store.ping().map_err(MigrateError::ConnectionError)?;
        store
            .ensure_history_table()
            .map_err(MigrateError::SchemaBootstrapError)?;
        log::debug!(
            "Migrator ready on {} with {} migrations",
            store.db_type(),
            migrations.len()
        );
        Ok(Self {
            store,
            migrations,
            sink: Box::new(LogSink),
        })
    }

    /// Report events to `sink` instead of the `log` facade.
    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The supplied migrations, in order.
    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the store, e.g. to build a migrator with a longer sequence.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Number of applied migrations, without materializing the history.
    pub fn applied_count(&self) -> MigrateResult<usize> {
        Ok(self.store.applied_count()?)
    }

    /// Full migration history, ordered by ordinal.
    pub fn applied(&self) -> MigrateResult<Vec<AppliedRecord>> {
        Ok(self.store.applied_records()?)
    }

    /// Supplied migrations past the applied prefix.
    pub fn pending(&self) -> MigrateResult<&[Migration]> {
        let applied = self.applied_count()?;
        self.migrations
            .get(applied..)
            .ok_or(MigrateError::HistoryOverrun {
                applied,
                supplied: self.migrations.len(),
            })
    }

    /// Check the applied history against the supplied migrations.
    ///
    /// Read-only. Returns the number of verified migrations.
    pub fn verify(&self) -> MigrateResult<usize> {
        let applied = self.applied()?;
        verify_history(&applied, &self.migrations, self.sink.as_ref())
    }

    /// Verify, then apply and commit every pending migration.
    pub fn migrate(&self) -> MigrateResult<MigrationReport> {
        self.run(false)
    }

    /// Verify, then execute every pending migration and roll each one back.
    ///
    /// Statements are hashed but never sent to the database, and the history
    /// insert is rolled back, so a dry run leaves no persisted trace.
    pub fn dry_run(&self) -> MigrateResult<MigrationReport> {
        self.run(true)
    }

    /// Applied/pending state of every supplied migration, plus any history
    /// rows beyond the supplied sequence. Does not verify hashes.
    pub fn status(&self) -> MigrateResult<Vec<MigrationStatus>> {
        let applied = self.applied()?;
        let len = self.migrations.len().max(applied.len());
        let status = (0..len)
            .map(|ordinal| match (self.migrations.get(ordinal), applied.get(ordinal)) {
                (Some(migration), Some(record)) => MigrationStatus {
                    ordinal,
                    name: migration.name().to_string(),
                    state: MigrationState::Applied,
                    hash: Some(record.hash.clone()),
                    applied_at: Some(record.applied_at),
                },
                (Some(migration), None) => MigrationStatus {
                    ordinal,
                    name: migration.name().to_string(),
                    state: MigrationState::Pending,
                    hash: None,
                    applied_at: None,
                },
                (None, Some(record)) => MigrationStatus {
                    ordinal,
                    name: record.name.clone(),
                    state: MigrationState::Unknown,
                    hash: Some(record.hash.clone()),
                    applied_at: Some(record.applied_at),
                },
                (None, None) => unreachable!("ordinal below max of both lengths"),
            })
            .collect();
        Ok(status)
    }

    fn run(&self, dry_run: bool) -> MigrateResult<MigrationReport> {
        let verified = self.verify()?;

        let mut steps = Vec::new();
        for (ordinal, migration) in self.migrations.iter().enumerate().skip(verified) {
            if dry_run {
                self.sink.emit(&MigrationEvent::WouldApply {
                    ordinal,
                    name: migration.name().to_string(),
                });
            }
            match self.apply_step(ordinal, migration, dry_run) {
                Ok(outcome) => steps.push(outcome),
                Err(err) => {
                    self.sink.emit(&MigrationEvent::StepFailed {
                        ordinal,
                        name: migration.name().to_string(),
                        reason: err.to_string(),
                    });
                    return Err(err);
                }
            }
        }

        Ok(MigrationReport {
            dry_run,
            verified,
            steps,
        })
    }

    fn apply_step(
        &self,
        ordinal: usize,
        migration: &Migration,
        dry_run: bool,
    ) -> MigrateResult<StepOutcome> {
        let name = migration.name().to_string();
        let tx = self
            .store
            .begin()
            .map_err(|source| MigrateError::TransactionError {
                ordinal,
                name: name.clone(),
                source,
            })?;

        let mut executor = Executor::new(tx, ordinal, dry_run, self.sink.as_ref());
        let result = migration.run(&mut executor);
        let (mut tx, fingerprint) = executor.finish();
        let hash = fingerprint.digest();

        if let Err(source) = result {
            tx.rollback()
                .map_err(|rollback_err| MigrateError::RollbackFailed {
                    ordinal,
                    name: name.clone(),
                    cause: source.to_string(),
                    source: rollback_err,
                })?;
            return Err(MigrateError::StepFailed {
                ordinal,
                name,
                source,
            });
        }

        let row = NewHistoryRow {
            ordinal,
            name: name.clone(),
            hash: hash.clone(),
        };
        if let Err(source) = tx.insert_history(&row) {
            tx.rollback()
                .map_err(|rollback_err| MigrateError::RollbackFailed {
                    ordinal,
                    name: name.clone(),
                    cause: source.to_string(),
                    source: rollback_err,
                })?;
            return Err(MigrateError::PersistenceError {
                ordinal,
                name,
                source,
            });
        }

        if dry_run {
            tx.rollback()
                .map_err(|rollback_err| MigrateError::RollbackFailed {
                    ordinal,
                    name: name.clone(),
                    cause: "dry run".to_string(),
                    source: rollback_err,
                })?;
            self.sink.emit(&MigrationEvent::DryRunRolledBack {
                ordinal,
                name: name.clone(),
                hash: hash.clone(),
            });
        } else {
            tx.commit()
                .map_err(|source| MigrateError::TransactionError {
                    ordinal,
                    name: name.clone(),
                    source,
                })?;
            self.sink.emit(&MigrationEvent::Applied {
                ordinal,
                name: name.clone(),
                hash: hash.clone(),
            });
        }

        Ok(StepOutcome {
            ordinal,
            name,
            hash,
            statements: fingerprint.statements(),
        })
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
