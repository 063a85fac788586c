//! Shared test utilities for sf-migrate

use crate::events::{EventSink, MigrationEvent};
use crate::migration::Migration;
use chrono::Utc;
use sf_db::{AppliedRecord, DbError, DbResult, HistoryStore, NewHistoryRow, StoreTransaction};
use std::cell::{Cell, RefCell};
use std::sync::{Arc, Mutex};

/// Sink that keeps every event for later assertions.
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<MigrationEvent>>,
}

impl RecordingSink {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn events(&self) -> Vec<MigrationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &MigrationEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Migration that executes each statement in turn.
pub(crate) fn stmts(name: &str, statements: &[&'static str]) -> Migration {
    let statements = statements.to_vec();
    Migration::new(name, move |tx| {
        for s in &statements {
            tx.execute(s)?;
        }
        Ok(())
    })
}

/// Migration whose code fails after issuing `before`.
pub(crate) fn failing(name: &str, before: &'static str) -> Migration {
    Migration::new(name, move |tx| {
        tx.execute(before)?;
        Err("step refused".into())
    })
}

/// Which operation a [`FakeStore`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailAt {
    Nothing,
    Ping,
    Bootstrap,
    Begin,
    Insert,
    Commit,
    Rollback,
}

/// In-memory store with injectable failures.
pub(crate) struct FakeStore {
    pub(crate) fail_at: Cell<FailAt>,
    pub(crate) executed: RefCell<Vec<String>>,
    pub(crate) records: RefCell<Vec<AppliedRecord>>,
    pub(crate) rollbacks: Cell<usize>,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self::failing_at(FailAt::Nothing)
    }

    pub(crate) fn failing_at(fail_at: FailAt) -> Self {
        Self {
            fail_at: Cell::new(fail_at),
            executed: RefCell::new(Vec::new()),
            records: RefCell::new(Vec::new()),
            rollbacks: Cell::new(0),
        }
    }

    fn check(&self, op: FailAt) -> DbResult<()> {
        if self.fail_at.get() == op {
            Err(DbError::ExecutionError(format!("injected {op:?} failure")))
        } else {
            Ok(())
        }
    }
}

impl HistoryStore for FakeStore {
    fn ping(&self) -> DbResult<()> {
        self.check(FailAt::Ping)
    }

    fn ensure_history_table(&self) -> DbResult<()> {
        self.check(FailAt::Bootstrap)
    }

    fn applied_count(&self) -> DbResult<usize> {
        Ok(self.records.borrow().len())
    }

    fn applied_records(&self) -> DbResult<Vec<AppliedRecord>> {
        Ok(self.records.borrow().clone())
    }

    fn begin(&self) -> DbResult<Box<dyn StoreTransaction + '_>> {
        self.check(FailAt::Begin)?;
        Ok(Box::new(FakeTx {
            store: self,
            statements: Vec::new(),
            rows: Vec::new(),
        }))
    }

    fn db_type(&self) -> &'static str {
        "fake"
    }
}

struct FakeTx<'a> {
    store: &'a FakeStore,
    statements: Vec<String>,
    rows: Vec<NewHistoryRow>,
}

impl StoreTransaction for FakeTx<'_> {
    fn execute(&mut self, sql: &str) -> DbResult<()> {
        if sql.starts_with("FAIL") {
            return Err(DbError::ExecutionError(format!("cannot run {sql}")));
        }
        self.statements.push(sql.to_string());
        Ok(())
    }

    fn insert_history(&mut self, row: &NewHistoryRow) -> DbResult<()> {
        self.store.check(FailAt::Insert)?;
        self.rows.push(row.clone());
        Ok(())
    }

    fn commit(self: Box<Self>) -> DbResult<()> {
        self.store.check(FailAt::Commit)?;
        self.store.executed.borrow_mut().extend(self.statements);
        self.store
            .records
            .borrow_mut()
            .extend(self.rows.into_iter().map(|row| AppliedRecord {
                ordinal: row.ordinal,
                name: row.name,
                hash: row.hash,
                applied_at: Utc::now(),
            }));
        Ok(())
    }

    fn rollback(self: Box<Self>) -> DbResult<()> {
        self.store.rollbacks.set(self.store.rollbacks.get() + 1);
        self.store.check(FailAt::Rollback)
    }
}
