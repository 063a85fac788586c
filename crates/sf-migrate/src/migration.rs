//! Migration step definitions and the capability they receive.

use sf_core::MigrationName;
use std::fmt;

/// Error a migration step may return. Any error type converts into it via `?`.
pub type StepError = Box<dyn std::error::Error + Send + Sync>;

/// Result of running a migration step or one of its statements.
pub type StepResult = Result<(), StepError>;

/// The only capability a migration step gets.
///
/// Steps can issue statements but never see the connection, so they cannot
/// commit, roll back, or escape the per-step transaction.
pub trait Transaction {
    /// Execute one SQL text (which may hold several statements).
    fn execute(&mut self, statement: &str) -> StepResult;
}

type StepFn = dyn Fn(&mut dyn Transaction) -> StepResult;

/// A named migration step.
///
/// The ordinal is implicit: it is the step's position in the slice handed to
/// the [`Migrator`](crate::Migrator). Step code must issue the same statements
/// every time it runs, since its fingerprint is recomputed on every
/// verification.
pub struct Migration {
    name: MigrationName,
    code: Box<StepFn>,
}

impl Migration {
    /// Create a migration from a name and step code.
    ///
    /// Meant for names written in code. Names read from files or user input
    /// go through [`Migration::try_new`] or [`Migration::from_name`].
    ///
    /// # Panics
    /// Panics if `name` is empty.
    pub fn new<F>(name: impl Into<String>, code: F) -> Self
    where
        F: Fn(&mut dyn Transaction) -> StepResult + 'static,
    {
        Self::from_name(MigrationName::new(name), code)
    }

    /// Like [`Migration::new`], but returns `None` for an empty name.
    pub fn try_new<F>(name: impl Into<String>, code: F) -> Option<Self>
    where
        F: Fn(&mut dyn Transaction) -> StepResult + 'static,
    {
        MigrationName::try_new(name).map(|name| Self::from_name(name, code))
    }

    /// Create a migration from a validated name and step code.
    pub fn from_name<F>(name: MigrationName, code: F) -> Self
    where
        F: Fn(&mut dyn Transaction) -> StepResult + 'static,
    {
        Self {
            name,
            code: Box::new(code),
        }
    }

    /// A migration that executes `sql` as a single call.
    pub fn sql(name: MigrationName, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self::from_name(name, move |tx| tx.execute(&sql))
    }

    /// The migration's name.
    pub fn name(&self) -> &MigrationName {
        &self.name
    }

    /// Run the step code against `tx`.
    pub fn run(&self, tx: &mut dyn Transaction) -> StepResult {
        (self.code)(tx)
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl From<sf_core::MigrationFile> for Migration {
    fn from(file: sf_core::MigrationFile) -> Self {
        Migration::sql(file.name, file.sql)
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
