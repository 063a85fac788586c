//! Structured progress events.
//!
//! The [`Migrator`](crate::Migrator) reports what it does to an injected
//! [`EventSink`] instead of a process-wide logger. [`LogSink`] forwards events
//! to the `log` facade and is the default.

use std::fmt;
use std::sync::Arc;

/// Something the migrator did or observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationEvent {
    /// An applied migration matched its recorded name and hash.
    Verified { ordinal: usize, name: String },
    /// An applied migration no longer matches its history row.
    VerificationFailed {
        ordinal: usize,
        name: String,
        reason: String,
    },
    /// Dry run is about to execute a pending step.
    WouldApply { ordinal: usize, name: String },
    /// Dry run recorded a statement without sending it to the database.
    StatementSkipped { ordinal: usize, statement: String },
    /// A step and its history row were committed.
    Applied {
        ordinal: usize,
        name: String,
        hash: String,
    },
    /// A dry-run step finished and was rolled back.
    DryRunRolledBack {
        ordinal: usize,
        name: String,
        hash: String,
    },
    /// A pending step could not be applied; the run stops here.
    StepFailed {
        ordinal: usize,
        name: String,
        reason: String,
    },
}

impl MigrationEvent {
    /// Debug-level events are per-statement or per-verification chatter.
    pub fn is_debug(&self) -> bool {
        matches!(
            self,
            MigrationEvent::Verified { .. } | MigrationEvent::StatementSkipped { .. }
        )
    }

    /// True for events that report a failure.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            MigrationEvent::VerificationFailed { .. } | MigrationEvent::StepFailed { .. }
        )
    }
}

impl fmt::Display for MigrationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationEvent::Verified { ordinal, name } => {
                write!(f, "Verified migration ({ordinal}) \"{name}\"")
            }
            MigrationEvent::VerificationFailed {
                ordinal,
                name,
                reason,
            } => write!(f, "Verification failed ({ordinal}) \"{name}\": {reason}"),
            MigrationEvent::WouldApply { ordinal, name } => {
                write!(f, "Would apply migration ({ordinal}) \"{name}\"")
            }
            MigrationEvent::StatementSkipped { ordinal, statement } => {
                write!(f, "   ({ordinal}) -> {statement}")
            }
            MigrationEvent::Applied {
                ordinal,
                name,
                hash,
            } => write!(f, "Applied migration ({ordinal}) \"{name}\" [{}]", short(hash)),
            MigrationEvent::DryRunRolledBack {
                ordinal,
                name,
                hash,
            } => write!(
                f,
                "Dry run of migration ({ordinal}) \"{name}\" rolled back [{}]",
                short(hash)
            ),
            MigrationEvent::StepFailed {
                ordinal,
                name,
                reason,
            } => write!(f, "Migration failed ({ordinal}) \"{name}\": {reason}"),
        }
    }
}

fn short(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

/// Receives [`MigrationEvent`]s.
pub trait EventSink {
    fn emit(&self, event: &MigrationEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn emit(&self, event: &MigrationEvent) {
        (**self).emit(event);
    }
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &MigrationEvent) {
        if event.is_error() {
            log::error!("{event}");
        } else if event.is_debug() {
            log::debug!("{event}");
        } else {
            log::info!("{event}");
        }
    }
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &MigrationEvent) {}
}
