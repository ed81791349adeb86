//! Progress events emitted by the migrator
//!
//! The engine decides what happened; a [`ProgressSink`] decides whether and
//! how to show it.

use crate::error::EngineError;
use ratchet_core::{MigrationName, MigrationRecord};

/// A step of a migration operation
#[derive(Debug)]
pub enum MigrationEvent<'a> {
    /// About to run an up file
    Migrating { name: &'a MigrationName },

    /// Up file ran successfully
    Migrated { name: &'a MigrationName },

    /// An up or down file failed
    Failed {
        name: &'a MigrationName,
        error: &'a EngineError,
    },

    /// About to run a down file during rollback
    RollingBack { name: &'a MigrationName },

    /// Down file ran and the record was removed
    RolledBack { name: &'a MigrationName },

    /// A dirty run is being compensated
    Compensating { count: usize },

    /// A down file failed during compensation
    CompensationFailed {
        name: &'a MigrationName,
        error: &'a EngineError,
    },

    /// Compensation sweep finished
    Compensated { reverted: usize, failed: usize },

    /// The target database was dropped
    DatabaseDropped { database: &'a str },

    /// The target database was dropped and created empty
    DatabaseReset { database: &'a str },

    /// A record has no migration files on disk
    OrphanedRecord { record: &'a MigrationRecord },
}

/// Receives progress events
pub trait ProgressSink {
    /// Handle one event; called synchronously as the operation runs
    fn emit(&self, event: &MigrationEvent<'_>);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: &MigrationEvent<'_>) {}
}
