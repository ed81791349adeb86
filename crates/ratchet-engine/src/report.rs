//! Results of migrator operations

use ratchet_core::{MigrationCandidate, MigrationName, MigrationRecord};
use serde::Serialize;

/// Outcome of a successful `up`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpReport {
    /// Batch the applied migrations were recorded under, or the unchanged
    /// version when nothing was pending
    pub batch: i64,

    /// Applied migrations, oldest first
    pub applied: Vec<MigrationName>,
}

impl UpReport {
    /// Whether nothing was pending
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Outcome of a successful `rollback`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackReport {
    /// Batch that was reverted, or 0 when nothing was applied
    pub batch: i64,

    /// Reverted migrations, newest first
    pub reverted: Vec<MigrationName>,
}

impl RollbackReport {
    /// Whether nothing was reverted
    pub fn is_noop(&self) -> bool {
        self.reverted.is_empty()
    }
}

/// Snapshot of files versus records
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Current version
    pub version: i64,

    /// Every known migration, oldest first
    pub migrations: Vec<MigrationCandidate>,

    /// Records without migration files
    pub orphaned: Vec<MigrationRecord>,
}

impl StatusReport {
    /// Number of migrations not yet applied
    pub fn pending_count(&self) -> usize {
        self.migrations.iter().filter(|m| !m.has_applied).count()
    }
}
