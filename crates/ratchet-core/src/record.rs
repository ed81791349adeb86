//! Persisted migration bookkeeping rows.

use crate::migration_name::MigrationName;
use serde::{Deserialize, Serialize};

/// Name of the bookkeeping table inside the target database.
pub const LEDGER_TABLE: &str = "migrations";

/// One row of the `migrations` table.
///
/// Created when a migration is applied, deleted when it is rolled back,
/// never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Surrogate key assigned by the database
    pub id: i64,

    /// Canonical migration name (`migration` column)
    pub name: MigrationName,

    /// Batch the migration was applied in (>= 1)
    pub batch: i64,
}

/// A row about to be written to the `migrations` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMigrationRecord {
    /// Canonical migration name
    pub name: MigrationName,

    /// Batch to record
    pub batch: i64,
}
