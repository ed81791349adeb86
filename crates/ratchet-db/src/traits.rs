//! Database trait definitions
//!
//! The engine only sees these traits. [`Database`] is the umbrella trait
//! object it is handed; the sub-traits group the operations by concern.

use crate::error::DbResult;
use ratchet_core::{MigrationName, MigrationRecord, NewMigrationRecord};

/// Connection-level operations and raw SQL execution
pub trait DatabaseCore {
    /// Round-trip a trivial query to prove the connection is alive
    fn ping(&self) -> DbResult<()>;

    /// Execute one or more SQL statements as a single unit, as given
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Check if a table or view exists in the target database
    fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Reads and writes against the `migrations` bookkeeping table
pub trait DatabaseLedger {
    /// Create the bookkeeping table
    fn create_ledger(&self) -> DbResult<()>;

    /// Highest recorded batch, or `None` when the table is empty
    fn max_batch(&self) -> DbResult<Option<i64>>;

    /// All rows ordered by id, or only the rows of `batch` when given
    fn ledger_records(&self, batch: Option<i64>) -> DbResult<Vec<MigrationRecord>>;

    /// Insert all rows in one transaction; an empty slice is a no-op
    fn insert_ledger_records(&self, records: &[NewMigrationRecord]) -> DbResult<()>;

    /// Delete the row for `name`, returning how many rows were removed
    fn delete_ledger_record(&self, name: &MigrationName) -> DbResult<usize>;
}

/// Lifecycle of the target database itself
pub trait DatabaseCatalog {
    /// Name the target database is known by
    fn database_name(&self) -> &str;

    /// Whether the target database currently exists
    fn database_exists(&self) -> DbResult<bool>;

    /// Drop the target database and everything in it
    fn drop_database(&self) -> DbResult<()>;

    /// Create the (empty) target database and make it current
    fn create_database(&self) -> DbResult<()>;
}

/// Everything the migration engine needs from a backend
pub trait Database: DatabaseCore + DatabaseLedger + DatabaseCatalog {}

impl<T: DatabaseCore + DatabaseLedger + DatabaseCatalog> Database for T {}
