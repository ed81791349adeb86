//! Persisted migration state
//!
//! Thin layer over the bookkeeping table. Nothing is cached: every call
//! re-queries the database, so the version is always current.

use crate::error::{EngineError, EngineResult};
use ratchet_core::{MigrationCandidate, MigrationName, MigrationRecord, NewMigrationRecord, LEDGER_TABLE};
use ratchet_db::Database;

/// Reads and writes migration records through a borrowed connection
pub struct StateStore<'a> {
    db: &'a dyn Database,
}

impl<'a> StateStore<'a> {
    /// Wrap a database connection
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Highest persisted batch, or 0 when nothing has been applied
    pub fn current_version(&self) -> EngineResult<i64> {
        let batch = self.db.max_batch().map_err(EngineError::Query)?;
        Ok(batch.unwrap_or(0))
    }

    /// Persisted records ordered by id.
    ///
    /// With `filter_to_current_version` only the records of the latest batch
    /// are returned.
    pub fn list_records(&self, filter_to_current_version: bool) -> EngineResult<Vec<MigrationRecord>> {
        let batch = if filter_to_current_version {
            Some(self.current_version()?)
        } else {
            None
        };
        self.db.ledger_records(batch).map_err(EngineError::Query)
    }

    /// Record every candidate that was not applied before, each under its
    /// target batch, in a single transaction.
    pub fn insert_applied(&self, candidates: &[MigrationCandidate]) -> EngineResult<usize> {
        let records: Vec<NewMigrationRecord> = candidates
            .iter()
            .filter(|c| !c.has_applied)
            .map(|c| NewMigrationRecord {
                name: c.name.clone(),
                batch: c.target_batch,
            })
            .collect();
        if records.is_empty() {
            return Ok(0);
        }
        self.db
            .insert_ledger_records(&records)
            .map_err(EngineError::Query)?;
        log::debug!("Recorded {} migration(s)", records.len());
        Ok(records.len())
    }

    /// Remove the record for `name`; absent records are not an error
    pub fn delete_by_name(&self, name: &MigrationName) -> EngineResult<()> {
        let removed = self
            .db
            .delete_ledger_record(name)
            .map_err(EngineError::Query)?;
        if removed == 0 {
            log::debug!("No record to delete for {}", name);
        }
        Ok(())
    }

    /// Create the bookkeeping table when it is missing.
    ///
    /// Returns `true` when the table was created by this call.
    pub fn ensure_schema(&self) -> EngineResult<bool> {
        let exists = self
            .db
            .relation_exists(LEDGER_TABLE)
            .map_err(|e| EngineError::Schema {
                message: format!("cannot probe for the {} table: {}", LEDGER_TABLE, e),
            })?;
        if exists {
            return Ok(false);
        }
        self.db.create_ledger().map_err(|e| EngineError::Schema {
            message: format!("cannot create the {} table: {}", LEDGER_TABLE, e),
        })?;
        log::debug!("Created {} table in {}", LEDGER_TABLE, self.db.database_name());
        Ok(true)
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
