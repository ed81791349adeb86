//! Execution of migration SQL files

use crate::error::{EngineError, EngineResult};
use ratchet_core::discovery::read_migration;
use ratchet_core::MigrationName;
use ratchet_db::Database;
use std::path::Path;

/// Runs the SQL of one migration file at a time.
///
/// The whole file is sent as one batch; statements are not split and
/// failures are not retried.
pub struct Executor<'a> {
    db: &'a dyn Database,
}

impl<'a> Executor<'a> {
    /// Wrap a database connection
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Execute `sql` on behalf of `migration`
    pub fn run(&self, migration: &MigrationName, sql: &str) -> EngineResult<()> {
        self.db
            .execute_batch(sql)
            .map_err(|e| EngineError::Execution {
                migration: migration.clone(),
                message: e.to_string(),
            })
    }

    /// Read the file at `path` and execute it.
    ///
    /// An unreadable file fails the same way as failing SQL.
    pub fn run_file(&self, migration: &MigrationName, path: &Path) -> EngineResult<()> {
        log::debug!("Executing {}", path.display());
        let sql = read_migration(path).map_err(|e| EngineError::Execution {
            migration: migration.clone(),
            message: format!("cannot read file: {}", e),
        })?;
        self.run(migration, &sql)
    }
}
