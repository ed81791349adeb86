//! DuckDB database backend implementation
//!
//! The backend opens an in-memory host connection and ATTACHes the target
//! database under its configured name, then `USE`s it. Dropping the target
//! is a DETACH (plus deleting its file), which is what lets `down` and
//! `fresh` work against an embedded engine that has no `DROP DATABASE`.

use crate::error::{DbError, DbResult};
use crate::traits::{DatabaseCatalog, DatabaseCore, DatabaseLedger};
use duckdb::Connection;
use ratchet_core::{DatabaseConfig, MigrationName, MigrationRecord, NewMigrationRecord, LEDGER_TABLE};
use std::path::Path;

/// Catalog of the host connection the target is attached to
const HOST_CATALOG: &str = "memory";

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Connection,
    config: DatabaseConfig,
}

impl DuckDbBackend {
    /// Open the database described by `config`, creating it if needed
    pub fn open(config: &DatabaseConfig) -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        let backend = Self {
            conn,
            config: config.clone(),
        };
        backend
            .attach()
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", config.path, e)))?;
        Ok(backend)
    }

    /// Create an in-memory target database named `name`
    pub fn in_memory(name: &str) -> DbResult<Self> {
        Self::open(&DatabaseConfig {
            path: ":memory:".to_string(),
            name: name.to_string(),
        })
    }

    /// Create a file-backed target database named `name`
    pub fn from_path(path: &Path, name: &str) -> DbResult<Self> {
        Self::open(&DatabaseConfig {
            path: path.display().to_string(),
            name: name.to_string(),
        })
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Fully-qualified name of the bookkeeping table
    fn ledger_table(&self) -> String {
        format!("{}.main.{}", self.config.name, LEDGER_TABLE)
    }

    fn attach(&self) -> DbResult<()> {
        let sql = format!(
            "ATTACH '{}' AS {}; USE {};",
            self.config.path.replace('\'', "''"),
            self.config.name,
            self.config.name
        );
        self.conn.execute_batch(&sql)?;
        log::debug!("Attached {} as {}", self.config.path, self.config.name);
        Ok(())
    }

    fn remove_database_files(&self) -> DbResult<()> {
        if self.config.is_in_memory() {
            return Ok(());
        }
        let wal = format!("{}.wal", self.config.path);
        for path in [self.config.path.as_str(), wal.as_str()] {
            let path = Path::new(path);
            if path.exists() {
                std::fs::remove_file(path).map_err(|e| DbError::FileRemoval {
                    path: path.display().to_string(),
                    source: e,
                })?;
            }
        }
        Ok(())
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    fn transaction<F, T>(&self, body: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(_) => {
                let _ = self.conn.execute_batch("ROLLBACK");
            }
        }
        result
    }
}

impl DatabaseCore for DuckDbBackend {
    fn ping(&self) -> DbResult<()> {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(())
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables
                 WHERE table_catalog = ? AND table_schema = 'main' AND table_name = ?",
                duckdb::params![self.config.name, name],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count > 0)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

fn record_from_row(row: &duckdb::Row<'_>) -> duckdb::Result<MigrationRecord> {
    Ok(MigrationRecord {
        id: row.get(0)?,
        name: MigrationName::new(row.get::<_, String>(1)?),
        batch: row.get(2)?,
    })
}

impl DatabaseLedger for DuckDbBackend {
    fn create_ledger(&self) -> DbResult<()> {
        let sql = format!(
            "CREATE TABLE {} (
                 id        BIGINT PRIMARY KEY,
                 migration VARCHAR NOT NULL UNIQUE,
                 batch     BIGINT NOT NULL
             )",
            self.ledger_table()
        );
        self.conn.execute_batch(&sql)?;
        Ok(())
    }

    fn max_batch(&self) -> DbResult<Option<i64>> {
        let sql = format!("SELECT MAX(batch) FROM {}", self.ledger_table());
        let batch = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(batch)
    }

    fn ledger_records(&self, batch: Option<i64>) -> DbResult<Vec<MigrationRecord>> {
        let table = self.ledger_table();

        let records = match batch {
            Some(batch) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT id, migration, batch FROM {table} WHERE batch = ? ORDER BY id"
                ))?;
                let rows = stmt.query_map(duckdb::params![batch], record_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("SELECT id, migration, batch FROM {table} ORDER BY id"))?;
                let rows = stmt.query_map([], record_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(records)
    }

    fn insert_ledger_records(&self, records: &[NewMigrationRecord]) -> DbResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let table = self.ledger_table();
        let sql = format!(
            "INSERT INTO {table} (id, migration, batch)
             SELECT COALESCE(MAX(id), 0) + 1, ?, ? FROM {table}"
        );
        self.transaction(|conn| {
            for record in records {
                conn.execute(&sql, duckdb::params![record.name.as_str(), record.batch])?;
            }
            Ok(())
        })
    }

    fn delete_ledger_record(&self, name: &MigrationName) -> DbResult<usize> {
        let sql = format!("DELETE FROM {} WHERE migration = ?", self.ledger_table());
        let removed = self.conn.execute(&sql, duckdb::params![name.as_str()])?;
        Ok(removed)
    }
}

impl DatabaseCatalog for DuckDbBackend {
    fn database_name(&self) -> &str {
        &self.config.name
    }

    fn database_exists(&self) -> DbResult<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM duckdb_databases() WHERE database_name = ?",
                duckdb::params![self.config.name],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count > 0)
    }

    fn drop_database(&self) -> DbResult<()> {
        if !self.database_exists()? {
            return Err(DbError::DatabaseNotFound(self.config.name.clone()));
        }
        self.conn.execute_batch(&format!(
            "USE {HOST_CATALOG}; DETACH DATABASE {};",
            self.config.name
        ))?;
        self.remove_database_files()?;
        log::debug!("Dropped database {}", self.config.name);
        Ok(())
    }

    fn create_database(&self) -> DbResult<()> {
        self.attach()
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
