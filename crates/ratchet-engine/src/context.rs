//! Immutable settings a migrator runs with

use std::path::{Path, PathBuf};

/// Where migrations live and which database they target.
///
/// Built once per invocation and never mutated; the current version is not
/// part of the context and is re-read from the database on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationContext {
    migrations_dir: PathBuf,
    database_name: String,
}

impl MigrationContext {
    /// Context for migrations under `migrations_dir`.
    ///
    /// The database name is filled in from the connection by
    /// [`Migrator::new`](crate::Migrator::new).
    pub fn new(migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            migrations_dir: migrations_dir.into(),
            database_name: String::new(),
        }
    }

    pub(crate) fn resolved(migrations_dir: PathBuf, database_name: &str) -> Self {
        Self {
            migrations_dir,
            database_name: database_name.to_string(),
        }
    }

    /// Directory holding the `.up.sql` / `.down.sql` files
    pub fn migrations_dir(&self) -> &Path {
        &self.migrations_dir
    }

    /// Name of the target database
    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
