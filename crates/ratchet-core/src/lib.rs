//! ratchet-core - Core library for Ratchet
//!
//! This crate provides configuration parsing, migration file discovery,
//! reconciliation of files against the bookkeeping table, and scaffolding of
//! new migration pairs. Nothing here talks to a database.

pub mod config;
pub mod discovery;
pub mod error;
pub mod migration_name;
pub mod reconcile;
pub mod record;
pub mod scaffold;

pub use config::{Config, DatabaseConfig, TargetConfig};
pub use discovery::{discover, resolve_migrations_dir, Direction, MigrationFile};
pub use error::{CoreError, CoreResult};
pub use migration_name::MigrationName;
pub use reconcile::{reconcile, MigrationCandidate, Reconciliation};
pub use record::{MigrationRecord, NewMigrationRecord, LEDGER_TABLE};
pub use scaffold::{create_migration, validate_migration_name, ScaffoldedMigration};
