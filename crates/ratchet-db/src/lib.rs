//! ratchet-db - Database layer for Ratchet
//!
//! This crate provides the `Database` trait family consumed by the migration
//! engine and its DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, DatabaseCatalog, DatabaseCore, DatabaseLedger};
