//! ratchet-engine - Migration engine for Ratchet
//!
//! This crate reconciles migration files against the bookkeeping table and
//! applies, compensates, reverts, and resets migrations through a borrowed
//! [`ratchet_db::Database`] connection.

pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod executor;
pub mod report;
pub mod state;

pub use context::MigrationContext;
pub use engine::Migrator;
pub use error::{EngineError, EngineResult};
pub use events::{MigrationEvent, NullSink, ProgressSink};
pub use executor::Executor;
pub use report::{RollbackReport, StatusReport, UpReport};
pub use state::StateStore;
