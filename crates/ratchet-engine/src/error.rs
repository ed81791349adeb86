//! Error types for ratchet-engine

use ratchet_core::{CoreError, MigrationName};
use ratchet_db::DbError;
use thiserror::Error;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// The database did not answer a ping (R001)
    #[error("[R001] Could not ping the database: {0}")]
    Connectivity(#[source] DbError),

    /// Target database or bookkeeping table missing or not creatable (R002)
    #[error("[R002] Schema error: {message}")]
    Schema { message: String },

    /// Migrations directory does not exist (R003)
    #[error("[R003] Migration path not found: {path}")]
    PathNotFound { path: String },

    /// One half of a migration pair is missing on disk (R004)
    #[error("[R004] Migration file for '{migration}' does not exist: {path}")]
    MissingFile {
        migration: MigrationName,
        path: String,
    },

    /// A migration file could not be read or its SQL failed (R005)
    #[error("[R005] Migration '{migration}' failed: {message}")]
    Execution {
        migration: MigrationName,
        message: String,
    },

    /// A down file failed while compensating a dirty run (R006)
    #[error("[R006] Compensating '{migration}' failed: {message}")]
    Compensation {
        migration: MigrationName,
        message: String,
    },

    /// Reading or writing the bookkeeping table failed (R007)
    #[error("[R007] Migration state query failed: {0}")]
    Query(#[source] DbError),

    /// An Up run failed and its applied migrations were reverted (R008)
    #[error(
        "[R008] Migration run rolled back ({} reverted, {} compensation error(s)): {cause}",
        .compensated.len(),
        .compensation_errors.len()
    )]
    DirtyRun {
        cause: Box<EngineError>,
        compensated: Vec<MigrationName>,
        compensation_errors: Vec<EngineError>,
    },

    /// A rollback stopped part way through the batch (R009)
    #[error(
        "[R009] Rollback of batch {batch} stopped after {} reverted migration(s): {cause}",
        .reverted.len()
    )]
    RollbackIncomplete {
        batch: i64,
        cause: Box<EngineError>,
        reverted: Vec<MigrationName>,
    },

    /// Configuration, discovery, or scaffolding error
    #[error(transparent)]
    Core(CoreError),
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::PathNotFound { path } => EngineError::PathNotFound { path },
            other => EngineError::Core(other),
        }
    }
}

impl EngineError {
    /// The error that triggered a dirty run or incomplete rollback, or `self`.
    pub fn root_cause(&self) -> &EngineError {
        match self {
            EngineError::DirtyRun { cause, .. } | EngineError::RollbackIncomplete { cause, .. } => {
                cause.root_cause()
            }
            other => other,
        }
    }
}
