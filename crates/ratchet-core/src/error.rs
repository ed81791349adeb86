//! Error types for ratchet-core

use thiserror::Error;

/// Core error type for Ratchet
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Migrations directory not found
    #[error("[C004] Migration path not found: {path}")]
    PathNotFound { path: String },

    /// C005: Migration name rejected by `make`
    #[error("[C005] Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// C006: Refusing to overwrite an existing migration file
    #[error("[C006] Migration file already exists: {path}")]
    MigrationExists { path: String },

    /// C007: IO error with file path context
    #[error("[C007] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
