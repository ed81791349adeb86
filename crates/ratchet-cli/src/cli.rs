//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Ratchet - versioned, file-based SQL migrations for DuckDB
#[derive(Parser, Debug)]
#[command(name = "ratchet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Select a named target from the config (or RATCHET_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override the database file path (`:memory:` for in-memory)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Override the migrations directory
    #[arg(short, long, global = true)]
    pub migrations: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all pending migrations as one new batch
    Up,

    /// Revert the most recent batch
    Rollback,

    /// Drop the target database
    Down,

    /// Drop and recreate the target database, empty
    Reset,

    /// Reset the database and apply every migration
    Fresh,

    /// Create a new up/down migration pair
    Make(MakeArgs),

    /// Print the current version (latest batch)
    Version,

    /// Show applied and pending migrations
    Status(StatusArgs),
}

/// Arguments for the make command
#[derive(Args, Debug)]
pub struct MakeArgs {
    /// Descriptive name, e.g. `create_users`
    pub name: String,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable table
    Table,
    /// JSON document
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
