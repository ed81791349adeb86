//! Runtime context for CLI commands

use anyhow::{Context, Result};
use ratchet_core::{Config, DatabaseConfig};
use ratchet_db::DuckDbBackend;
use ratchet_engine::{MigrationContext, Migrator, NullSink, ProgressSink};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;
use crate::progress::ConsoleSink;

/// Database and migrations directory after config, target, and flag overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Target database
    pub database: DatabaseConfig,

    /// Absolute or project-relative migrations directory
    pub migrations_dir: PathBuf,

    /// Selected target, if any
    pub target: Option<String>,
}

impl Settings {
    /// Resolve settings from the global arguments.
    ///
    /// Precedence: CLI flag, then the selected target, then the top-level
    /// config, then built-in defaults.
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        let project_dir = Path::new(&args.project_dir);

        let config = if let Some(config_path) = &args.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            Config::load_or_default(project_dir).context("Failed to load project configuration")?
        };

        let target = Config::resolve_target(args.target.as_deref());
        let mut database = config
            .get_database_config(target.as_deref())
            .context("Failed to resolve database configuration")?;
        if let Some(path) = &args.database {
            database.path = path.clone();
        }
        if !database.is_in_memory() && Path::new(&database.path).is_relative() {
            database.path = project_dir.join(&database.path).display().to_string();
        }
        database
            .validate()
            .context("Invalid database configuration")?;

        let migrations_dir = match &args.migrations {
            Some(dir) => project_dir.join(dir),
            None => config.migrations_path_absolute(project_dir, target.as_deref())?,
        };

        Ok(Self {
            database,
            migrations_dir,
            target,
        })
    }
}

/// Runtime context containing the resolved settings and database connection
pub struct RuntimeContext {
    /// Resolved settings
    pub settings: Settings,

    /// Database connection
    pub db: DuckDbBackend,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let settings = Settings::resolve(args)?;
        log::debug!(
            "Using database '{}' at {}{}",
            settings.database.name,
            settings.database.path,
            settings
                .target
                .as_deref()
                .map(|t| format!(" (target {})", t))
                .unwrap_or_default()
        );

        let db = DuckDbBackend::open(&settings.database).context("Failed to connect to database")?;

        Ok(Self {
            settings,
            db,
            verbose: args.verbose,
        })
    }

    /// Build a migrator over this context's connection.
    ///
    /// Progress lines are printed only in verbose mode.
    pub fn migrator(&self) -> Result<Migrator<'_>> {
        let sink: &dyn ProgressSink = if self.verbose {
            &ConsoleSink
        } else {
            &NullSink
        };
        let migrator = Migrator::new(
            &self.db,
            MigrationContext::new(&self.settings.migrations_dir),
        )
        .context("Failed to initialise migrator")?;
        Ok(migrator.with_sink(sink))
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
