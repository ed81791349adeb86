//! Scaffolding of new migration file pairs (`ratchet make`)

use crate::error::{CoreError, CoreResult};
use crate::migration_name::MigrationName;
use chrono::NaiveDateTime;
use regex::Regex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// chrono format of the 18-character prefix, e.g. `2024_01_31_09_4512`.
pub const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M%S";

const UP_STUB: &str = "-- Forward migration\nCREATE TABLE tablename (\n    id INTEGER PRIMARY KEY\n);\n";

const DOWN_STUB: &str = "-- Reverse migration\nDROP TABLE tablename;\n";

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_]*$").expect("valid regex"))
}

static PREFIX_RE: OnceLock<Regex> = OnceLock::new();

fn prefix_regex() -> &'static Regex {
    PREFIX_RE.get_or_init(|| Regex::new(r"^\d{4}_\d{2}_\d{2}_\d{2}_\d{4}$").expect("valid regex"))
}

/// Whether `name` starts with a prefix in [`TIMESTAMP_FORMAT`] shape followed by `_`.
pub fn has_timestamp_prefix(name: &MigrationName) -> bool {
    prefix_regex().is_match(name.created_at_prefix())
        && name.as_str()[name.created_at_prefix().len()..].starts_with('_')
}

/// Paths written by [`create_migration`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldedMigration {
    /// Canonical name of the new pair
    pub name: MigrationName,

    /// Path of the `.up.sql` stub
    pub up_path: PathBuf,

    /// Path of the `.down.sql` stub
    pub down_path: PathBuf,
}

/// Reject descriptive names that would produce odd or unsafe file names.
pub fn validate_migration_name(name: &str) -> CoreResult<()> {
    if name.is_empty() {
        return Err(CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: "name cannot be empty".to_string(),
        });
    }
    if !name_regex().is_match(name) {
        return Err(CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: "use only letters, digits, and '_', starting with a letter or digit"
                .to_string(),
        });
    }
    Ok(())
}

/// Write an empty up/down pair named `<timestamp>_<name>` into `dir`.
///
/// Both halves share one timestamp taken from `now`. Existing files are
/// never overwritten; nothing is written if either half already exists.
pub fn create_migration(
    dir: &Path,
    name: &str,
    now: NaiveDateTime,
) -> CoreResult<ScaffoldedMigration> {
    validate_migration_name(name)?;
    if !dir.is_dir() {
        return Err(CoreError::PathNotFound {
            path: dir.display().to_string(),
        });
    }

    let canonical = MigrationName::new(format!("{}_{}", now.format(TIMESTAMP_FORMAT), name));
    let up_path = dir.join(canonical.up_file_name());
    let down_path = dir.join(canonical.down_file_name());

    for path in [&up_path, &down_path] {
        if path.exists() {
            return Err(CoreError::MigrationExists {
                path: path.display().to_string(),
            });
        }
    }

    write_new(&up_path, UP_STUB)?;
    write_new(&down_path, DOWN_STUB)?;
    log::debug!("Created migration pair {}", canonical);

    Ok(ScaffoldedMigration {
        name: canonical,
        up_path,
        down_path,
    })
}

fn write_new(path: &Path, contents: &str) -> CoreResult<()> {
    let with_path = |e: std::io::Error| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(with_path)?;
    file.write_all(contents.as_bytes()).map_err(with_path)
}

#[cfg(test)]
#[path = "scaffold_test.rs"]
mod tests;
