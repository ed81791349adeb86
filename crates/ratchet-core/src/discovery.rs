//! Migration file discovery
//!
//! Lists the `.up.sql` / `.down.sql` files in a migrations directory and maps
//! each one to its canonical [`MigrationName`]. No ordering is imposed here;
//! the reconciler sorts.

use crate::error::{CoreError, CoreResult};
use crate::migration_name::{MigrationName, UP_SUFFIX};
use crate::scaffold::has_timestamp_prefix;
use std::path::{Path, PathBuf};

/// Which half of a migration pair a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Forward change (`.up.sql`)
    Up,
    /// Reverse change (`.down.sql`)
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A single migration file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Raw file name, e.g. `2024_01_01_00_0000_init.up.sql`
    pub file_name: String,

    /// Canonical name shared with the other half of the pair
    pub name: MigrationName,

    /// Up or down half
    pub direction: Direction,

    /// Full path to the file
    pub path: PathBuf,
}

/// Validate that the migrations directory exists and normalize it.
///
/// Trailing separators are dropped so joined paths stay clean.
pub fn resolve_migrations_dir(path: &Path) -> CoreResult<PathBuf> {
    if !path.is_dir() {
        return Err(CoreError::PathNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(path.components().collect())
}

/// List migration files in `dir`.
///
/// Subdirectories and files without an `.up.sql` / `.down.sql` suffix are
/// skipped. Fails with [`CoreError::PathNotFound`] when `dir` does not exist.
pub fn discover(dir: &Path) -> CoreResult<Vec<MigrationFile>> {
    if !dir.is_dir() {
        return Err(CoreError::PathNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            log::warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        let Some(name) = MigrationName::from_file_name(file_name) else {
            log::debug!("Skipping non-migration file {}", path.display());
            continue;
        };
        let direction = if file_name.ends_with(UP_SUFFIX) {
            Direction::Up
        } else {
            Direction::Down
        };
        if direction == Direction::Up && !has_timestamp_prefix(&name) {
            log::warn!(
                "Migration '{}' has no timestamp prefix; ordering falls back to plain name comparison",
                name
            );
        }
        files.push(MigrationFile {
            file_name: file_name.to_string(),
            name,
            direction,
            path,
        });
    }

    log::debug!("Discovered {} migration files in {}", files.len(), dir.display());
    Ok(files)
}

/// Whether a regular file exists at `path`.
pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Read the SQL body of a migration file.
pub fn read_migration(path: &Path) -> CoreResult<String> {
    std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
