//! Reconciliation of migration files against persisted bookkeeping rows
//!
//! Every engine operation starts here: the files found on disk are merged
//! with the rows of the `migrations` table to decide which migrations are
//! pending, which are applied, and which batch each belongs to.

use crate::discovery::MigrationFile;
use crate::migration_name::MigrationName;
use crate::record::MigrationRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A logical migration (up + down pair) and its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationCandidate {
    /// Canonical name
    pub name: MigrationName,

    /// Sortable timestamp prefix of the name
    pub created_at: String,

    /// Path of the `.up.sql` half (may not exist)
    pub path_up: PathBuf,

    /// Path of the `.down.sql` half (may not exist)
    pub path_down: PathBuf,

    /// Persisted batch when applied, otherwise the batch the next Up will use
    pub target_batch: i64,

    /// Whether a bookkeeping row exists for this migration
    pub has_applied: bool,

    /// Set by the engine when applying this migration failed
    #[serde(skip)]
    pub failed: bool,
}

impl MigrationCandidate {
    fn pending(dir: &Path, name: &MigrationName, next_batch: i64) -> Self {
        Self {
            created_at: name.created_at_prefix().to_string(),
            path_up: dir.join(name.up_file_name()),
            path_down: dir.join(name.down_file_name()),
            name: name.clone(),
            target_batch: next_batch,
            has_applied: false,
            failed: false,
        }
    }
}

/// Result of [`reconcile`]: candidates ordered oldest first, plus any
/// bookkeeping rows that have no file on disk.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    candidates: Vec<MigrationCandidate>,
    orphaned: Vec<MigrationRecord>,
}

impl Reconciliation {
    /// All candidates, ascending by `created_at` (ties broken by name)
    pub fn candidates(&self) -> &[MigrationCandidate] {
        &self.candidates
    }

    /// Consume into the ordered candidate list
    pub fn into_candidates(self) -> Vec<MigrationCandidate> {
        self.candidates
    }

    /// Rows with no matching migration file
    pub fn orphaned(&self) -> &[MigrationRecord] {
        &self.orphaned
    }

    /// Candidates not yet applied, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &MigrationCandidate> {
        self.candidates.iter().filter(|c| !c.has_applied)
    }

    /// Applied candidates belonging to `batch`, newest first
    pub fn applied_in_batch(&self, batch: i64) -> Vec<&MigrationCandidate> {
        self.candidates
            .iter()
            .rev()
            .filter(|c| c.has_applied && c.target_batch == batch)
            .collect()
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether no migration files were found
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Merge discovered files with persisted records.
///
/// Files sharing a canonical name collapse into one candidate. Unapplied
/// candidates get `current_version + 1` as their target batch; applied ones
/// take the batch from their record.
pub fn reconcile(
    dir: &Path,
    files: &[MigrationFile],
    records: &[MigrationRecord],
    current_version: i64,
) -> Reconciliation {
    let next_batch = current_version + 1;

    let mut candidates: Vec<MigrationCandidate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for file in files {
        if index.contains_key(file.name.as_str()) {
            continue;
        }
        index.insert(file.name.as_str(), candidates.len());
        candidates.push(MigrationCandidate::pending(dir, &file.name, next_batch));
    }

    let mut orphaned = Vec::new();
    for record in records {
        match index.get(record.name.as_str()) {
            Some(&idx) => {
                let candidate = &mut candidates[idx];
                candidate.target_batch = record.batch;
                candidate.has_applied = true;
            }
            None => orphaned.push(record.clone()),
        }
    }

    candidates.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.name.cmp(&b.name))
    });

    Reconciliation {
        candidates,
        orphaned,
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
