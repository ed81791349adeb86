//! The migrator: applies, reverts, and resets migrations
//!
//! Every operation starts from a fresh reconciliation of the migrations
//! directory against the bookkeeping table. Pending migrations are applied
//! oldest first under a single new batch. If one fails, the migrations
//! already applied in that run are reverted newest first and nothing is
//! recorded. Rollback reverts the latest batch newest first.

use crate::context::MigrationContext;
use crate::error::{EngineError, EngineResult};
use crate::events::{MigrationEvent, NullSink, ProgressSink};
use crate::executor::Executor;
use crate::report::{RollbackReport, StatusReport, UpReport};
use crate::state::StateStore;
use chrono::{Local, NaiveDateTime};
use ratchet_core::discovery::file_exists;
use ratchet_core::{
    create_migration, discover, resolve_migrations_dir, MigrationCandidate, MigrationName,
    Reconciliation, ScaffoldedMigration,
};
use ratchet_db::Database;
use std::path::Path;

/// Migration engine bound to one database connection.
///
/// The connection is borrowed; the migrator never closes it.
pub struct Migrator<'a> {
    db: &'a dyn Database,
    ctx: MigrationContext,
    sink: &'a dyn ProgressSink,
}

impl<'a> Migrator<'a> {
    /// Validate the environment and prepare the bookkeeping table.
    ///
    /// Fails when the database does not answer, the target database is
    /// missing, or the migrations directory does not exist.
    pub fn new(db: &'a dyn Database, ctx: MigrationContext) -> EngineResult<Self> {
        db.ping().map_err(EngineError::Connectivity)?;

        let exists = db.database_exists().map_err(|e| EngineError::Schema {
            message: format!("cannot check database '{}': {}", db.database_name(), e),
        })?;
        if !exists {
            return Err(EngineError::Schema {
                message: format!("database '{}' does not exist", db.database_name()),
            });
        }

        let migrations_dir = resolve_migrations_dir(ctx.migrations_dir())?;
        StateStore::new(db).ensure_schema()?;

        log::debug!(
            "Migrator ready: {} database '{}', migrations in {}",
            db.db_type(),
            db.database_name(),
            migrations_dir.display()
        );

        Ok(Self {
            db,
            ctx: MigrationContext::resolved(migrations_dir, db.database_name()),
            sink: &NullSink,
        })
    }

    /// Send progress events to `sink` instead of discarding them
    pub fn with_sink(mut self, sink: &'a dyn ProgressSink) -> Self {
        self.sink = sink;
        self
    }

    /// The resolved context
    pub fn context(&self) -> &MigrationContext {
        &self.ctx
    }

    fn state(&self) -> StateStore<'a> {
        StateStore::new(self.db)
    }

    /// Apply every pending migration under one new batch
    pub fn up(&self) -> EngineResult<UpReport> {
        let version = self.state().current_version()?;
        let mut pending: Vec<MigrationCandidate> =
            self.reconciliation(version)?.pending().cloned().collect();

        let Some(batch) = pending.first().map(|c| c.target_batch) else {
            log::info!("Nothing to migrate");
            return Ok(UpReport {
                batch: version,
                applied: Vec::new(),
            });
        };

        for candidate in &pending {
            require_file(&candidate.name, &candidate.path_up)?;
        }

        let executor = Executor::new(self.db);
        for idx in 0..pending.len() {
            let candidate = &mut pending[idx];
            self.sink.emit(&MigrationEvent::Migrating {
                name: &candidate.name,
            });
            match executor.run_file(&candidate.name, &candidate.path_up) {
                Ok(()) => {
                    candidate.failed = false;
                    log::info!("Migrated {}", candidate.name);
                    self.sink.emit(&MigrationEvent::Migrated {
                        name: &candidate.name,
                    });
                }
                Err(e) => {
                    candidate.failed = true;
                    log::error!("{}", e);
                    self.sink.emit(&MigrationEvent::Failed {
                        name: &candidate.name,
                        error: &e,
                    });
                    return Err(self.compensate(&pending[..idx], e));
                }
            }
        }

        if let Err(e) = self.state().insert_applied(&pending) {
            log::error!("Cannot record batch {}: {}", batch, e);
            return Err(self.compensate(&pending, e));
        }

        Ok(UpReport {
            batch,
            applied: pending.into_iter().map(|c| c.name).collect(),
        })
    }

    /// Revert `applied` (oldest first) newest first, collecting every
    /// failure.
    fn compensate(&self, applied: &[MigrationCandidate], cause: EngineError) -> EngineError {
        self.sink.emit(&MigrationEvent::Compensating {
            count: applied.len(),
        });

        let executor = Executor::new(self.db);
        let mut compensated = Vec::new();
        let mut compensation_errors = Vec::new();

        for candidate in applied.iter().rev().filter(|c| !c.failed) {
            match executor.run_file(&candidate.name, &candidate.path_down) {
                Ok(()) => {
                    log::info!("Reverted {}", candidate.name);
                    self.sink.emit(&MigrationEvent::RolledBack {
                        name: &candidate.name,
                    });
                    compensated.push(candidate.name.clone());
                }
                Err(e) => {
                    let error = EngineError::Compensation {
                        migration: candidate.name.clone(),
                        message: e.to_string(),
                    };
                    log::warn!("{}", error);
                    self.sink.emit(&MigrationEvent::CompensationFailed {
                        name: &candidate.name,
                        error: &error,
                    });
                    compensation_errors.push(error);
                }
            }
        }

        self.sink.emit(&MigrationEvent::Compensated {
            reverted: compensated.len(),
            failed: compensation_errors.len(),
        });

        EngineError::DirtyRun {
            cause: Box::new(cause),
            compensated,
            compensation_errors,
        }
    }

    /// Revert the latest batch, newest migration first
    pub fn rollback(&self) -> EngineResult<RollbackReport> {
        let version = self.state().current_version()?;
        if version == 0 {
            log::info!("Nothing to roll back");
            return Ok(RollbackReport {
                batch: 0,
                reverted: Vec::new(),
            });
        }

        // Orphaned records were reported by the reconciliation and stay put.
        let reconciliation = self.reconciliation(version)?;
        let targets = reconciliation.applied_in_batch(version);
        for candidate in &targets {
            require_file(&candidate.name, &candidate.path_down)?;
        }

        let executor = Executor::new(self.db);
        let state = self.state();
        let mut reverted = Vec::with_capacity(targets.len());

        for candidate in targets {
            self.sink.emit(&MigrationEvent::RollingBack {
                name: &candidate.name,
            });
            let step = executor
                .run_file(&candidate.name, &candidate.path_down)
                .and_then(|()| state.delete_by_name(&candidate.name));
            if let Err(e) = step {
                log::error!("{}", e);
                self.sink.emit(&MigrationEvent::Failed {
                    name: &candidate.name,
                    error: &e,
                });
                return Err(EngineError::RollbackIncomplete {
                    batch: version,
                    cause: Box::new(e),
                    reverted,
                });
            }
            log::info!("Rolled back {}", candidate.name);
            self.sink.emit(&MigrationEvent::RolledBack {
                name: &candidate.name,
            });
            reverted.push(candidate.name.clone());
        }

        Ok(RollbackReport {
            batch: version,
            reverted,
        })
    }

    /// Drop the target database. Irreversible.
    pub fn down(&self) -> EngineResult<()> {
        let database = self.db.database_name();
        self.db.drop_database().map_err(|e| EngineError::Schema {
            message: format!("cannot drop database '{}': {}", database, e),
        })?;
        log::info!("Dropped database {}", database);
        self.sink
            .emit(&MigrationEvent::DatabaseDropped { database });
        Ok(())
    }

    /// Drop the target database and create it again, empty, with a fresh
    /// bookkeeping table
    pub fn drop_and_create(&self) -> EngineResult<()> {
        self.down()?;
        let database = self.db.database_name();
        self.db.create_database().map_err(|e| EngineError::Schema {
            message: format!("cannot create database '{}': {}", database, e),
        })?;
        self.state().ensure_schema()?;
        log::info!("Recreated database {}", database);
        self.sink.emit(&MigrationEvent::DatabaseReset { database });
        Ok(())
    }

    /// Reset the database and apply every migration as batch 1
    pub fn fresh(&self) -> EngineResult<UpReport> {
        self.drop_and_create()?;
        self.up()
    }

    /// Scaffold a new migration pair stamped with the current local time
    pub fn make(&self, name: &str) -> EngineResult<ScaffoldedMigration> {
        self.make_at(name, Local::now().naive_local())
    }

    /// Scaffold a new migration pair stamped with `now`
    pub fn make_at(&self, name: &str, now: NaiveDateTime) -> EngineResult<ScaffoldedMigration> {
        let created = create_migration(self.ctx.migrations_dir(), name, now)?;
        log::info!("Created migration {}", created.name);
        Ok(created)
    }

    /// Current version: the highest recorded batch, or 0
    pub fn version(&self) -> EngineResult<i64> {
        self.state().current_version()
    }

    /// Every known migration with its applied state
    pub fn status(&self) -> EngineResult<StatusReport> {
        let version = self.state().current_version()?;
        let reconciliation = self.reconciliation(version)?;
        Ok(StatusReport {
            version,
            orphaned: reconciliation.orphaned().to_vec(),
            migrations: reconciliation.into_candidates(),
        })
    }

    fn reconciliation(&self, version: i64) -> EngineResult<Reconciliation> {
        let dir = self.ctx.migrations_dir();
        let files = discover(dir)?;
        let records = self.state().list_records(false)?;
        let reconciliation = ratchet_core::reconcile(dir, &files, &records, version);

        for record in reconciliation.orphaned() {
            log::warn!(
                "Migration '{}' (batch {}) is recorded but has no files in {}",
                record.name,
                record.batch,
                dir.display()
            );
            self.sink.emit(&MigrationEvent::OrphanedRecord { record });
        }
        log::debug!(
            "Reconciled {} migration(s) against version {}",
            reconciliation.len(),
            version
        );
        Ok(reconciliation)
    }
}

fn require_file(migration: &MigrationName, path: &Path) -> EngineResult<()> {
    if file_exists(path) {
        return Ok(());
    }
    Err(EngineError::MissingFile {
        migration: migration.clone(),
        path: path.display().to_string(),
    })
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
