//! Shared utilities for CLI commands

use ratchet_engine::EngineError;

/// Print what a dirty run or partial rollback left behind.
///
/// The error itself is reported by `main`; this adds the per-migration
/// detail that does not fit in one message.
pub(crate) fn report_engine_failure(err: &EngineError) {
    match err {
        EngineError::DirtyRun {
            compensated,
            compensation_errors,
            ..
        } => {
            for name in compensated {
                eprintln!("  reverted: {}", name);
            }
            for error in compensation_errors {
                eprintln!("  \x1b[31mnot reverted:\x1b[0m {}", error);
            }
            if !compensation_errors.is_empty() {
                eprintln!("The database may be left partially migrated; inspect it before retrying.");
            }
        }
        EngineError::RollbackIncomplete { reverted, .. } => {
            for name in reverted {
                eprintln!("  rolled back: {}", name);
            }
        }
        _ => {}
    }
}

/// "1 migration" / "3 migrations"
pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 {
        "migration"
    } else {
        "migrations"
    }
}
