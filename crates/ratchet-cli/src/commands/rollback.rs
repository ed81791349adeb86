//! Rollback command implementation

use anyhow::{Context, Result};
use ratchet_engine::RollbackReport;

use crate::cli::GlobalArgs;
use crate::commands::common::{plural, report_engine_failure};
use crate::context::RuntimeContext;

/// Execute the rollback command
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let migrator = ctx.migrator()?;

    let report = migrator
        .rollback()
        .inspect_err(report_engine_failure)
        .context("Rollback failed")?;

    println!("{}", summary(&report));
    Ok(())
}

/// One-line outcome of a rollback.
///
/// A non-zero batch with nothing reverted means every record of that batch
/// has lost its files, so the version cannot move down.
fn summary(report: &RollbackReport) -> String {
    if !report.is_noop() {
        return format!(
            "Rolled back {} {} from batch {}",
            report.reverted.len(),
            plural(report.reverted.len()),
            report.batch
        );
    }
    if report.batch == 0 {
        return "Nothing to roll back".to_string();
    }
    format!(
        "Batch {} has no migration files left to revert; version stays at {}. Run `ratchet status` to see the missing files",
        report.batch, report.batch
    )
}
