//! Up command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::{plural, report_engine_failure};
use crate::context::RuntimeContext;

/// Execute the up command
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let migrator = ctx.migrator()?;

    let report = migrator.up().inspect_err(report_engine_failure).context("Migration failed")?;

    if report.is_noop() {
        println!("Nothing to migrate (version {})", report.batch);
    } else {
        println!(
            "Applied {} {} as batch {}",
            report.applied.len(),
            plural(report.applied.len()),
            report.batch
        );
    }
    Ok(())
}
