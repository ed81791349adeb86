//! Fresh command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::{plural, report_engine_failure};
use crate::context::RuntimeContext;

/// Execute the fresh command
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let report = ctx
        .migrator()?
        .fresh()
        .inspect_err(report_engine_failure)
        .context("Fresh migration failed")?;

    println!(
        "Database {} reset; applied {} {} as batch {}",
        ctx.settings.database.name,
        report.applied.len(),
        plural(report.applied.len()),
        report.batch
    );
    Ok(())
}
