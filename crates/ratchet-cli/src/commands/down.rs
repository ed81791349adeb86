//! Down command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the down command
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    ctx.migrator()?.down().context("Failed to drop database")?;
    println!("Dropped database {}", ctx.settings.database.name);
    Ok(())
}
