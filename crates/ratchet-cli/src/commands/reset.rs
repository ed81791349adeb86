//! Reset command implementation (drop and recreate)

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the reset command
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    ctx.migrator()?
        .drop_and_create()
        .context("Failed to reset database")?;
    println!("Database {} reset", ctx.settings.database.name);
    Ok(())
}
