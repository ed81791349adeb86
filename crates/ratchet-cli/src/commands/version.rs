//! Version command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the version command
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let version = ctx
        .migrator()?
        .version()
        .context("Failed to read current version")?;
    println!("{}", version);
    Ok(())
}
