//! Make command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, MakeArgs};
use crate::context::RuntimeContext;

/// Execute the make command
pub fn execute(args: &MakeArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let created = ctx
        .migrator()?
        .make(&args.name)
        .with_context(|| format!("Failed to create migration '{}'", args.name))?;

    println!("Created migration {}", created.name);
    println!("  {}", created.up_path.display());
    println!("  {}", created.down_path.display());
    Ok(())
}
