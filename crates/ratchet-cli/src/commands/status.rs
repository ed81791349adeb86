//! Status command implementation

use anyhow::{Context, Result};
use ratchet_engine::StatusReport;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::context::RuntimeContext;

/// Execute the status command
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let report = ctx
        .migrator()?
        .status()
        .context("Failed to read migration status")?;

    match args.output {
        StatusOutput::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        StatusOutput::Table => print!("{}", render_table(&report)),
    }
    Ok(())
}

fn render_table(report: &StatusReport) -> String {
    let mut out = format!("Version: {}\n", report.version);
    if report.migrations.is_empty() && report.orphaned.is_empty() {
        out.push_str("No migrations found\n");
        return out;
    }

    out.push_str(&format!("  {:<6} {:<8} {}\n", "BATCH", "STATUS", "MIGRATION"));
    for migration in &report.migrations {
        let (batch, status) = if migration.has_applied {
            (migration.target_batch.to_string(), "\x1b[32mapplied\x1b[0m ")
        } else {
            ("-".to_string(), "\x1b[33mpending\x1b[0m ")
        };
        out.push_str(&format!("  {:<6} {} {}\n", batch, status, migration.name));
    }
    for record in &report.orphaned {
        out.push_str(&format!(
            "  {:<6} {} {}\n",
            record.batch, "\x1b[31mmissing\x1b[0m ", record.name
        ));
    }

    out.push_str(&format!(
        "\n{} applied, {} pending",
        report.migrations.len() - report.pending_count(),
        report.pending_count()
    ));
    if !report.orphaned.is_empty() {
        out.push_str(&format!(", {} missing files", report.orphaned.len()));
    }
    out.push('\n');
    out
}
