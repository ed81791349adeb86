//! Console rendering of migration progress

use ratchet_engine::{MigrationEvent, ProgressSink};

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const GREY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

/// Prints one coloured line per event
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn emit(&self, event: &MigrationEvent<'_>) {
        match render(event) {
            Line::Out(line) => println!("{}", line),
            Line::Err(line) => eprintln!("{}", line),
        }
    }
}

enum Line {
    Out(String),
    Err(String),
}

fn render(event: &MigrationEvent<'_>) -> Line {
    match event {
        MigrationEvent::Migrating { name } => Line::Out(format!("{GREY}Migrating:{RESET} {name}")),
        MigrationEvent::Migrated { name } => Line::Out(format!("{GREEN}Migrated:{RESET}  {name}")),
        MigrationEvent::Failed { name, error } => {
            Line::Err(format!("{RED}Failed:{RESET}    {name}\n  {GREY}{error}{RESET}"))
        }
        MigrationEvent::RollingBack { name } => {
            Line::Out(format!("{GREY}Rolling back:{RESET} {name}"))
        }
        MigrationEvent::RolledBack { name } => {
            Line::Out(format!("{GREEN}Rolled back:{RESET}  {name}"))
        }
        MigrationEvent::Compensating { count } => Line::Err(format!(
            "{YELLOW}Reverting {} migration(s) applied in this run{RESET}",
            count
        )),
        MigrationEvent::CompensationFailed { name, error } => Line::Err(format!(
            "{RED}Could not revert:{RESET} {name}\n  {GREY}{error}{RESET}"
        )),
        MigrationEvent::Compensated { reverted, failed } => Line::Err(format!(
            "{YELLOW}Reverted {} migration(s), {} failed{RESET}",
            reverted, failed
        )),
        MigrationEvent::DatabaseDropped { database } => {
            Line::Out(format!("{YELLOW}Dropped database:{RESET} {database}"))
        }
        MigrationEvent::DatabaseReset { database } => {
            Line::Out(format!("{GREEN}Recreated database:{RESET} {database}"))
        }
        MigrationEvent::OrphanedRecord { record } => Line::Err(format!(
            "{YELLOW}Missing files:{RESET} {} (batch {})",
            record.name, record.batch
        )),
    }
}
