//! Ratchet CLI - versioned SQL migrations for DuckDB

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;
mod progress;

use cli::Cli;
use commands::{down, fresh, make, reset, rollback, status, up, version};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.global.verbose);

    match &cli.command {
        cli::Commands::Up => up::execute(&cli.global),
        cli::Commands::Rollback => rollback::execute(&cli.global),
        cli::Commands::Down => down::execute(&cli.global),
        cli::Commands::Reset => reset::execute(&cli.global),
        cli::Commands::Fresh => fresh::execute(&cli.global),
        cli::Commands::Make(args) => make::execute(args, &cli.global),
        cli::Commands::Version => version::execute(&cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
    }
}

/// `RUST_LOG` wins when set; otherwise warnings, or debug with `--verbose`.
fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
