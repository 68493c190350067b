//! gitship CLI - deploy git revisions to remote hosts
//!
//! Usage: gitship <COMMAND>
//!
//! Commands:
//!   mirror       Refresh a staging clone and rsync it to a host
//!   push         Push a branch into a bare repository whose hook checks it out
//!   history      Show the deploys recorded on a host
//!   check-local  Check that a local checkout is up to date and clean

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use gitship::config::Config;
use gitship::presentation::cli::{Cli, Commands};
use gitship::presentation::logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("✗ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let (config, warnings) = Config::discover(cli.config.as_deref())?;
    for warning in &warnings {
        let location = match warning.line {
            Some(line) => format!("{}:{}", warning.file.display(), line),
            None => warning.file.display().to_string(),
        };
        match &warning.suggestion {
            Some(suggestion) => warn!(
                "unknown config key '{}' in {} (did you mean '{}'?)",
                warning.key, location, suggestion
            ),
            None => warn!("unknown config key '{}' in {}", warning.key, location),
        }
    }

    match cli.command {
        Commands::Mirror(args) => commands::mirror::cmd_mirror(args, &config, cli.json),
        Commands::Push(args) => commands::push::cmd_push(args, &config, cli.json),
        Commands::History(args) => commands::history::cmd_history(args, &config, cli.json),
        Commands::CheckLocal(args) => commands::check_local::cmd_check_local(args, cli.json),
    }
}
