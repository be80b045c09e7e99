//! CLI argument parsing and command dispatch

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;

/// Sliceplan - Validate release definitions and plan slice selections
#[derive(Parser, Debug)]
#[command(name = "sliceplan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that a release definition is consistent
    Validate(commands::validate::ValidateArgs),

    /// Print the installation order and prefer winners for a set of slices
    Select(commands::select::SelectArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level)?;

        match self.command {
            Commands::Validate(args) => commands::validate::execute(args),
            Commands::Select(args) => commands::select::execute(args),
        }
    }
}

/// Set up `env_logger` at `level`. `RUST_LOG` still refines it per module.
fn init_logging(level: &str) -> Result<()> {
    let filter: LevelFilter = level
        .parse()
        .map_err(|_| anyhow!("invalid log level {:?}", level))?;
    env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
        .context("failed to initialize logging")?;
    Ok(())
}
