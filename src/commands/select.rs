//! # Select Command Implementation
//!
//! Loads and validates a release, then prints the slices needed for the
//! requested ones in installation order, followed by the package chosen for
//! every path settled by a prefer relationship.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use sliceplan::config;
use sliceplan::release::{select, SliceKey};

/// Plan the installation of a set of slices
#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Directory holding release.yaml and slices/.
    #[arg(long, value_name = "DIR", env = "SLICEPLAN_RELEASE", default_value = ".")]
    pub release: PathBuf,

    /// Slices to select, written as <package>_<slice>.
    #[arg(value_name = "SLICE", required = true)]
    pub slices: Vec<SliceKey>,
}

/// Execute the `select` command.
pub fn execute(args: SelectArgs) -> Result<()> {
    let release = config::read_release(&args.release)
        .with_context(|| format!("invalid release {}", args.release.display()))?;

    let selection = select(&release, &args.slices)?;
    for slice in &selection.slices {
        println!("{}", slice);
    }

    let prefers = selection.prefers()?;
    if !prefers.is_empty() {
        println!();
        println!("Preferred packages:");
        for (path, package) in &prefers {
            println!("  {} <- {}", path, package.name);
        }
    }
    Ok(())
}
