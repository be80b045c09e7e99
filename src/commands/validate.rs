//! # Validate Command Implementation
//!
//! Loads a release directory and runs every consistency check on it:
//! slice references, path conflicts, prefer relationships, glob overlaps,
//! essential loops and archive settings. Nothing is written.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use sliceplan::config;

/// Validate a release definition directory
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory holding release.yaml and slices/.
    ///
    /// Can also be set with the `SLICEPLAN_RELEASE` environment variable.
    #[arg(long, value_name = "DIR", env = "SLICEPLAN_RELEASE", default_value = ".")]
    pub release: PathBuf,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs) -> Result<()> {
    let release = config::read_release(&args.release)
        .with_context(|| format!("invalid release {}", args.release.display()))?;

    let slices: usize = release.packages.values().map(|p| p.slices.len()).sum();
    println!(
        "Release {} is valid: {} packages, {} slices, {} archives",
        args.release.display(),
        release.packages.len(),
        slices,
        release.archives.len()
    );
    Ok(())
}
