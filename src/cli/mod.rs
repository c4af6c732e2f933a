//! Command line interface.
//!
//! Parses the two positional arguments, prints the banner and version
//! summary, and drives the [`Flattener`](crate::packager::Flattener).

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{CliError, FlattenerError, Result};
use crate::packager::{Flattener, SettingsBuilder};
use std::time::Instant;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args).await
}

/// Runs a conversion for already parsed arguments.
pub async fn execute(args: &Args) -> Result<i32> {
    let start = Instant::now();

    args.validate()
        .map_err(|reason| FlattenerError::Cli(CliError::InvalidArguments { reason }))?;

    let config = RuntimeConfig::from(args);
    let settings = SettingsBuilder::new()
        .mpkg_path(&args.mpkg)
        .output_directory(&args.output)
        .build()?;

    let flattener = Flattener::new(settings)?;
    let versions = flattener.discover_versions().await?;

    config.section("Python Flat Installer Creator")?;
    config.progress(&format!("Target Python version: {}", versions.extended_version))?;
    config.progress(&format!("Build version: {}", versions.build_version))?;
    config.progress("")?;

    let output = flattener
        .settings()
        .output_file(&versions.extended_version, &versions.os_major);
    if output.exists() {
        config.warn(&format!("{} will be replaced", output.display()))?;
    }

    let package = flattener.convert(&versions, config.output()).await?;

    config.success(&format!("Done! Created {}", package.path.display()))?;
    config.indent(&format!("Size: {} bytes", package.size))?;
    config.indent(&format!("SHA256: {}", package.checksum))?;
    config.indent(&format!(
        "Time elapsed: {:.2} seconds",
        start.elapsed().as_secs_f64()
    ))?;

    Ok(0)
}
