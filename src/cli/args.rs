//! Command line argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

/// Create a flat installer package for Python.
#[derive(Parser, Debug)]
#[command(
    name = "python-flat-installer",
    version,
    about = "Create a flat installer package for Python.",
    long_about = "Converts the component-based Python.mpkg installer into a single flat .pkg.

Usage:
  python-flat-installer /Volumes/Python/Python.mpkg ./out

The result is written to <OUTPUT>/python-<version>-macos<major>.pkg.
A working folder <OUTPUT>/temp is used during the run and removed on success."
)]
pub struct Args {
    /// Path to Python.mpkg
    #[arg(value_name = "MPKG")]
    pub mpkg: PathBuf,

    /// Path to output folder
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.mpkg.as_os_str().is_empty() {
            return Err("mpkg path cannot be empty".to_string());
        }
        if !self.mpkg.is_dir() {
            return Err(format!(
                "{} is not an installer bundle directory",
                self.mpkg.display()
            ));
        }
        if self.output.as_os_str().is_empty() {
            return Err("output folder cannot be empty".to_string());
        }
        if self.output.exists() && !self.output.is_dir() {
            return Err(format!("{} is not a directory", self.output.display()));
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(_args: &Args) -> Self {
        // Detail beyond progress goes to the log (RUST_LOG).
        let output = super::OutputManager::new();

        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
