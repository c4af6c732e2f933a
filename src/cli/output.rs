//! Terminal output formatting.

use crate::packager::ProgressReporter;
use console::{Term, style};

/// Writes user-facing progress to the terminal.
///
/// Progress goes to stdout, warnings to stderr.
#[derive(Debug, Clone)]
pub struct OutputManager {
    stdout: Term,
    stderr: Term,
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputManager {
    /// Creates an output manager bound to the process's stdout and stderr.
    pub fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    /// Banner-style section header.
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        let rule = "=".repeat(40);
        self.stdout.write_line(&rule)?;
        self.stdout.write_line(&style(title).bold().to_string())?;
        self.stdout.write_line(&rule)
    }

    /// Progress line.
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.stdout.write_line(message)
    }

    /// Indented detail line.
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.stdout.write_line(&format!("   {}", message))
    }

    /// Success line.
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.stdout
            .write_line(&format!("{} {}", style("✓").green().bold(), message))
    }

    /// Warning on stderr.
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.stderr
            .write_line(&format!("{} {}", style("warning:").yellow().bold(), message))
    }
}

impl ProgressReporter for OutputManager {
    fn stage(&self, message: &str) {
        if let Err(e) = self.progress(message) {
            log::debug!("failed to write progress: {}", e);
        }
    }

    fn step(&self, message: &str) {
        if let Err(e) = self.indent(message) {
            log::debug!("failed to write progress: {}", e);
        }
    }
}
