//! Top-level error types.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, FlattenerError>;

/// Main error type for the binary
#[derive(Error, Debug)]
pub enum FlattenerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pipeline errors, shown as-is
    #[error(transparent)]
    Packager(#[from] crate::packager::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn terminal_write_failures_are_io_errors() {
        let err: FlattenerError = std::io::Error::from(std::io::ErrorKind::BrokenPipe).into();
        assert!(matches!(err, FlattenerError::Io(_)));
        assert!(err.to_string().starts_with("IO error:"));
    }

    #[test]
    fn packager_errors_are_not_rewrapped() {
        let err: FlattenerError = crate::packager::Error::MissingInput {
            path: PathBuf::from("PythonInstallPip-3.12.pkg"),
        }
        .into();
        assert_eq!(err.to_string(), "File PythonInstallPip-3.12.pkg does not exist!");
    }
}
