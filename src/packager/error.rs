//! Error types for the packaging pipeline.
//!
//! Every failure is fatal: the pipeline never retries and never rolls back,
//! so these types only need to carry enough context to tell the user what
//! went wrong and where.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for packaging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while converting an mpkg into a flat package.
#[derive(Error, Debug)]
pub enum Error {
    /// An expected input (metadata file, sub-package, script) is absent.
    #[error("File {} does not exist!", path.display())]
    MissingInput {
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// The bundle's metadata file could not be understood.
    #[error("malformed bundle metadata in {}: {reason}", path.display())]
    MalformedMetadata {
        /// Metadata file that failed to parse
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// A required packaging tool is not on `PATH`.
    #[error("required tool `{tool}` not found in PATH: {source}")]
    ToolNotFound {
        /// Tool name
        tool: &'static str,
        /// Lookup failure
        #[source]
        source: which::Error,
    },

    /// A tool could not be spawned at all.
    #[error("failed to execute `{command}`: {error}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Spawn error
        error: std::io::Error,
    },

    /// A tool ran and exited unsuccessfully.
    #[error("`{command}` exited with {}: {stderr}", exit_code_display(*code))]
    ToolFailed {
        /// Rendered command line
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured stderr, verbatim
        stderr: String,
    },

    /// Filesystem error with the path it happened on.
    #[error("{context} ({}): {error}", path.display())]
    Fs {
        /// What was being attempted
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        error: std::io::Error,
    },

    /// Template registration or rendering failed.
    #[error("template error: {0}")]
    Template(String),

    /// XML read error while patching a package-info document.
    #[error("XML parse error: {0}")]
    XmlRead(#[from] xml::reader::Error),

    /// XML write error while patching a package-info document.
    #[error("XML write error: {0}")]
    XmlWrite(#[from] xml::writer::Error),

    /// Directory traversal error.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error(transparent)]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Catch-all with a message.
    #[error("{0}")]
    GenericError(String),

    /// Message with an underlying cause.
    #[error("{context}: {source}")]
    Context {
        /// Added context
        context: String,
        /// Original error
        #[source]
        source: Box<Error>,
    },
}

fn exit_code_display(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}

/// Attach a path and description to IO results.
pub trait ErrorExt<T> {
    /// Convert an IO error into [`Error::Fs`] naming `path`.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Add a human-readable message to an error or a missing value.
pub trait Context<T> {
    /// Wrap the error with a fixed message.
    fn context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Wrap the error with a lazily built message.
    fn with_context<C: Into<String>, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|source| Error::Context {
            context: context.into(),
            source: Box::new(source),
        })
    }

    fn with_context<C: Into<String>, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.map_err(|source| Error::Context {
            context: f().into(),
            source: Box::new(source),
        })
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.into()))
    }

    fn with_context<C: Into<String>, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(f().into()))
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::packager::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_names_the_file() {
        let err = Error::MissingInput {
            path: PathBuf::from("Python.mpkg/Contents/Packages/PythonFramework-3.12.pkg"),
        };
        assert!(err.to_string().contains("PythonFramework-3.12.pkg"));
    }

    #[test]
    fn tool_failure_keeps_stderr_verbatim() {
        let err = Error::ToolFailed {
            command: "pkgbuild --root x".into(),
            code: Some(1),
            stderr: "pkgbuild: error: Invalid component".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("pkgbuild: error: Invalid component"));
    }

    #[test]
    fn fs_context_records_path() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        let err = res.fs_context("creating work dir", "/out/temp").unwrap_err();
        assert!(matches!(err, Error::Fs { ref path, .. } if path == Path::new("/out/temp")));
    }
}
