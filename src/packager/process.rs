//! External tool invocation.
//!
//! Every packaging step shells out to an OS-provided binary. [`ToolCommand`]
//! runs one to completion, captures its output, and turns a non-zero exit
//! into [`Error::ToolFailed`] with stderr carried through untouched.

use crate::packager::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Captured output of a successful tool run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Standard output, lossily decoded
    pub stdout: String,
}

/// A single external command, built up and then awaited.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl ToolCommand {
    /// Starts a command for `program`.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Runs the command from `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Renders the command line for messages.
    pub fn display(&self) -> String {
        let program = self
            .program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string());

        std::iter::once(program)
            .chain(self.args.iter().map(|a| {
                let arg = a.to_string_lossy();
                if arg.contains(' ') {
                    format!("\"{arg}\"")
                } else {
                    arg.into_owned()
                }
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the command to completion.
    ///
    /// # Errors
    ///
    /// - [`Error::CommandFailed`] if the process cannot be spawned
    /// - [`Error::ToolFailed`] if it exits unsuccessfully
    pub async fn run(&self) -> Result<ToolOutput> {
        let command_line = self.display();
        log::debug!("Running: {}", command_line);

        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|error| Error::CommandFailed {
            command: command_line.clone(),
            error,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::ToolFailed {
                command: command_line,
                code: output.status.code(),
                stderr: stderr.trim_end().to_string(),
            });
        }

        if !stdout.trim().is_empty() {
            log::trace!("{} stdout: {}", command_line, stdout.trim_end());
        }
        if !stderr.trim().is_empty() {
            log::trace!("{} stderr: {}", command_line, stderr.trim_end());
        }

        Ok(ToolOutput { stdout })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let cmd = ToolCommand::new("/usr/bin/pkgbuild")
            .arg("--root")
            .arg("/tmp/Python 3.12");
        assert_eq!(cmd.display(), "pkgbuild --root \"/tmp/Python 3.12\"");
    }

    #[tokio::test]
    async fn captures_stdout_on_success() {
        let out = ToolCommand::new("sh")
            .args(["-c", "echo 23A344"])
            .run()
            .await
            .unwrap();
        assert_eq!(out.stdout.trim(), "23A344");
    }

    #[tokio::test]
    async fn stderr_does_not_fail_a_successful_run() {
        let out = ToolCommand::new("sh")
            .args(["-c", "echo 'pkgbuild: Adding component' >&2; echo done"])
            .run()
            .await
            .unwrap();
        assert_eq!(out.stdout.trim(), "done");
    }

    #[tokio::test]
    async fn non_zero_exit_becomes_tool_failed() {
        let err = ToolCommand::new("sh")
            .args(["-c", "echo boom >&2; exit 3"])
            .run()
            .await
            .unwrap_err();
        match err {
            Error::ToolFailed { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unspawnable_program_is_command_failed() {
        let err = ToolCommand::new("/nonexistent/tool/for/tests")
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
    }
}
