//! Runner for external converter invocations.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::error::{Error, Result};

/// Output captured from a finished converter process.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// A single external converter invocation.
///
/// Standard error is captured for failure classification; standard output
/// is discarded and standard input is closed. No timeout applies unless one
/// is set with [`ToolCommand::timeout`].
///
/// # Example
///
/// ```no_run
/// use fconvert_av::ToolCommand;
///
/// # async fn example() -> fconvert_av::Result<()> {
/// let mut cmd = ToolCommand::new("ffmpeg");
/// cmd.args(["-hide_banner", "-i"]);
/// cmd.arg("input.mov");
/// cmd.arg("output.mp4");
/// let output = cmd.output().await?;
/// if !output.status.success() {
///     eprintln!("{}", output.stderr);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    /// Create a new command for the given program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set a maximum execution time; the process is killed when it expires.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = Some(d);
        self
    }

    /// The arguments accumulated so far.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// The base name of the program, for messages.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Run the converter to completion, capturing standard error.
    ///
    /// A nonzero exit is not an error here; callers inspect
    /// [`ToolOutput::status`] and classify the captured stderr themselves.
    ///
    /// # Errors
    ///
    /// - [`Error::Spawn`] if the process cannot be started.
    /// - [`Error::Timeout`] if a timeout is set and expires.
    /// - [`Error::Io`] if waiting on the process fails.
    pub async fn output(&self) -> Result<ToolOutput> {
        let name = self.program_name();
        tracing::debug!("spawning {name} {:?}", self.args);

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| Error::spawn(&name, e))?;

        let wait = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| Error::timeout(&name, limit))??,
            None => wait.await?,
        };

        Ok(ToolOutput {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_exit_is_captured() {
        let output = ToolCommand::new("true").output().await.expect("run true");
        assert!(output.status.success());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        let output = ToolCommand::new("false").output().await.expect("run false");
        assert!(!output.status.success());
    }

    #[tokio::test]
    async fn test_stderr_is_captured() {
        let mut cmd = ToolCommand::new("sh");
        cmd.args(["-c", "echo oops >&2; exit 1"]);
        let output = cmd.output().await.expect("run sh");
        assert!(!output.status.success());
        assert!(output.stderr.contains("oops"));
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let err = ToolCommand::new("nonexistent_tool_xyz_12345")
            .output()
            .await
            .expect_err("must fail to spawn");
        assert!(err.is_program_missing(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_timeout_fires() {
        let mut cmd = ToolCommand::new("sleep");
        cmd.arg("10");
        cmd.timeout(Duration::from_millis(100));
        let err = cmd.output().await.expect_err("must time out");
        assert!(err.to_string().contains("timed out"), "unexpected error: {err}");
    }
}
