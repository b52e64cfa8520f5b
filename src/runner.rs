//! Shell command execution
//!
//! Everything that runs a repository command goes through the [`Shell`]
//! trait, so the orchestrator can be driven by a fake in tests.

use crate::utils::get_exit_code_description;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// What happens to the output of a command while it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Print lines as they arrive and capture them
    Stream,
    /// Only capture
    Capture,
}

/// Exit status and captured output of one shell command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs one command line through the platform shell
///
/// An `Err` means the command could not be started; a command that ran and
/// failed is an `Ok` with a non-zero exit code.
#[async_trait]
pub trait Shell: Send + Sync {
    async fn run(&self, command: &str, mode: OutputMode) -> Result<ShellOutput>;
}

/// [`Shell`] backed by `sh -c` (`cmd /C` on Windows)
#[derive(Debug, Default, Clone)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    fn shell_command(command: &str) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C");
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c");
            cmd
        };
        cmd.arg(command);
        cmd
    }
}

#[async_trait]
impl Shell for CommandRunner {
    async fn run(&self, command: &str, mode: OutputMode) -> Result<ShellOutput> {
        let mut child = Self::shell_command(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start '{command}'"))?;

        let stdout = child.stdout.take().context("Failed to capture stdout")?;
        let stderr = child.stderr.take().context("Failed to capture stderr")?;

        let echo = mode == OutputMode::Stream;
        let stdout_handle = tokio::spawn(collect_lines(stdout, echo.then_some(Stream::Stdout)));
        let stderr_handle = tokio::spawn(collect_lines(stderr, echo.then_some(Stream::Stderr)));

        let (stdout_result, stderr_result) = tokio::join!(stdout_handle, stderr_handle);
        let stdout = stdout_result.unwrap_or_default();
        let stderr = stderr_result.unwrap_or_default();

        let status = child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for '{command}'"))?;
        let exit_code = status.code();

        match exit_code {
            Some(code) => tracing::debug!(
                "Command '{}' ended with exit code {} ({})",
                command,
                code,
                get_exit_code_description(code)
            ),
            None => tracing::debug!("Command '{}' was terminated by a signal", command),
        }

        Ok(ShellOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

async fn collect_lines<R>(reader: R, echo: Option<Stream>) -> String
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut content = String::new();
    // always drain to EOF; undecodable bytes become U+FFFD
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        let line = String::from_utf8_lossy(&buf);
        match echo {
            Some(Stream::Stdout) => println!("{line}"),
            Some(Stream::Stderr) => eprintln!("{line}"),
            None => {}
        }
        content.push_str(&line);
        content.push('\n');
    }
    content
}
