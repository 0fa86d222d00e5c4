//! Command runner trait definition.
//!
//! This port defines the interface for running short-lived external commands
//! (PATH probes, toolchain queries, installs). Implementations own the
//! process lifecycle, including timeout and cancellation handling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Maximum number of characters of captured output carried in an error.
const MAX_CAPTURED_OUTPUT: usize = 4096;

/// A single external command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program to execute, resolved through `PATH` by the runner.
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
    /// Upper bound on how long the command may run.
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Shell-like rendering, suitable for telling a user what to run.
    #[must_use]
    pub fn display(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Captured result of a command that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    /// Whether the process exited successfully.
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// First non-blank line of stdout, trimmed.
    pub fn first_line(&self) -> Option<&str> {
        self.stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }

    /// Whether stdout contains anything besides whitespace.
    pub fn has_output(&self) -> bool {
        !self.stdout.trim().is_empty()
    }

    /// Stderr if non-blank, otherwise stdout, trimmed and truncated.
    pub fn combined_output(&self) -> String {
        let text = if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };
        truncate(text)
    }

    /// Convert a non-zero exit into [`CommandError::Exited`].
    pub fn into_checked(self, spec: &CommandSpec) -> Result<Self, CommandError> {
        if self.success {
            Ok(self)
        } else {
            Err(CommandError::Exited {
                command: spec.display(),
                code: self.code,
                output: self.combined_output(),
            })
        }
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_CAPTURED_OUTPUT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Errors produced while running an external command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The process could not be started (program missing, permission denied).
    #[error("failed to start `{command}`: {reason}")]
    Spawn { command: String, reason: String },

    /// The process did not finish within its timeout and was killed.
    #[error("`{command}` timed out after {}s", .timeout.as_secs_f64())]
    TimedOut { command: String, timeout: Duration },

    /// The caller cancelled the command; the process was killed.
    #[error("`{command}` was cancelled")]
    Cancelled { command: String },

    /// The process ran but exited unsuccessfully.
    #[error("`{command}` exited with {}{}", describe_code(.code), describe_output(.output))]
    Exited {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

impl CommandError {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[allow(clippy::ref_option)]
fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
}

fn describe_output(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!(": {output}")
    }
}

/// Runner for short-lived external commands.
///
/// # Design Rules
///
/// - A returned `Ok` means the process ran to completion, whatever its exit
///   status; callers decide what a non-zero exit means
/// - Timeouts and cancellation must kill and reap the child before returning
/// - Implementations hold no state between calls
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command, capturing stdout, stderr and the exit status.
    async fn run(
        &self,
        spec: &CommandSpec,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput, CommandError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> CommandSpec {
        CommandSpec::new("go", Duration::from_secs(1))
            .arg("install")
            .arg("example.com/tool@v1")
    }

    #[test]
    fn test_display_joins_arguments() {
        assert_eq!(spec().display(), "go install example.com/tool@v1");
        assert_eq!(spec().to_string(), "go install example.com/tool@v1");
    }

    #[test]
    fn test_first_line_skips_blank_lines() {
        let output = CommandOutput::ok("\n  \n/usr/bin/risor-lsp\n/opt/bin/risor-lsp\n");
        assert_eq!(output.first_line(), Some("/usr/bin/risor-lsp"));
        assert!(output.has_output());

        let blank = CommandOutput::ok("  \n");
        assert_eq!(blank.first_line(), None);
        assert!(!blank.has_output());
    }

    #[test]
    fn test_combined_output_prefers_stderr() {
        let mut output = CommandOutput::failed(1, "  network unreachable \n");
        output.stdout = "partial".to_string();
        assert_eq!(output.combined_output(), "network unreachable");

        let output = CommandOutput {
            stdout: "only stdout".to_string(),
            ..CommandOutput::failed(2, "")
        };
        assert_eq!(output.combined_output(), "only stdout");
    }

    #[test]
    fn test_combined_output_is_truncated() {
        let output = CommandOutput::failed(1, "x".repeat(MAX_CAPTURED_OUTPUT + 10));
        let combined = output.combined_output();
        assert!(combined.ends_with("..."));
        assert_eq!(combined.len(), MAX_CAPTURED_OUTPUT + 3);
    }

    #[test]
    fn test_into_checked() {
        assert!(CommandOutput::ok("fine").into_checked(&spec()).is_ok());

        let err = CommandOutput::failed(1, "boom")
            .into_checked(&spec())
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::Exited {
                command: "go install example.com/tool@v1".to_string(),
                code: Some(1),
                output: "boom".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "`go install example.com/tool@v1` exited with status 1: boom"
        );
    }

    #[test]
    fn test_error_messages() {
        let timed_out = CommandError::TimedOut {
            command: "go version".to_string(),
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(timed_out.to_string(), "`go version` timed out after 1.5s");

        let signalled = CommandError::Exited {
            command: "which risor-lsp".to_string(),
            code: None,
            output: String::new(),
        };
        assert_eq!(
            signalled.to_string(),
            "`which risor-lsp` exited with a signal"
        );
        assert!(
            CommandError::Cancelled {
                command: "go version".to_string()
            }
            .is_cancelled()
        );
    }
}
