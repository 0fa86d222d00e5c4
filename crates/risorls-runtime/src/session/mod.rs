//! Language-server session owned by the editor host.
//!
//! A session is created once the command has been resolved and is handed
//! back to the host, which keeps it for the lifetime of the activation and
//! passes it to [`LanguageServerSession::shutdown`] on teardown. There is no
//! process-wide client handle.

mod shutdown;

pub use shutdown::{SHUTDOWN_GRACE, shutdown_child};

use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use risorls_core::ports::TraceSink;
use risorls_core::ResolvedCommand;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::process_group;

/// Log target for session operations.
const SESSION_TARGET: &str = "risorls_runtime::session";

/// How long stderr may stay open after the server has exited.
const STDERR_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Errors raised while starting or stopping a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to start language server `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Language server I/O error: {0}")]
    Io(#[from] io::Error),
}

/// How to launch the language server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLaunch {
    pub command: String,
    pub args: Vec<String>,
}

impl ServerLaunch {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

impl From<&ResolvedCommand> for ServerLaunch {
    fn from(resolved: &ResolvedCommand) -> Self {
        Self::new(&resolved.command)
    }
}

/// A running language server.
///
/// stdin/stdout are piped for the host's protocol transport; stderr is
/// forwarded line by line to the [`TraceSink`]. Dropping the session kills
/// the server.
pub struct LanguageServerSession {
    child: Child,
    pgid: Option<u32>,
    command: String,
    sink: Arc<dyn TraceSink>,
    stderr_task: Option<JoinHandle<()>>,
    grace: Duration,
}

impl LanguageServerSession {
    /// Spawn the server. Must be called from within a tokio runtime.
    pub fn start(launch: &ServerLaunch, sink: Arc<dyn TraceSink>) -> Result<Self, SessionError> {
        let mut builder = Command::new(&launch.command);
        builder
            .args(&launch.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let mut child = process_group::isolate(&mut builder)
            .spawn()
            .map_err(|source| SessionError::Spawn {
                command: launch.command.clone(),
                source,
            })?;

        let pid = child.id();
        info!(target: SESSION_TARGET, command = %launch.command, pid = ?pid, "language server started");
        sink.write(&format!(
            "Started {} (pid {})",
            launch.command,
            pid.map_or_else(|| "unknown".to_string(), |p| p.to_string())
        ));

        let stderr_task = child.stderr.take().map(|stderr| {
            let sink = Arc::clone(&sink);
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(target: SESSION_TARGET, "stderr: {line}");
                    sink.write(&line);
                }
            })
        });

        Ok(Self {
            child,
            pgid: pid,
            command: launch.command.clone(),
            sink,
            stderr_task,
            grace: SHUTDOWN_GRACE,
        })
    }

    /// Override how long shutdown waits after SIGTERM.
    #[must_use]
    pub const fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// OS process id, `None` once the server has been reaped.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// The server's stdin, for the host's transport. Returns `None` after the first call.
    pub fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.child.stdin.take()
    }

    /// The server's stdout, for the host's transport. Returns `None` after the first call.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Exit status if the server has already exited.
    pub fn try_exit_status(&mut self) -> Result<Option<ExitStatus>, SessionError> {
        Ok(self.child.try_wait()?)
    }

    /// Wait for the server to exit on its own.
    pub async fn wait(&mut self) -> Result<ExitStatus, SessionError> {
        let status = self.child.wait().await?;
        self.drain_stderr().await;
        self.sink
            .write(&format!("{} exited with {status}", self.command));
        Ok(status)
    }

    /// Stop the server, reap it and kill anything it left in its process group.
    pub async fn shutdown(mut self) -> Result<ExitStatus, SessionError> {
        // Closing stdin lets well-behaved servers exit before the signal lands.
        drop(self.child.stdin.take());
        let status = shutdown_child(&mut self.child, self.grace).await?;
        if let Some(pgid) = self.pgid {
            if let Err(e) = process_group::kill_group(pgid) {
                warn!(target: SESSION_TARGET, command = %self.command, error = %e, "failed to kill process group");
            }
        }
        self.drain_stderr().await;
        info!(target: SESSION_TARGET, command = %self.command, %status, "language server stopped");
        self.sink
            .write(&format!("Stopped {} ({status})", self.command));
        Ok(status)
    }

    /// Forward what is left of stderr, giving up once the grace has passed.
    async fn drain_stderr(&mut self) {
        if let Some(mut task) = self.stderr_task.take() {
            if timeout(STDERR_DRAIN_GRACE, &mut task).await.is_err() {
                debug!(target: SESSION_TARGET, command = %self.command, "stderr still open after exit, detaching");
                task.abort();
            }
        }
    }
}
