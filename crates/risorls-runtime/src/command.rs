//! Tokio-backed implementation of the command runner port.
//!
//! Every command is spawned with piped output and `kill_on_drop` as the leader
//! of its own process group. Waiting for it and draining its output share one
//! deadline and race the caller's cancellation token. On timeout or
//! cancellation the whole group is killed and the child reaped before `run`
//! returns.

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use risorls_core::ports::{CommandError, CommandOutput, CommandRunner, CommandSpec};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::process_group;

/// Log target for runner operations.
const RUNNER_TARGET: &str = "risorls_runtime::command";

/// Runs commands as local subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        spec: &CommandSpec,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput, CommandError> {
        let command = spec.display();
        if cancel.is_cancelled() {
            return Err(CommandError::Cancelled { command });
        }

        // One deadline covers the wait and the output drain.
        let deadline = Instant::now() + spec.timeout;
        debug!(target: RUNNER_TARGET, %command, timeout = ?spec.timeout, "spawning");

        let mut builder = Command::new(&spec.program);
        builder
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let mut child = process_group::isolate(&mut builder)
            .spawn()
            .map_err(|e| CommandError::Spawn {
                command: command.clone(),
                reason: e.to_string(),
            })?;
        let pgid = child.id();

        // Drain both pipes concurrently so a chatty child cannot block on a full pipe.
        let mut readers = Readers {
            stdout: spawn_reader(child.stdout.take()),
            stderr: spawn_reader(child.stderr.take()),
        };

        let finished = tokio::select! {
            () = cancel.cancelled() => None,
            result = timeout_at(deadline, wait_and_drain(&mut child, &mut readers)) => Some(result),
        };

        match finished {
            Some(Ok(Ok((status, stdout, stderr)))) => {
                debug!(
                    target: RUNNER_TARGET,
                    %command,
                    code = ?status.code(),
                    success = status.success(),
                    "finished"
                );
                Ok(CommandOutput {
                    code: status.code(),
                    success: status.success(),
                    stdout,
                    stderr,
                })
            }
            Some(Ok(Err(e))) => {
                terminate(&mut child, pgid, &mut readers, &command).await;
                Err(CommandError::Spawn {
                    command,
                    reason: e.to_string(),
                })
            }
            Some(Err(_elapsed)) => {
                warn!(target: RUNNER_TARGET, %command, timeout = ?spec.timeout, "timed out, killing");
                terminate(&mut child, pgid, &mut readers, &command).await;
                Err(CommandError::TimedOut {
                    command,
                    timeout: spec.timeout,
                })
            }
            None => {
                terminate(&mut child, pgid, &mut readers, &command).await;
                Err(CommandError::Cancelled { command })
            }
        }
    }
}

/// Output reader tasks for one child.
struct Readers {
    stdout: Option<JoinHandle<Vec<u8>>>,
    stderr: Option<JoinHandle<Vec<u8>>>,
}

impl Readers {
    fn abort(&self) {
        for task in [&self.stdout, &self.stderr].into_iter().flatten() {
            task.abort();
        }
    }
}

/// Wait for the child, then for both pipes to close.
///
/// Anything the child left running in the background keeps its pipes open,
/// so the caller must bound this with the command's deadline.
async fn wait_and_drain(
    child: &mut Child,
    readers: &mut Readers,
) -> std::io::Result<(ExitStatus, String, String)> {
    let status = child.wait().await?;
    let stdout = collect(&mut readers.stdout).await;
    let stderr = collect(&mut readers.stderr).await;
    Ok((status, stdout, stderr))
}

fn spawn_reader<R>(stream: Option<R>) -> Option<JoinHandle<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    stream.map(|mut stream| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stream.read_to_end(&mut buf).await;
            buf
        })
    })
}

async fn collect(task: &mut Option<JoinHandle<Vec<u8>>>) -> String {
    // Await in place so the handle stays reachable for `Readers::abort`.
    let Some(handle) = task.as_mut() else {
        return String::new();
    };
    let text = handle
        .await
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default();
    *task = None;
    text
}

/// Kill the whole process group, reap the child and stop the readers.
async fn terminate(child: &mut Child, pgid: Option<u32>, readers: &mut Readers, command: &str) {
    if let Some(pgid) = pgid {
        if let Err(e) = process_group::kill_group(pgid) {
            warn!(target: RUNNER_TARGET, %command, error = %e, "failed to kill process group");
        }
    }
    match child.try_wait() {
        Ok(Some(_)) => {}
        _ => {
            if let Err(e) = child.kill().await {
                warn!(target: RUNNER_TARGET, %command, error = %e, "failed to kill child");
            }
        }
    }
    readers.abort();
}
