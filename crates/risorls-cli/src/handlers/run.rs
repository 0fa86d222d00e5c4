//! `risorls run`: resolve, launch and bridge the language server.
//!
//! Terminal stdin is copied to the server and the server's stdout back to
//! the terminal until the server closes its stdout or the user interrupts.
//! Either way the session is shut down before returning.

use std::sync::Arc;

use risorls_runtime::{LanguageServerSession, ServerLaunch, TracingTraceSink};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use super::{INTERRUPTED_EXIT_CODE, cancel_on_ctrl_c};
use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, args: Vec<String>) -> Result<i32, CliError> {
    let cancel = cancel_on_ctrl_c();
    let resolved = ctx
        .resolver
        .resolve_with_cancel(&ctx.request, &cancel)
        .await
        .into_result()?;

    let launch = ServerLaunch::from(&resolved).with_args(args);
    let mut session = LanguageServerSession::start(&launch, Arc::new(TracingTraceSink))?;

    let inbound = session.take_stdin().map(|mut server_stdin| {
        tokio::spawn(async move {
            let mut stdin = tokio::io::stdin();
            if let Err(e) = pump(&mut stdin, &mut server_stdin).await {
                warn!(error = %e, "stdin bridge closed");
            }
        })
    });
    let server_stdout = session.take_stdout();

    let interrupted = tokio::select! {
        result = async {
            match server_stdout {
                Some(mut reader) => pump(&mut reader, &mut tokio::io::stdout()).await,
                None => Ok(0),
            }
        } => {
            if let Err(e) = result {
                warn!(error = %e, "stdout bridge closed");
            }
            false
        }
        () = cancel.cancelled() => true,
    };

    if let Some(task) = inbound {
        task.abort();
    }

    let status = session.shutdown().await?;
    info!(%status, interrupted, "language server session ended");

    if interrupted {
        return Ok(INTERRUPTED_EXIT_CODE);
    }
    Ok(status.code().unwrap_or(1))
}

/// Copy until EOF, flushing the writer at the end.
async fn pump<R, W>(reader: &mut R, writer: &mut W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let copied = tokio::io::copy(reader, writer).await?;
    writer.flush().await?;
    Ok(copied)
}
