//! Command handlers.
//!
//! Handlers take the composed [`CliContext`](crate::CliContext), do their
//! work and return the process exit code. Errors bubble up as
//! [`CliError`](crate::CliError) so `main` can map them to exit codes.

pub mod install_hint;
pub mod resolve;
pub mod run;

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Exit code used when the user interrupts a command.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// A token that is cancelled on the first Ctrl+C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling");
            child.cancel();
        }
    });
    token
}
