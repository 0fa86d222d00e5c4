//! `risorls resolve`: resolve the command and print it.

use risorls_core::ResolutionOutcome;

use super::cancel_on_ctrl_c;
use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Resolve and print the command (or the JSON report with `--json`).
///
/// In JSON mode a failure is reported in the document itself, so only the
/// exit code is returned rather than an error.
pub async fn execute(ctx: &CliContext, json: bool) -> Result<i32, CliError> {
    let cancel = cancel_on_ctrl_c();
    let outcome = ctx
        .resolver
        .resolve_with_cancel(&ctx.request, &cancel)
        .await;

    if json {
        println!("{}", render_report(&outcome)?);
        return Ok(exit_code(outcome));
    }

    let resolved = outcome.into_result()?;
    println!("{}", resolved.command);
    Ok(0)
}

pub fn render_report(outcome: &ResolutionOutcome) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(&outcome.report())?)
}

fn exit_code(outcome: ResolutionOutcome) -> i32 {
    outcome
        .into_result()
        .map_or_else(|err| CliError::from(err).exit_code(), |_| 0)
}
