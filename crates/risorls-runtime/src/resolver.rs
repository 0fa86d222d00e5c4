//! risor-lsp executable resolution.
//!
//! This module owns the ordered fallback chain that turns a
//! [`ResolutionRequest`] into a [`ResolutionOutcome`]:
//!
//! 1. Non-blank override path (trusted, no probe)
//! 2. `which`/`where` lookup on PATH
//! 3. Toolchain check (`go version`)
//! 4. Automated install (`go install module@version`)
//! 5. Post-install lookup, which must succeed for the install to count
//!
//! Stages run strictly in order and each one only runs if the previous one
//! did not resolve. Nothing is cached between calls.

use std::sync::Arc;

use risorls_core::ports::{CommandError, CommandOutput, CommandRunner, CommandSpec};
use risorls_core::{
    ResolutionError, ResolutionOutcome, ResolutionRequest, ResolutionSource, ResolutionStage,
    ResolvedCommand, ResolverSettings,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Log target for resolver operations.
const RESOLVER_TARGET: &str = "risorls_runtime::resolver";

/// Result of one PATH probe.
enum Lookup {
    Found(CommandOutput),
    Missing(Option<CommandError>),
    Cancelled,
}

/// Resolves a runnable command for the language-server executable.
#[derive(Clone)]
pub struct Resolver {
    runner: Arc<dyn CommandRunner>,
    settings: ResolverSettings,
}

impl Resolver {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: ResolverSettings) -> Self {
        Self { runner, settings }
    }

    pub const fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolve without external cancellation.
    pub async fn resolve(&self, request: &ResolutionRequest) -> ResolutionOutcome {
        self.resolve_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Resolve, aborting with [`ResolutionError::Cancelled`] once `cancel`
    /// fires. An in-flight subprocess is killed by the runner.
    pub async fn resolve_with_cancel(
        &self,
        request: &ResolutionRequest,
        cancel: &CancellationToken,
    ) -> ResolutionOutcome {
        let outcome: ResolutionOutcome = self.run_pipeline(request, cancel).await.into();
        match &outcome {
            ResolutionOutcome::Resolved(resolved) => info!(
                target: RESOLVER_TARGET,
                command = %resolved.command,
                source = %resolved.source,
                "resolved language server"
            ),
            ResolutionOutcome::Failed(err) => warn!(
                target: RESOLVER_TARGET,
                kind = %err.kind(),
                error = %err,
                "language server resolution failed"
            ),
        }
        outcome
    }

    async fn run_pipeline(
        &self,
        request: &ResolutionRequest,
        cancel: &CancellationToken,
    ) -> Result<ResolvedCommand, ResolutionError> {
        let executable = request.executable_name.as_str();

        // Stage 1: override
        if let Some(path) = request.effective_override() {
            debug!(target: RESOLVER_TARGET, path, "using override path");
            return Ok(ResolvedCommand::from_override(path));
        }

        // Stage 2: PATH lookup
        match self.lookup(request, cancel).await {
            Lookup::Found(output) => {
                return Ok(self.resolved(executable, ResolutionSource::FoundOnPath, &output));
            }
            Lookup::Cancelled => return Err(cancelled(executable, ResolutionStage::Lookup)),
            Lookup::Missing(cause) => {
                debug!(
                    target: RESOLVER_TARGET,
                    executable,
                    cause = ?cause,
                    "not on PATH, falling back to installation"
                );
            }
        }

        // Stage 3: toolchain check
        let version = self
            .settings
            .toolchain
            .version_command(self.settings.toolchain_timeout);
        match self.checked(&version, cancel).await {
            Ok(output) => {
                debug!(
                    target: RESOLVER_TARGET,
                    version = output.first_line().unwrap_or_default(),
                    "toolchain available"
                );
            }
            Err(e) if e.is_cancelled() => {
                return Err(cancelled(executable, ResolutionStage::ToolchainCheck));
            }
            Err(cause) => {
                return Err(ResolutionError::MissingToolchain {
                    toolchain: self.settings.toolchain.program.clone(),
                    executable: executable.to_string(),
                    cause,
                });
            }
        }

        // Stage 4: install
        let install = self
            .settings
            .toolchain
            .install_command(&request.install_ref, self.settings.install_timeout);
        info!(target: RESOLVER_TARGET, command = %install, "installing language server");
        match self.checked(&install, cancel).await {
            Ok(_) => {}
            Err(e) if e.is_cancelled() => {
                return Err(cancelled(executable, ResolutionStage::Install));
            }
            Err(cause) => {
                return Err(ResolutionError::InstallationFailed {
                    executable: executable.to_string(),
                    install_command: install.display(),
                    cause,
                });
            }
        }

        // Stage 5: verification
        match self.lookup(request, cancel).await {
            Lookup::Found(output) => {
                Ok(self.resolved(executable, ResolutionSource::Installed, &output))
            }
            Lookup::Cancelled => Err(cancelled(executable, ResolutionStage::Verification)),
            Lookup::Missing(cause) => Err(ResolutionError::VerificationFailed {
                executable: executable.to_string(),
                install_command: install.display(),
                cause,
            }),
        }
    }

    /// Run the locate probe. Any failure other than cancellation means
    /// "not found".
    async fn lookup(&self, request: &ResolutionRequest, cancel: &CancellationToken) -> Lookup {
        let spec = request
            .host_os
            .locate_command(&request.executable_name, self.settings.lookup_timeout);
        match self.checked(&spec, cancel).await {
            Ok(output) if output.has_output() => Lookup::Found(output),
            Ok(_) => Lookup::Missing(None),
            Err(e) if e.is_cancelled() => Lookup::Cancelled,
            Err(e) => Lookup::Missing(Some(e)),
        }
    }

    async fn checked(
        &self,
        spec: &CommandSpec,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput, CommandError> {
        self.runner.run(spec, cancel).await?.into_checked(spec)
    }

    fn resolved(
        &self,
        executable: &str,
        source: ResolutionSource,
        probe: &CommandOutput,
    ) -> ResolvedCommand {
        let probed_path = probe.first_line().map(str::to_string);
        let command = match (&probed_path, self.settings.prefer_absolute_path) {
            (Some(path), true) => path.clone(),
            _ => executable.to_string(),
        };
        ResolvedCommand {
            command,
            source,
            probed_path,
        }
    }
}

fn cancelled(executable: &str, stage: ResolutionStage) -> ResolutionError {
    ResolutionError::Cancelled {
        executable: executable.to_string(),
        stage,
    }
}
