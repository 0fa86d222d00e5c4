//! CLI bootstrap - the composition root.
//!
//! Settings are layered here (defaults, config file, environment and flags)
//! and the concrete runner is wired into the resolver. Handlers only see the
//! finished [`CliContext`].

use std::path::Path;
use std::sync::Arc;

use risorls_core::{HostOs, ResolutionRequest, Settings, validate_settings};
use risorls_runtime::{Resolver, TokioCommandRunner};
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Fully layered and validated settings.
    pub settings: Settings,
    /// Host the request is built for.
    pub host_os: HostOs,
}

impl CliConfig {
    /// Defaults only, for the current host.
    pub fn with_defaults() -> Self {
        Self {
            settings: Settings::with_defaults(),
            host_os: HostOs::current(),
        }
    }

    /// Layer the optional config file and the command line over the defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let file = cli.config.as_deref().map(load_settings_file).transpose()?;
        Self::layered(file.as_ref(), &cli.settings_overrides())
    }

    /// Merge `file` then `overrides` onto the defaults and validate the result.
    pub fn layered(file: Option<&Settings>, overrides: &Settings) -> Result<Self, CliError> {
        let mut config = Self::with_defaults();
        if let Some(file) = file {
            config.settings.merge(file);
        }
        config.settings.merge(overrides);
        validate_settings(&config.settings)?;
        Ok(config)
    }
}

/// Read a JSON settings file.
pub fn load_settings_file(path: &Path) -> Result<Settings, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::ConfigFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let settings = Settings::from_json(&text)?;
    debug!(path = %path.display(), "loaded settings file");
    Ok(settings)
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub settings: Settings,
    pub request: ResolutionRequest,
    pub resolver: Resolver,
}

/// Wire the resolver for the given configuration.
pub fn bootstrap(config: CliConfig) -> CliContext {
    let request = config.settings.to_request(config.host_os);
    let resolver = Resolver::new(
        Arc::new(TokioCommandRunner::new()),
        config.settings.resolver_settings(),
    );
    CliContext {
        settings: config.settings,
        request,
        resolver,
    }
}
