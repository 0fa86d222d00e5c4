//! CLI-specific error types and exit-code mapping.

use risorls_core::{ResolutionError, ResolutionErrorKind, SettingsError};
use risorls_runtime::SessionError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The language server could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Invalid settings from any layer.
    #[error("Configuration error: {0}")]
    Settings(#[from] SettingsError),

    /// The config file could not be read.
    #[error("Cannot read config file {path}: {reason}")]
    ConfigFile { path: String, reason: String },

    /// The language server could not be started or stopped.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The outcome report could not be serialised.
    #[error("Cannot render outcome report: {0}")]
    Report(#[from] serde_json::Error),

    /// IO error on the terminal streams.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits:
    /// - 69 (`EX_UNAVAILABLE`): Go toolchain missing
    /// - 70 (`EX_SOFTWARE`): `go install` failed, or the report could not be rendered
    /// - 71 (`EX_OSERR`): server could not be spawned
    /// - 74 (`EX_IOERR`): terminal I/O failed
    /// - 78 (`EX_CONFIG`): bad settings, or installed binary not on PATH
    /// - 130: interrupted
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Resolution(err) => match err.kind() {
                ResolutionErrorKind::MissingToolchain => 69,
                ResolutionErrorKind::InstallationFailed => 70,
                ResolutionErrorKind::VerificationFailed => 78,
                ResolutionErrorKind::Cancelled => 130,
            },
            Self::Settings(_) | Self::ConfigFile { .. } => 78,
            Self::Report(_) => 70,
            Self::Session(_) => 71,
            Self::Io(_) => 74,
        }
    }
}
