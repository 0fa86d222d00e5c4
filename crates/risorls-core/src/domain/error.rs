//! Error taxonomy for resolution failures.
//!
//! Every message is written to be shown to a human as-is: it names the
//! missing piece and the command that fixes it.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

use crate::ports::CommandError;

/// Pipeline stage at which a resolution was interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionStage {
    Lookup,
    ToolchainCheck,
    Install,
    Verification,
}

impl ResolutionStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lookup => "PATH lookup",
            Self::ToolchainCheck => "toolchain check",
            Self::Install => "installation",
            Self::Verification => "post-install verification",
        }
    }
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of a failed resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionErrorKind {
    /// The toolchain needed for installation is not available.
    MissingToolchain,
    /// The install command failed.
    InstallationFailed,
    /// Install succeeded but the executable still cannot be located.
    VerificationFailed,
    /// The caller aborted the resolution.
    Cancelled,
}

impl ResolutionErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingToolchain => "missing-toolchain",
            Self::InstallationFailed => "installation-failed",
            Self::VerificationFailed => "verification-failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether re-running resolution without user action could succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::InstallationFailed | Self::Cancelled)
    }
}

impl fmt::Display for ResolutionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error(
        "The Go toolchain (`{toolchain}`) is required to install {executable} but is not available.\n\nInstall Go from https://go.dev/dl/ and make sure `{toolchain}` is on PATH,\nor set a custom language-server path to an existing {executable} binary."
    )]
    MissingToolchain {
        toolchain: String,
        executable: String,
        #[source]
        cause: CommandError,
    },

    #[error(
        "Failed to install {executable}.\n\nYou can install it manually by running:\n  {install_command}"
    )]
    InstallationFailed {
        executable: String,
        install_command: String,
        #[source]
        cause: CommandError,
    },

    #[error(
        "`{install_command}` reported success but {executable} still cannot be found on PATH.\n\nAdd the Go binary directory (`go env GOBIN`, or `$(go env GOPATH)/bin`) to PATH,\nor set a custom language-server path to the installed binary."
    )]
    VerificationFailed {
        executable: String,
        install_command: String,
        /// Why the verification probe failed; `None` when it exited cleanly
        /// with blank output.
        #[source]
        cause: Option<CommandError>,
    },

    #[error("Resolution of {executable} was cancelled during {stage}.")]
    Cancelled {
        executable: String,
        stage: ResolutionStage,
    },
}

impl ResolutionError {
    pub const fn kind(&self) -> ResolutionErrorKind {
        match self {
            Self::MissingToolchain { .. } => ResolutionErrorKind::MissingToolchain,
            Self::InstallationFailed { .. } => ResolutionErrorKind::InstallationFailed,
            Self::VerificationFailed { .. } => ResolutionErrorKind::VerificationFailed,
            Self::Cancelled { .. } => ResolutionErrorKind::Cancelled,
        }
    }

    /// This error's message followed by each underlying cause.
    pub fn cause_chain(&self) -> Vec<String> {
        let mut chain = vec![self.to_string()];
        let mut source = self.source();
        while let Some(err) = source {
            chain.push(err.to_string());
            source = err.source();
        }
        chain
    }
}
