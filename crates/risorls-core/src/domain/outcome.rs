//! Resolution outcome types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{ResolutionError, ResolutionErrorKind};

/// Which strategy produced a resolved command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionSource {
    /// The user-supplied override path, taken on trust.
    Override,
    /// The executable was already on `PATH`.
    FoundOnPath,
    /// The executable was installed and then located on `PATH`.
    Installed,
}

impl ResolutionSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::FoundOnPath => "found-on-path",
            Self::Installed => "installed",
        }
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invocable command and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCommand {
    /// Command string to spawn. Never empty.
    pub command: String,
    pub source: ResolutionSource,
    /// First path the locate probe reported, if a probe ran.
    pub probed_path: Option<String>,
}

impl ResolvedCommand {
    pub fn from_override(path: impl Into<String>) -> Self {
        Self {
            command: path.into(),
            source: ResolutionSource::Override,
            probed_path: None,
        }
    }
}

/// Terminal result of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Resolved(ResolvedCommand),
    Failed(ResolutionError),
}

impl ResolutionOutcome {
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The command string, when resolved.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Resolved(resolved) => Some(&resolved.command),
            Self::Failed(_) => None,
        }
    }

    pub const fn source(&self) -> Option<ResolutionSource> {
        match self {
            Self::Resolved(resolved) => Some(resolved.source),
            Self::Failed(_) => None,
        }
    }

    pub const fn error_kind(&self) -> Option<ResolutionErrorKind> {
        match self {
            Self::Resolved(_) => None,
            Self::Failed(err) => Some(err.kind()),
        }
    }

    pub fn into_result(self) -> Result<ResolvedCommand, ResolutionError> {
        match self {
            Self::Resolved(resolved) => Ok(resolved),
            Self::Failed(err) => Err(err),
        }
    }

    /// Flat, serializable view for hosts that exchange JSON.
    pub fn report(&self) -> OutcomeReport {
        match self {
            Self::Resolved(resolved) => OutcomeReport {
                status: OutcomeStatus::Resolved,
                command: Some(resolved.command.clone()),
                source: Some(resolved.source),
                probed_path: resolved.probed_path.clone(),
                kind: None,
                message: None,
                causes: Vec::new(),
            },
            Self::Failed(err) => {
                let mut chain = err.cause_chain();
                let message = chain.remove(0);
                OutcomeReport {
                    status: OutcomeStatus::Failed,
                    command: None,
                    source: None,
                    probed_path: None,
                    kind: Some(err.kind()),
                    message: Some(message),
                    causes: chain,
                }
            }
        }
    }
}

impl From<Result<ResolvedCommand, ResolutionError>> for ResolutionOutcome {
    fn from(result: Result<ResolvedCommand, ResolutionError>) -> Self {
        match result {
            Ok(resolved) => Self::Resolved(resolved),
            Err(err) => Self::Failed(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Resolved,
    Failed,
}

/// Serializable projection of a [`ResolutionOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeReport {
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ResolutionSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probed_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResolutionErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}
