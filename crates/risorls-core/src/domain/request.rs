//! Resolution request and the values it carries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default name of the language-server executable.
pub const DEFAULT_EXECUTABLE_NAME: &str = "risor-lsp";

/// Default module path handed to `go install`.
pub const DEFAULT_INSTALL_MODULE: &str = "github.com/risor-io/risor/cmd/risor-lsp";

/// Default pinned version tag for automated installation.
pub const DEFAULT_INSTALL_VERSION: &str = "v1.8.1";

/// Host operating system family.
///
/// Only the Windows/non-Windows split changes behaviour (it selects the
/// "locate executable" command), but the finer identity is kept for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl HostOs {
    /// The operating system this binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// Parse a platform identifier.
    ///
    /// Accepts both Rust-style (`windows`, `macos`) and Node-style
    /// (`win32`, `darwin`) names, case-insensitively. Unknown identifiers map
    /// to [`HostOs::Other`], which is treated as POSIX.
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier.trim().to_ascii_lowercase().as_str() {
            "windows" | "win32" | "win64" | "cygwin" => Self::Windows,
            "macos" | "darwin" | "osx" => Self::MacOs,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }

    /// Whether this is the Windows family.
    #[must_use]
    pub const fn is_windows(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Program used to search `PATH` for an executable.
    #[must_use]
    pub const fn locate_program(self) -> &'static str {
        if self.is_windows() { "where" } else { "which" }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Module path and version tag used for automated installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReference {
    pub module: String,
    pub version: String,
}

impl InstallReference {
    pub fn new(module: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            version: version.into(),
        }
    }

    /// The `module@version` form accepted by `go install`.
    #[must_use]
    pub fn target(&self) -> String {
        format!("{}@{}", self.module, self.version)
    }
}

impl Default for InstallReference {
    fn default() -> Self {
        Self::new(DEFAULT_INSTALL_MODULE, DEFAULT_INSTALL_VERSION)
    }
}

/// Immutable input to one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRequest {
    /// User-supplied path. Blank values are treated as absent.
    pub override_path: Option<String>,
    /// Executable to look up on `PATH`.
    pub executable_name: String,
    /// What to install when the executable is missing.
    pub install_ref: InstallReference,
    /// Selects the locate command.
    pub host_os: HostOs,
}

impl ResolutionRequest {
    /// Request for the default executable on the current host.
    #[must_use]
    pub fn new() -> Self {
        Self {
            override_path: None,
            executable_name: DEFAULT_EXECUTABLE_NAME.to_string(),
            install_ref: InstallReference::default(),
            host_os: HostOs::current(),
        }
    }

    #[must_use]
    pub fn with_override_path(mut self, path: Option<String>) -> Self {
        self.override_path = path;
        self
    }

    #[must_use]
    pub fn with_executable_name(mut self, name: impl Into<String>) -> Self {
        self.executable_name = name.into();
        self
    }

    #[must_use]
    pub fn with_install_ref(mut self, install_ref: InstallReference) -> Self {
        self.install_ref = install_ref;
        self
    }

    #[must_use]
    pub const fn with_host_os(mut self, host_os: HostOs) -> Self {
        self.host_os = host_os;
        self
    }

    /// The override path, if present and non-blank after trimming.
    pub fn effective_override(&self) -> Option<&str> {
        self.override_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }
}

impl Default for ResolutionRequest {
    fn default() -> Self {
        Self::new()
    }
}
