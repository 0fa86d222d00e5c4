//! The three command shapes the resolver sends to the operating system.

use std::time::Duration;

use super::request::{HostOs, InstallReference};
use crate::ports::CommandSpec;

/// Default program for the Go toolchain.
pub const DEFAULT_TOOLCHAIN_PROGRAM: &str = "go";

/// The toolchain used for automated installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Program name or path (`go`, `/usr/local/go/bin/go`).
    pub program: String,
}

impl Toolchain {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `go version`
    #[must_use]
    pub fn version_command(&self, timeout: Duration) -> CommandSpec {
        CommandSpec::new(&self.program, timeout).arg("version")
    }

    /// `go install <module>@<version>`
    #[must_use]
    pub fn install_command(&self, install_ref: &InstallReference, timeout: Duration) -> CommandSpec {
        CommandSpec::new(&self.program, timeout)
            .arg("install")
            .arg(install_ref.target())
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new(DEFAULT_TOOLCHAIN_PROGRAM)
    }
}

impl HostOs {
    /// `where <name>` on Windows, `which <name>` elsewhere.
    #[must_use]
    pub fn locate_command(self, executable: &str, timeout: Duration) -> CommandSpec {
        CommandSpec::new(self.locate_program(), timeout).arg(executable)
    }
}
