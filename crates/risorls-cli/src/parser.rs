//! Main CLI parser and top-level argument handling.
//!
//! Global options double as the highest-precedence settings layer.

use std::path::PathBuf;

use clap::Parser;
use risorls_core::Settings;

use crate::commands::Commands;

/// Environment variable holding the custom language-server path.
pub const SERVER_PATH_ENV: &str = "RISORLS_SERVER_PATH";

/// Resolve, install and run the Risor language server.
#[derive(Parser, Debug)]
#[command(name = "risorls")]
#[command(about = "Resolve, install and run the Risor language server")]
#[command(version)]
pub struct Cli {
    /// JSON settings file layered over the built-in defaults
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Custom language-server path; skips discovery when non-blank
    #[arg(long, global = true, env = SERVER_PATH_ENV, value_name = "PATH")]
    pub server_path: Option<String>,

    /// Go toolchain program used for installation
    #[arg(long = "go", global = true, value_name = "PROGRAM")]
    pub toolchain_program: Option<String>,

    /// Version tag passed to `go install`
    #[arg(long, global = true, value_name = "TAG")]
    pub install_version: Option<String>,

    /// Timeout for `go install`, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub install_timeout: Option<u64>,

    /// Report the absolute path found on PATH instead of the bare name
    #[arg(long, global = true)]
    pub absolute_path: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Settings given on the command line (or through the environment).
    ///
    /// Unset flags stay `None` so they do not mask lower layers.
    pub fn settings_overrides(&self) -> Settings {
        Settings {
            server_path: self.server_path.clone(),
            toolchain_program: self.toolchain_program.clone(),
            install_version: self.install_version.clone(),
            install_timeout_secs: self.install_timeout,
            prefer_absolute_path: self.absolute_path.then_some(true),
            ..Settings::default()
        }
    }
}
