//! Core domain types and ports for resolving the `risor-lsp` executable.
//!
//! This crate is pure: it describes what a resolution request looks like,
//! what outcomes and failures exist, which commands are sent to the operating
//! system, and the traits adapters implement. Process spawning lives in
//! `risorls-runtime`.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    DEFAULT_EXECUTABLE_NAME, DEFAULT_INSTALL_MODULE, DEFAULT_INSTALL_VERSION,
    DEFAULT_TOOLCHAIN_PROGRAM, HostOs, InstallReference, OutcomeReport, OutcomeStatus,
    ResolutionError, ResolutionErrorKind, ResolutionOutcome, ResolutionRequest, ResolutionSource,
    ResolutionStage, ResolvedCommand, Toolchain,
};
pub use ports::{CommandError, CommandOutput, CommandRunner, CommandSpec, TraceSink};
pub use settings::{
    DEFAULT_INSTALL_TIMEOUT_SECS, DEFAULT_LOOKUP_TIMEOUT_SECS, DEFAULT_TOOLCHAIN_TIMEOUT_SECS,
    ResolverSettings, Settings, SettingsError, validate_settings,
};
