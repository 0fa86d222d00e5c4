//! Domain types for language-server resolution.
//!
//! These types represent the core business entities and are independent
//! of any process-spawning or host-editor concerns.

mod error;
mod outcome;
mod request;
mod toolchain;

pub use error::{ResolutionError, ResolutionErrorKind, ResolutionStage};
pub use outcome::{
    OutcomeReport, OutcomeStatus, ResolutionOutcome, ResolutionSource, ResolvedCommand,
};
pub use request::{
    DEFAULT_EXECUTABLE_NAME, DEFAULT_INSTALL_MODULE, DEFAULT_INSTALL_VERSION, HostOs,
    InstallReference, ResolutionRequest,
};
pub use toolchain::{DEFAULT_TOOLCHAIN_PROGRAM, Toolchain};
