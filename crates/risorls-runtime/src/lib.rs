//! Process runtime for `risor-lsp`.
//!
//! Provides the tokio-backed [`CommandRunner`](risorls_core::CommandRunner),
//! the [`Resolver`] that drives lookup, toolchain check, installation and
//! verification, and the [`LanguageServerSession`] that owns a running server.

#![deny(unsafe_code)]

mod command;
mod process_group;
mod resolver;
pub mod session;
mod trace;

pub use command::TokioCommandRunner;
pub use resolver::Resolver;
pub use session::{LanguageServerSession, SHUTDOWN_GRACE, ServerLaunch, SessionError};
pub use trace::{CollectingTraceSink, NoopTraceSink, TracingTraceSink};
