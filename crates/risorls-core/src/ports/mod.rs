//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `tokio::process` types in any signature
//! - Runners report what happened, the resolver decides what it means

pub mod command_runner;
pub mod trace_sink;

pub use command_runner::{CommandError, CommandOutput, CommandRunner, CommandSpec};
pub use trace_sink::TraceSink;
