//! Trace sink port for language-server output.
//!
//! This port abstracts the destination for trace lines produced by a running
//! language server (its stderr, lifecycle notices), so the editor host can
//! route them to whatever output channel it renders.

/// Port for appending trace lines to a host-owned sink.
///
/// Implementations should be thread-safe and non-blocking where possible.
pub trait TraceSink: Send + Sync {
    /// Append one line (without trailing newline).
    fn write(&self, line: &str);
}
