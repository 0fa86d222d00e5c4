//! Trace sink implementations.

use std::sync::Mutex;

use risorls_core::ports::TraceSink;
use tracing::info;

/// A no-op sink that discards all lines.
///
/// Useful for CLI usage where structured log capture is not needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTraceSink;

impl TraceSink for NoopTraceSink {
    fn write(&self, _line: &str) {}
}

/// Forwards every line to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTraceSink;

impl TraceSink for TracingTraceSink {
    fn write(&self, line: &str) {
        info!(target: "risorls_runtime::trace", "{line}");
    }
}

/// Keeps every line in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingTraceSink {
    lines: Mutex<Vec<String>>,
}

impl CollectingTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl TraceSink for CollectingTraceSink {
    fn write(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_preserves_order() {
        let sink = CollectingTraceSink::new();
        sink.write("starting");
        sink.write("ready");
        assert_eq!(sink.lines(), vec!["starting", "ready"]);
    }

    #[test]
    fn test_sinks_are_object_safe() {
        let sinks: Vec<Box<dyn TraceSink>> = vec![
            Box::new(NoopTraceSink),
            Box::new(TracingTraceSink),
            Box::new(CollectingTraceSink::new()),
        ];
        for sink in &sinks {
            sink.write("line");
        }
    }
}
