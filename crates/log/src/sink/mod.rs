//! Output sinks
//!
//! A sink receives fully rendered, newline-terminated lines. Sinks are bound
//! to one facility each and kept in an ordered collection; a facility's line
//! is rendered once and handed to every sink bound to it, in registration
//! order.

mod file;
mod syslog;

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

pub use file::FileSink;
pub use syslog::SyslogSink;

use crate::config::ConsoleTarget;
use crate::facility::Facility;
use crate::level::Severity;

/// Receiver of rendered lines
///
/// Called with the context's emit lock held, so implementations see lines one
/// at a time. Errors are swallowed by the emitter.
pub trait Sink: Send + Sync + 'static {
    /// Write one rendered line (trailing newline included)
    fn write_line(&self, level: Severity, line: &str) -> io::Result<()>;

    /// Push buffered output to its destination
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// A sink bound to a facility
#[derive(Clone)]
pub struct Destination {
    /// Facility whose lines the sink receives
    pub facility: Facility,
    /// The sink itself
    pub sink: Arc<dyn Sink>,
}

impl Destination {
    /// Bind `sink` to `facility`
    pub fn new(facility: Facility, sink: Arc<dyn Sink>) -> Self {
        Self { facility, sink }
    }
}

impl std::fmt::Debug for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Destination")
            .field("facility", &self.facility)
            .finish_non_exhaustive()
    }
}

/// Writes lines to the process's stderr or stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    target: ConsoleTarget,
}

impl ConsoleSink {
    /// Console sink writing to `target`
    pub const fn new(target: ConsoleTarget) -> Self {
        Self { target }
    }

    /// Stream this sink writes to
    pub const fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Sink for ConsoleSink {
    fn write_line(&self, _level: Severity, line: &str) -> io::Result<()> {
        match self.target {
            ConsoleTarget::Stderr => io::stderr().lock().write_all(line.as_bytes()),
            ConsoleTarget::Stdout => io::stdout().lock().write_all(line.as_bytes()),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self.target {
            ConsoleTarget::Stderr => io::stderr().flush(),
            ConsoleTarget::Stdout => io::stdout().flush(),
        }
    }
}

/// A line captured by [`CaptureSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    /// Severity of the message
    pub level: Severity,
    /// Rendered line, trailing newline included
    pub line: String,
}

/// In-memory sink for tests and callbacks that inspect output
///
/// ```rust
/// use std::sync::Arc;
/// use vlog::{CaptureSink, Severity, Vlog};
///
/// let capture = Arc::new(CaptureSink::new());
/// let log = Vlog::builder()
///     .modules(["app"])
///     .console_sink(capture.clone())
///     .build()
///     .unwrap();
///
/// let app = log.module("app").unwrap();
/// log.log(app, Severity::Warn, "main.rs", 1, format_args!("hello"));
/// assert!(capture.contents().ends_with("WARN  app   main.rs:1: hello\n"));
/// ```
#[derive(Debug, Default)]
pub struct CaptureSink {
    lines: Mutex<Vec<CapturedLine>>,
}

impl CaptureSink {
    /// Empty capture
    pub fn new() -> Self {
        Self::default()
    }

    /// Every captured line in arrival order
    pub fn lines(&self) -> Vec<CapturedLine> {
        self.lines.lock().clone()
    }

    /// All captured text concatenated
    pub fn contents(&self) -> String {
        self.lines.lock().iter().map(|captured| captured.line.as_str()).collect()
    }

    /// Number of captured lines
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Drop everything captured so far
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Sink for CaptureSink {
    fn write_line(&self, level: Severity, line: &str) -> io::Result<()> {
        self.lines.lock().push(CapturedLine {
            level,
            line: line.to_owned(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_sink_keeps_order() {
        let sink = CaptureSink::new();
        sink.write_line(Severity::Info, "a\n").unwrap();
        sink.write_line(Severity::Err, "b\n").unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.contents(), "a\nb\n");
        assert_eq!(sink.lines()[1].level, Severity::Err);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_console_sink_target() {
        assert_eq!(ConsoleSink::default().target(), ConsoleTarget::Stderr);
        assert_eq!(
            ConsoleSink::new(ConsoleTarget::Stdout).target(),
            ConsoleTarget::Stdout
        );
    }
}
