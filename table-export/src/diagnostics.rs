//! Error reporting channel for failures that end an export without crashing

use std::io::{self, Write};

use colored::*;

/// Receives diagnostic messages meant for the person running the export
pub trait DiagnosticSink {
    fn report_error(&mut self, message: &str);
}

/// Prints each message once to a writer, stderr by default
///
/// The logger writes to stderr as well, so messages go here and not through
/// `log::error!`.
#[derive(Debug)]
pub struct StderrSink<W: Write = io::Stderr> {
    out: W,
    reported: usize,
}

impl StderrSink {
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }
}

impl<W: Write> StderrSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out, reported: 0 }
    }

    /// Number of messages reported so far
    pub fn reported(&self) -> usize {
        self.reported
    }
}

impl<W: Write> DiagnosticSink for StderrSink<W> {
    fn report_error(&mut self, message: &str) {
        self.reported += 1;
        // Nowhere left to report a failing stderr
        let _ = writeln!(self.out, "{} {}", "ERROR".red().bold(), message);
    }
}

/// Keeps every message, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub messages: Vec<String>,
}

#[cfg(test)]
impl DiagnosticSink for CollectingSink {
    fn report_error(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_counts_reports() {
        let mut sink = StderrSink::with_writer(Vec::new());
        sink.report_error("first");
        sink.report_error("second");
        assert_eq!(sink.reported(), 2);
    }

    #[test]
    fn test_each_message_is_written_once() {
        let message = "Failed to export parcels.geojson\n\nCaused by:\n    cannot open file";
        let mut sink = StderrSink::with_writer(Vec::new());

        sink.report_error(message);

        let written = String::from_utf8(sink.out).unwrap();
        assert_eq!(written.matches(message).count(), 1);
        assert_eq!(written.matches("Caused by:").count(), 1);
        assert!(written.ends_with("cannot open file\n"));
    }
}
