//! Log event record

use crate::severity::Severity;

/// A single diagnostic event
///
/// Borrowed from the emitter for the duration of one `emit` call. Sinks
/// receive the fields exactly as the emitter supplied them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEvent<'a> {
    pub severity: Severity,
    /// Source file of the log statement, may be empty
    pub source_file: &'a str,
    /// Source line, 0 if unknown
    pub source_line: u32,
    /// Tag of the emitting module
    pub area: &'a str,
    pub message: &'a str,
}

impl<'a> LogEvent<'a> {
    pub fn new(severity: Severity, area: &'a str, message: &'a str) -> Self {
        LogEvent {
            severity,
            source_file: "",
            source_line: 0,
            area,
            message,
        }
    }

    /// Attach a source location
    pub fn at(mut self, source_file: &'a str, source_line: u32) -> Self {
        self.source_file = source_file;
        self.source_line = source_line;
        self
    }

    pub fn to_owned_event(&self) -> OwnedLogEvent {
        OwnedLogEvent {
            severity: self.severity,
            source_file: self.source_file.to_string(),
            source_line: self.source_line,
            area: self.area.to_string(),
            message: self.message.to_string(),
        }
    }
}

/// Owned copy of a [`LogEvent`], for events that outlive the emit call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedLogEvent {
    pub severity: Severity,
    pub source_file: String,
    pub source_line: u32,
    pub area: String,
    pub message: String,
}

impl OwnedLogEvent {
    pub fn as_event(&self) -> LogEvent<'_> {
        LogEvent {
            severity: self.severity,
            source_file: &self.source_file,
            source_line: self.source_line,
            area: &self.area,
            message: &self.message,
        }
    }
}
