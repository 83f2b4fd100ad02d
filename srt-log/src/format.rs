//! Text line format used by the file sink
//!
//! Each event becomes one line:
//!
//! ```text
//! [<severity>] <source_file>:<source_line> (<area>) <message>
//! ```
//!
//! e.g. `[3] net.c:42 (handshake) timeout`. Fields are written verbatim, so
//! a message containing a newline spans more than one line of the file.

use crate::event::{LogEvent, OwnedLogEvent};
use crate::severity::Severity;
use std::fmt::Write;
use thiserror::Error;

/// Errors from parsing a formatted line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("missing severity prefix")]
    MissingSeverity,

    #[error("invalid severity: {0:?}")]
    InvalidSeverity(String),

    #[error("missing source location")]
    MissingLocation,

    #[error("invalid source line: {0:?}")]
    InvalidLine(String),

    #[error("missing area")]
    MissingArea,
}

/// Append the line for `event` (including the trailing newline) to `out`
pub fn write_line(out: &mut String, event: &LogEvent<'_>) {
    // Writing into a String cannot fail
    let _ = writeln!(
        out,
        "[{}] {}:{} ({}) {}",
        event.severity, event.source_file, event.source_line, event.area, event.message
    );
}

/// Format `event` as a line, including the trailing newline
pub fn format_line(event: &LogEvent<'_>) -> String {
    let mut out = String::with_capacity(
        24 + event.source_file.len() + event.area.len() + event.message.len(),
    );
    write_line(&mut out, event);
    out
}

/// Parse a line produced by [`format_line`]
///
/// The trailing newline is optional. The source file must not contain
/// `" ("`; anything is allowed in the message.
pub fn parse_line(line: &str) -> Result<OwnedLogEvent, FormatError> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    let rest = line.strip_prefix('[').ok_or(FormatError::MissingSeverity)?;
    let (severity, rest) = rest.split_once("] ").ok_or(FormatError::MissingSeverity)?;
    let severity = severity
        .parse::<i32>()
        .map(Severity::new)
        .map_err(|_| FormatError::InvalidSeverity(severity.to_string()))?;

    let (location, rest) = rest.split_once(" (").ok_or(FormatError::MissingLocation)?;
    let (source_file, source_line) = location.rsplit_once(':').ok_or(FormatError::MissingLocation)?;
    let source_line = source_line
        .parse::<u32>()
        .map_err(|_| FormatError::InvalidLine(source_line.to_string()))?;

    // The message may be empty, in which case there is no trailing space
    let (area, message) = match rest.split_once(") ") {
        Some(parts) => parts,
        None => (rest.strip_suffix(')').ok_or(FormatError::MissingArea)?, ""),
    };

    Ok(OwnedLogEvent {
        severity,
        source_file: source_file.to_string(),
        source_line,
        area: area.to_string(),
        message: message.to_string(),
    })
}
