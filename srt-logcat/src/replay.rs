//! Replay of log files written by the file sink

use srt_log::{parse_line, LogBridge, LogFilter};
use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

/// Counters for one replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Lines read
    pub lines: u64,
    /// Bytes read
    pub bytes: u64,
    /// Events passed to the bridge
    pub emitted: u64,
    /// Events rejected by the filter
    pub filtered: u64,
    /// Lines that did not parse as an event
    pub malformed: u64,
}

/// Whether `a` and `b` name the same existing file
///
/// Used to refuse writing the replay output over its own input, since the
/// file sink truncates on open.
pub fn same_file<P: AsRef<Path>, Q: AsRef<Path>>(a: P, b: Q) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Read events from `reader` and emit those passing `filter` to `bridge`
///
/// Lines that do not parse (including continuation lines of multi-line
/// messages) are counted and skipped. Invalid UTF-8 is replaced.
pub fn replay<R: BufRead>(
    mut reader: R,
    filter: &LogFilter,
    bridge: &LogBridge,
) -> io::Result<ReplayStats> {
    let mut stats = ReplayStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break;
        }
        stats.lines += 1;
        stats.bytes += n as u64;

        let line = String::from_utf8_lossy(&buf);
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok(event) => {
                if filter.enabled(event.severity, &event.area) {
                    bridge.emit(&event.as_event());
                    stats.emitted += 1;
                } else {
                    stats.filtered += 1;
                }
            }
            Err(e) => {
                stats.malformed += 1;
                tracing::debug!("Skipping line {}: {}", stats.lines, e);
            }
        }
    }

    if stats.malformed > 0 {
        tracing::warn!("Skipped {} malformed lines", stats.malformed);
    }
    Ok(stats)
}
