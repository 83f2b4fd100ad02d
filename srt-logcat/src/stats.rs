//! Replay statistics display and formatting

use crate::replay::ReplayStats;
use std::time::Duration;

/// Format bytes in human-readable form
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format duration in human-readable form
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis >= 1000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", millis)
    }
}

/// One-line summary of a replay run
pub fn format_summary(stats: &ReplayStats, elapsed: Duration) -> String {
    format!(
        "{} lines ({}) in {}: {} emitted, {} filtered, {} malformed",
        stats.lines,
        format_bytes(stats.bytes),
        format_duration(elapsed),
        stats.emitted,
        stats.filtered,
        stats.malformed
    )
}

/// Display replay statistics on stderr
pub fn display_replay_stats(stats: &ReplayStats, elapsed: Duration) {
    eprintln!("srt-logcat: {}", format_summary(stats, elapsed));
}
