//! Emitter-side level and functional-area filter
//!
//! The bridge delivers everything it is given. Subsystems that emit events
//! consult a [`LogFilter`] first, the same way the native library applies
//! its configured log level and enabled areas before producing a message.

use crate::severity::{LogArea, Severity};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    level: Severity,
    areas: BTreeSet<LogArea>,
}

impl LogFilter {
    /// Filter passing events at `level` or more severe, in the general area only
    pub fn new(level: Severity) -> Self {
        let mut areas = BTreeSet::new();
        areas.insert(LogArea::General);
        LogFilter { level, areas }
    }

    pub fn with_areas<I: IntoIterator<Item = LogArea>>(mut self, areas: I) -> Self {
        self.areas.extend(areas);
        self
    }

    /// Filter passing everything up to `DEBUG` in every area
    pub fn all() -> Self {
        LogFilter::new(Severity::DEBUG).with_areas(LogArea::ALL)
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn set_level(&mut self, level: Severity) {
        self.level = level;
    }

    pub fn enable_area(&mut self, area: LogArea) {
        self.areas.insert(area);
    }

    /// Disabling `General` has no effect
    pub fn disable_area(&mut self, area: LogArea) {
        if area != LogArea::General {
            self.areas.remove(&area);
        }
    }

    pub fn areas(&self) -> impl Iterator<Item = LogArea> + '_ {
        self.areas.iter().copied()
    }

    /// Whether an event of `severity` tagged `area` should be emitted
    ///
    /// Tags that are not SRT functional area names are never filtered by
    /// area.
    pub fn enabled(&self, severity: Severity, area: &str) -> bool {
        if !severity.at_least(self.level) {
            return false;
        }
        match area.parse::<LogArea>() {
            Ok(area) => self.areas.contains(&area),
            Err(_) => true,
        }
    }
}

impl Default for LogFilter {
    fn default() -> Self {
        LogFilter::new(Severity::ERR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_threshold() {
        let filter = LogFilter::new(Severity::WARNING);
        assert!(filter.enabled(Severity::ERR, "general"));
        assert!(filter.enabled(Severity::WARNING, "general"));
        assert!(!filter.enabled(Severity::INFO, "general"));
    }

    #[test]
    fn test_area_selection() {
        let filter = LogFilter::new(Severity::DEBUG).with_areas([LogArea::Control]);
        assert!(filter.enabled(Severity::DEBUG, "control"));
        assert!(!filter.enabled(Severity::DEBUG, "tsbpd"));
        assert!(filter.enabled(Severity::DEBUG, "general"));
        // Not an SRT area
        assert!(filter.enabled(Severity::DEBUG, "handshake"));
    }

    #[test]
    fn test_general_cannot_be_disabled() {
        let mut filter = LogFilter::all();
        filter.disable_area(LogArea::General);
        filter.disable_area(LogArea::Data);
        assert!(filter.enabled(Severity::ERR, "general"));
        assert!(!filter.enabled(Severity::ERR, "data"));
    }

    #[test]
    fn test_default_is_errors_only() {
        let filter = LogFilter::default();
        assert_eq!(filter.level(), Severity::ERR);
        assert_eq!(filter.areas().collect::<Vec<_>>(), vec![LogArea::General]);
    }
}
