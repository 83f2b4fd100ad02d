//! Log severity levels and functional areas
//!
//! SRT uses syslog-style severities where a lower number is more severe,
//! and groups its log output into functional areas ("FA").

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a severity or area name cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseLevelError {
    #[error("unknown log level: {0:?}")]
    UnknownLevel(String),

    #[error("unknown log functional area: {0:?}")]
    UnknownArea(String),
}

/// Log severity
///
/// Any integer is a valid severity: values outside the named range are
/// carried through unchanged, since the bridge never reinterprets what the
/// emitting subsystem sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "SeverityRepr", into = "i32")]
pub struct Severity(i32);

impl Severity {
    pub const EMERG: Severity = Severity(0);
    pub const ALERT: Severity = Severity(1);
    pub const CRIT: Severity = Severity(2);
    pub const ERR: Severity = Severity(3);
    pub const WARNING: Severity = Severity(4);
    pub const NOTICE: Severity = Severity(5);
    pub const INFO: Severity = Severity(6);
    pub const DEBUG: Severity = Severity(7);

    /// SRT's name for `CRIT`
    pub const FATAL: Severity = Severity::CRIT;

    #[inline]
    pub const fn new(raw: i32) -> Self {
        Severity(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> i32 {
        self.0
    }

    /// Canonical name, if this is one of the named levels
    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0 => "emerg",
            1 => "alert",
            2 => "crit",
            3 => "err",
            4 => "warning",
            5 => "notice",
            6 => "info",
            7 => "debug",
            _ => return None,
        };
        Some(name)
    }

    /// Whether an event at `self` is at least as severe as `threshold`
    #[inline]
    pub fn at_least(self, threshold: Severity) -> bool {
        self.0 <= threshold.0
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::ERR
    }
}

impl From<i32> for Severity {
    fn from(raw: i32) -> Self {
        Severity(raw)
    }
}

impl From<Severity> for i32 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Severity {
    type Err = ParseLevelError;

    /// Accepts an integer or one of the level names (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(raw) = s.parse::<i32>() {
            return Ok(Severity(raw));
        }

        let level = match s.to_ascii_lowercase().as_str() {
            "emerg" => Severity::EMERG,
            "alert" => Severity::ALERT,
            "crit" | "fatal" => Severity::CRIT,
            "err" | "error" => Severity::ERR,
            "warning" | "warn" => Severity::WARNING,
            "notice" | "note" => Severity::NOTICE,
            "info" => Severity::INFO,
            "debug" => Severity::DEBUG,
            _ => return Err(ParseLevelError::UnknownLevel(s.to_string())),
        };
        Ok(level)
    }
}

// Config files may spell a level either as a number or a name.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityRepr {
    Raw(i32),
    Name(String),
}

impl TryFrom<SeverityRepr> for Severity {
    type Error = ParseLevelError;

    fn try_from(repr: SeverityRepr) -> Result<Self, Self::Error> {
        match repr {
            SeverityRepr::Raw(raw) => Ok(Severity(raw)),
            SeverityRepr::Name(name) => name.parse(),
        }
    }
}

/// SRT logging functional area
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogArea {
    /// Always enabled
    General = 0,
    /// Bandwidth and statistics
    Bstats = 1,
    /// Control packets
    Control = 2,
    /// Data packets
    Data = 3,
    /// Timestamp-based packet delivery
    Tsbpd = 4,
    /// Retransmission
    Rexmit = 5,
}

impl LogArea {
    pub const ALL: [LogArea; 6] = [
        LogArea::General,
        LogArea::Bstats,
        LogArea::Control,
        LogArea::Data,
        LogArea::Tsbpd,
        LogArea::Rexmit,
    ];

    /// Numeric id used by the native library
    #[inline]
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            LogArea::General => "general",
            LogArea::Bstats => "bstats",
            LogArea::Control => "control",
            LogArea::Data => "data",
            LogArea::Tsbpd => "tsbpd",
            LogArea::Rexmit => "rexmit",
        }
    }

    pub fn from_id(id: i32) -> Option<LogArea> {
        LogArea::ALL.iter().copied().find(|area| area.id() == id)
    }
}

impl fmt::Display for LogArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogArea {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        LogArea::ALL
            .iter()
            .copied()
            .find(|area| area.name() == lower)
            .ok_or_else(|| ParseLevelError::UnknownArea(s.to_string()))
    }
}
