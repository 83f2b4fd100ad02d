//! Log configuration
//!
//! Read from the `SRT_*` environment variables or from a TOML file, then
//! applied to a [`LogBridge`] with [`LogConfig::install`].

use serde::{Deserialize, Serialize};
use srt_log::{BridgeError, LogArea, LogBridge, LogFilter, Severity};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_VERBOSE: &str = "SRT_VERBOSE";
pub const ENV_LOGLEVEL: &str = "SRT_LOGLEVEL";
pub const ENV_LOGFA: &str = "SRT_LOGFA";
pub const ENV_LOGFILE: &str = "SRT_LOGFILE";
pub const ENV_LOGINTERNAL: &str = "SRT_LOGINTERNAL";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Verbose output from the host application itself
    pub verbose: bool,
    /// Most verbose severity the emitting subsystem should report
    pub level: Severity,
    /// Functional areas enabled in addition to `general`
    pub areas: Vec<LogArea>,
    /// Log file to redirect the stream to
    pub file: Option<PathBuf>,
    /// Forward events into the host's `tracing` output instead of a file
    pub internal: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            verbose: false,
            level: Severity::ERR,
            areas: Vec::new(),
            file: None,
            internal: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        LogConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value
    ///
    /// Unset, empty or unparseable variables keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let mut config = LogConfig::default();

        if let Some(verbose) = var(ENV_VERBOSE).and_then(|v| parse_bool(&v)) {
            config.verbose = verbose;
        }

        if let Some(level) = var(ENV_LOGLEVEL).and_then(|v| v.parse().ok()) {
            config.level = level;
        }

        if let Some(areas) = var(ENV_LOGFA) {
            config.areas = parse_areas(&areas);
        }

        config.file = var(ENV_LOGFILE).map(PathBuf::from);

        if let Some(internal) = var(ENV_LOGINTERNAL).and_then(|v| parse_bool(&v)) {
            config.internal = internal;
        }

        config
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: LogConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Filter the emitting subsystem should apply
    pub fn filter(&self) -> LogFilter {
        LogFilter::new(self.level).with_areas(self.areas.iter().copied())
    }

    /// Point `bridge` at the configured sink
    ///
    /// `internal` takes precedence over `file`. With neither set the bridge
    /// is left as it is. Returns the filter to apply before emitting.
    pub fn install(&self, bridge: &LogBridge) -> Result<LogFilter, ConfigError> {
        if self.internal {
            srt_log::forward::install(bridge);
            tracing::debug!("SRT log forwarded to tracing");
        } else if let Some(file) = &self.file {
            bridge.configure_file_sink(file)?;
            tracing::debug!("SRT log redirected to {}", file.display());
        }
        Ok(self.filter())
    }
}

/// Parse a boolean the way the original `SRT_*` variables were read:
/// `1 t T TRUE true True` and `0 f F FALSE false False`
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse a functional-area list: `all`, or comma-separated area names
///
/// `general` is always enabled and therefore never listed. Unknown names
/// are skipped.
pub fn parse_areas(value: &str) -> Vec<LogArea> {
    let value = value.trim().to_ascii_lowercase();
    let mut areas = Vec::new();

    if value == "all" {
        areas.extend(LogArea::ALL.iter().copied().filter(|a| *a != LogArea::General));
        return areas;
    }

    for name in value.split(',') {
        match name.parse::<LogArea>() {
            Ok(LogArea::General) => {}
            Ok(area) => {
                if !areas.contains(&area) {
                    areas.push(area);
                }
            }
            Err(e) => tracing::debug!("Ignoring {}: {}", ENV_LOGFA, e),
        }
    }
    areas
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Log sink error: {0}")]
    Bridge(#[from] BridgeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use srt_log::SinkKind;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_env_table() {
        let cases = [
            (
                [
                    (ENV_VERBOSE, "true"),
                    (ENV_LOGLEVEL, "7"),
                    (ENV_LOGFA, "all"),
                    (ENV_LOGFILE, ""),
                    (ENV_LOGINTERNAL, "false"),
                ],
                LogConfig {
                    verbose: true,
                    level: Severity::DEBUG,
                    areas: vec![
                        LogArea::Bstats,
                        LogArea::Control,
                        LogArea::Data,
                        LogArea::Tsbpd,
                        LogArea::Rexmit,
                    ],
                    file: None,
                    internal: false,
                },
            ),
            (
                [
                    (ENV_VERBOSE, "false"),
                    (ENV_LOGLEVEL, "fatal"),
                    (ENV_LOGFA, "control,tsbpd,rexmit"),
                    (ENV_LOGFILE, "/path/srt.log"),
                    (ENV_LOGINTERNAL, "true"),
                ],
                LogConfig {
                    verbose: false,
                    level: Severity::FATAL,
                    areas: vec![LogArea::Control, LogArea::Tsbpd, LogArea::Rexmit],
                    file: Some(PathBuf::from("/path/srt.log")),
                    internal: true,
                },
            ),
        ];

        for (vars, want) in cases {
            assert_eq!(LogConfig::from_lookup(lookup(&vars)), want);
        }
    }

    #[test]
    fn test_env_defaults() {
        let config = LogConfig::from_lookup(lookup(&[
            (ENV_VERBOSE, "yes"),
            (ENV_LOGLEVEL, "chatty"),
        ]));
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_parse_areas() {
        assert_eq!(parse_areas("General,DATA,data,bogus"), vec![LogArea::Data]);
        assert!(parse_areas("").is_empty());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = LogConfig {
            level: Severity::INFO,
            areas: vec![LogArea::Control],
            file: Some(PathBuf::from("/tmp/srt.log")),
            ..LogConfig::default()
        };
        let toml = toml::to_string(&config).unwrap();
        let parsed: LogConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_level_by_name_in_toml() {
        let parsed: LogConfig = toml::from_str("level = \"warning\"\nareas = [\"tsbpd\"]\n").unwrap();
        assert_eq!(parsed.level, Severity::WARNING);
        assert_eq!(parsed.areas, vec![LogArea::Tsbpd]);
        assert!(!parsed.internal);
    }

    #[test]
    fn test_install_internal_wins() {
        let bridge = LogBridge::new();
        let config = LogConfig {
            internal: true,
            file: Some(PathBuf::from("/nonexistent/dir/srt.log")),
            ..LogConfig::default()
        };
        let filter = config.install(&bridge).unwrap();
        assert_eq!(bridge.active_sink(), SinkKind::Callback);
        assert_eq!(filter.level(), Severity::ERR);
    }

    #[test]
    fn test_install_bad_file() {
        let bridge = LogBridge::new();
        let config = LogConfig {
            file: Some(std::env::temp_dir().join("srt-logcat-missing").join("x.log")),
            ..LogConfig::default()
        };
        assert!(matches!(config.install(&bridge), Err(ConfigError::Bridge(_))));
        assert_eq!(bridge.active_sink(), SinkKind::None);
    }
}
