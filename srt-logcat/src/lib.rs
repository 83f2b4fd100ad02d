//! SRT log tooling
//!
//! Configuration of the SRT log bridge from the environment or a TOML file,
//! and replay of log files written by its file sink.

pub mod config;
pub mod replay;
pub mod stats;

pub use config::{ConfigError, LogConfig};
pub use replay::{replay, same_file, ReplayStats};
pub use stats::{display_replay_stats, format_bytes, format_summary};
