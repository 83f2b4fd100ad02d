//! SRT Log Bridge
//!
//! Routes diagnostic events from the SRT transport library to a single
//! process-wide (or per-instance) sink: a log file opened by path, or a
//! handler registered by the caller together with an opaque context.

pub mod bridge;
pub mod event;
pub mod filter;
pub mod format;
pub mod forward;
pub mod severity;
pub mod sink;

pub use bridge::{global, BridgeError, LogBridge};
pub use event::{LogEvent, OwnedLogEvent};
pub use filter::LogFilter;
pub use format::{format_line, parse_line, FormatError};
pub use forward::TracingHandler;
pub use severity::{LogArea, ParseLevelError, Severity};
pub use sink::{CallbackSink, FileSink, LogHandler, SinkKind};
