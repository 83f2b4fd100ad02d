//! Log sinks
//!
//! A sink is where the bridge delivers events: an open file, or a handler
//! registered by the caller together with an opaque context value.

use crate::event::LogEvent;
use crate::format;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Receiver of log events for a callback sink
///
/// Invoked synchronously on the emitting thread while the bridge lock is
/// held. Attempts to reconfigure or emit into a bridge that is driving the
/// handler are refused or dropped.
pub trait LogHandler: Send + Sync + 'static {
    fn handle(&self, event: &LogEvent<'_>);
}

impl<F> LogHandler for F
where
    F: Fn(&LogEvent<'_>) + Send + Sync + 'static,
{
    fn handle(&self, event: &LogEvent<'_>) {
        self(event)
    }
}

/// Handler paired with the caller's context value
///
/// The context is handed back by reference on every call and is never
/// inspected or cloned.
pub struct CallbackSink<C, F> {
    context: C,
    handler: F,
}

impl<C, F> CallbackSink<C, F>
where
    C: Send + Sync + 'static,
    F: Fn(&C, &LogEvent<'_>) + Send + Sync + 'static,
{
    pub fn new(context: C, handler: F) -> Self {
        CallbackSink { context, handler }
    }

    pub fn context(&self) -> &C {
        &self.context
    }
}

impl<C, F> LogHandler for CallbackSink<C, F>
where
    C: Send + Sync + 'static,
    F: Fn(&C, &LogEvent<'_>) + Send + Sync + 'static,
{
    fn handle(&self, event: &LogEvent<'_>) {
        (self.handler)(&self.context, event)
    }
}

/// File-backed sink
///
/// Each event is formatted into a single buffer and written with one
/// `write_all`, so lines from concurrent emitters (serialised by the bridge
/// lock) never interleave.
pub struct FileSink {
    path: PathBuf,
    file: File,
    line: String,
    write_failures: u64,
}

impl FileSink {
    /// Create or truncate the file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(FileSink {
            path: path.to_path_buf(),
            file,
            line: String::new(),
            write_failures: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of events lost to write errors
    pub fn write_failures(&self) -> u64 {
        self.write_failures
    }

    /// Append `event` to the file, absorbing any write error
    pub fn write_event(&mut self, event: &LogEvent<'_>) {
        self.line.clear();
        format::write_line(&mut self.line, event);

        if let Err(e) = self.file.write_all(self.line.as_bytes()) {
            self.write_failures += 1;
            if self.write_failures == 1 {
                tracing::warn!(
                    "Log file {} is no longer writable, dropping events: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

impl fmt::Debug for FileSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("write_failures", &self.write_failures)
            .finish()
    }
}

/// The sink currently selected by a bridge
pub(crate) enum ActiveSink {
    None,
    File(FileSink),
    Callback(Box<dyn LogHandler>),
}

impl ActiveSink {
    pub(crate) fn kind(&self) -> SinkKind {
        match self {
            ActiveSink::None => SinkKind::None,
            ActiveSink::File(sink) => SinkKind::File(sink.path().to_path_buf()),
            ActiveSink::Callback(_) => SinkKind::Callback,
        }
    }

    pub(crate) fn deliver(&mut self, event: &LogEvent<'_>) {
        match self {
            ActiveSink::None => {}
            ActiveSink::File(sink) => sink.write_event(event),
            ActiveSink::Callback(handler) => handler.handle(event),
        }
    }
}

/// Description of the active sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    /// Events are dropped
    None,
    /// Events are appended to the file at this path
    File(PathBuf),
    /// Events are passed to a registered handler
    Callback,
}
