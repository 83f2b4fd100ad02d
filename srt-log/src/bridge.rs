//! Log bridge
//!
//! Holds the single active sink and dispatches events to it. One mutex
//! guards both the sink selection and the write, so every `emit` sees
//! either the complete old sink or the complete new one.

use crate::event::LogEvent;
use crate::sink::{ActiveSink, CallbackSink, FileSink, LogHandler, SinkKind};
use parking_lot::{const_mutex, Mutex};
use std::cell::RefCell;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Bridge configuration errors
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("cannot open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("log bridge cannot be reconfigured from inside its own handler")]
    Reentrant,
}

impl BridgeError {
    /// Underlying IO error, if any
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            BridgeError::Open { source, .. } => Some(source),
            BridgeError::Reentrant => None,
        }
    }
}

thread_local! {
    // Addresses of every bridge whose sink is being driven on this thread,
    // innermost last
    static DISPATCHING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

struct DispatchGuard;

impl DispatchGuard {
    fn enter(bridge: &LogBridge) -> Self {
        DISPATCHING.with(|d| d.borrow_mut().push(bridge.addr()));
        DispatchGuard
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCHING.with(|d| d.borrow_mut().pop());
    }
}

static GLOBAL: LogBridge = LogBridge::new();

/// Process-wide bridge, used by the C ABI entry points
pub fn global() -> &'static LogBridge {
    &GLOBAL
}

/// Routes log events to exactly one active sink
pub struct LogBridge {
    sink: Mutex<ActiveSink>,
}

impl LogBridge {
    /// Create a bridge with no sink; events are dropped until one is configured
    pub const fn new() -> Self {
        LogBridge {
            sink: const_mutex(ActiveSink::None),
        }
    }

    /// Open `path` (create or truncate) and make it the active sink
    ///
    /// On failure the previously active sink stays in place.
    pub fn configure_file_sink<P: AsRef<Path>>(&self, path: P) -> Result<(), BridgeError> {
        let path = path.as_ref();
        if self.is_dispatching() {
            return Err(BridgeError::Reentrant);
        }

        // Open outside the lock so a slow filesystem never stalls emitters
        let sink = FileSink::open(path).map_err(|source| BridgeError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        self.replace(ActiveSink::File(sink));
        tracing::debug!("Log bridge writing to {}", path.display());
        Ok(())
    }

    /// Install `handler`, called with `context` for every event
    pub fn configure_callback_sink<C, F>(&self, context: C, handler: F)
    where
        C: Send + Sync + 'static,
        F: Fn(&C, &LogEvent<'_>) + Send + Sync + 'static,
    {
        self.set_handler(CallbackSink::new(context, handler));
    }

    /// Install an arbitrary [`LogHandler`] as the active sink
    pub fn set_handler<H: LogHandler>(&self, handler: H) {
        if self.is_dispatching() {
            tracing::warn!("Ignoring log handler registration from inside a log handler");
            return;
        }
        self.replace(ActiveSink::Callback(Box::new(handler)));
        tracing::debug!("Log bridge forwarding to callback");
    }

    /// Drop the active sink; subsequent events are discarded
    pub fn disable(&self) {
        if self.is_dispatching() {
            tracing::warn!("Ignoring log bridge disable from inside a log handler");
            return;
        }
        self.replace(ActiveSink::None);
    }

    /// Deliver `event` to the active sink
    ///
    /// Never fails. Events are dropped when no sink is configured, when the
    /// file sink cannot be written, or when emitted from inside a handler
    /// this bridge is currently driving on the same thread, directly or
    /// through other bridges. A panicking handler loses the event and the
    /// panic stops here.
    pub fn emit(&self, event: &LogEvent<'_>) {
        if self.is_dispatching() {
            return;
        }

        let mut sink = self.sink.lock();
        let _guard = DispatchGuard::enter(self);
        if catch_unwind(AssertUnwindSafe(|| sink.deliver(event))).is_err() {
            tracing::warn!("Log handler panicked, event dropped");
        }
    }

    pub fn active_sink(&self) -> SinkKind {
        // Only callback sinks run caller code, and the lock is held meanwhile
        if self.is_dispatching() {
            return SinkKind::Callback;
        }
        self.sink.lock().kind()
    }

    /// Events the active file sink failed to write; 0 for other sinks
    pub fn write_failures(&self) -> u64 {
        if self.is_dispatching() {
            return 0;
        }
        match &*self.sink.lock() {
            ActiveSink::File(sink) => sink.write_failures(),
            _ => 0,
        }
    }

    fn replace(&self, next: ActiveSink) {
        // The previous sink is released after the lock is dropped
        let previous = std::mem::replace(&mut *self.sink.lock(), next);
        drop(previous);
    }

    fn addr(&self) -> usize {
        self as *const LogBridge as usize
    }

    fn is_dispatching(&self) -> bool {
        let addr = self.addr();
        DISPATCHING.with(|d| d.borrow().contains(&addr))
    }
}

impl Default for LogBridge {
    fn default() -> Self {
        LogBridge::new()
    }
}
