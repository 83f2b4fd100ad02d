//! C ABI for the SRT log bridge
//!
//! Exposes the process-wide [`srt_log::global`] bridge to code on the other
//! side of a language boundary (cgo, P/Invoke, JNI). The native transport
//! library reports events through [`srt_log_emit`]; the host application
//! picks a sink with [`srt_log_set_file`] or [`srt_log_set_handler`].
//!
//! Safety rules for every entry point:
//!
//! 1. String arguments are null or point to NUL-terminated strings valid
//!    for the duration of the call
//! 2. Null strings are read as empty
//! 3. Panics never unwind across the ABI

use srt_log::{LogEvent, LogHandler, Severity};
use std::borrow::Cow;
use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;

/// Return code for success
pub const SRT_LOG_SUCCESS: c_int = 0;
/// Return code for failure, same value as the SRT library's `SRT_ERROR`
pub const SRT_LOG_ERROR: c_int = -1;

/// Log handler signature
///
/// Arguments: opaque context, severity, source file, source line, area,
/// message. The strings are only valid for the duration of the call.
pub type SrtLogHandlerFn = extern "C" fn(
    opaque: *mut c_void,
    level: c_int,
    file: *const c_char,
    line: c_int,
    area: *const c_char,
    message: *const c_char,
);

/// Caller-owned context pointer
///
/// Never dereferenced here; it is only handed back to the handler.
#[derive(Debug, Clone, Copy)]
struct OpaqueHandle(*mut c_void);

// The registering side owns the pointee and guarantees it may be used from
// whichever thread the transport library logs on.
unsafe impl Send for OpaqueHandle {}
unsafe impl Sync for OpaqueHandle {}

/// Trampoline from bridge events to a foreign handler
struct ForeignHandler {
    opaque: OpaqueHandle,
    handler: SrtLogHandlerFn,
}

impl LogHandler for ForeignHandler {
    fn handle(&self, event: &LogEvent<'_>) {
        let file = to_c_string(event.source_file);
        let area = to_c_string(event.area);
        let message = to_c_string(event.message);
        let line = c_int::try_from(event.source_line).unwrap_or(c_int::MAX);

        (self.handler)(
            self.opaque.0,
            event.severity.as_raw(),
            file.as_ptr(),
            line,
            area.as_ptr(),
            message.as_ptr(),
        );
    }
}

// Events from Rust emitters may contain NUL, which a C string cannot carry
fn to_c_string(text: &str) -> CString {
    CString::new(text).unwrap_or_else(|_| {
        let escaped = text.replace('\0', "\\0");
        CString::new(escaped).unwrap_or_default()
    })
}

/// Read a C string argument, treating null as empty
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string.
unsafe fn text<'a>(ptr: *const c_char) -> Cow<'a, str> {
    if ptr.is_null() {
        Cow::Borrowed("")
    } else {
        CStr::from_ptr(ptr).to_string_lossy()
    }
}

#[cfg(unix)]
fn path_from_c(path: &CStr) -> Option<PathBuf> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    Some(PathBuf::from(OsStr::from_bytes(path.to_bytes())))
}

#[cfg(not(unix))]
fn path_from_c(path: &CStr) -> Option<PathBuf> {
    path.to_str().ok().map(PathBuf::from)
}

/// Redirect the log stream to the file at `path`, created or truncated
///
/// Returns [`SRT_LOG_SUCCESS`], or [`SRT_LOG_ERROR`] if the file cannot be opened,
/// in which case the previous sink stays active.
///
/// # Safety
///
/// `path` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn srt_log_set_file(path: *const c_char) -> c_int {
    if path.is_null() {
        return SRT_LOG_ERROR;
    }
    let Some(path) = path_from_c(CStr::from_ptr(path)) else {
        return SRT_LOG_ERROR;
    };

    let result = catch_unwind(AssertUnwindSafe(|| srt_log::global().configure_file_sink(&path)));
    match result {
        Ok(Ok(())) => SRT_LOG_SUCCESS,
        Ok(Err(e)) => {
            tracing::warn!("srt_log_set_file failed: {}", e);
            SRT_LOG_ERROR
        }
        Err(_) => SRT_LOG_ERROR,
    }
}

/// Forward every event to `handler`, passing `opaque` through unchanged
///
/// A null handler disables logging. `opaque` and the handler must stay
/// valid until another sink is configured; once this call or a later
/// reconfiguration returns, the previous handler is no longer invoked.
///
/// # Safety
///
/// `handler` must be safe to call from any thread with `opaque`.
#[no_mangle]
pub unsafe extern "C" fn srt_log_set_handler(
    opaque: *mut c_void,
    handler: Option<SrtLogHandlerFn>,
) {
    let _ = catch_unwind(AssertUnwindSafe(|| match handler {
        Some(handler) => srt_log::global().set_handler(ForeignHandler {
            opaque: OpaqueHandle(opaque),
            handler,
        }),
        None => srt_log::global().disable(),
    }));
}

/// Drop the active sink
#[no_mangle]
pub extern "C" fn srt_log_disable() {
    let _ = catch_unwind(|| srt_log::global().disable());
}

/// Report one event to the active sink
///
/// Negative line numbers are reported as 0 (unknown).
///
/// # Safety
///
/// Each string argument must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn srt_log_emit(
    level: c_int,
    file: *const c_char,
    line: c_int,
    area: *const c_char,
    message: *const c_char,
) {
    let file = text(file);
    let area = text(area);
    let message = text(message);

    let event = LogEvent {
        severity: Severity::new(level),
        source_file: &file,
        source_line: u32::try_from(line).unwrap_or(0),
        area: &area,
        message: &message,
    };

    let _ = catch_unwind(AssertUnwindSafe(|| srt_log::global().emit(&event)));
}
