//! Forwarding of bridge events into `tracing`
//!
//! Used when the host application wants SRT's diagnostics interleaved with
//! its own log output instead of in a separate file.

use crate::bridge::LogBridge;
use crate::event::LogEvent;
use crate::sink::LogHandler;

/// Target under which forwarded events are recorded
pub const TARGET: &str = "srt";

/// Handler that re-emits every event as a `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHandler;

impl LogHandler for TracingHandler {
    fn handle(&self, event: &LogEvent<'_>) {
        forward(event)
    }
}

/// Install [`TracingHandler`] as the active sink of `bridge`
pub fn install(bridge: &LogBridge) {
    bridge.set_handler(TracingHandler);
}

/// Record `event` through `tracing`
///
/// Severities map as 0..=3 error, 4 warn, 5..=6 info, 7 debug, anything
/// larger trace. Negative values are treated as error.
pub fn forward(event: &LogEvent<'_>) {
    let severity = event.severity.as_raw();
    let file = event.source_file;
    let line = event.source_line;
    let area = event.area;
    let message = event.message;

    match severity {
        i32::MIN..=3 => tracing::error!(target: TARGET, severity, file, line, area, "{}", message),
        4 => tracing::warn!(target: TARGET, severity, file, line, area, "{}", message),
        5 | 6 => tracing::info!(target: TARGET, severity, file, line, area, "{}", message),
        7 => tracing::debug!(target: TARGET, severity, file, line, area, "{}", message),
        _ => tracing::trace!(target: TARGET, severity, file, line, area, "{}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::Severity;
    use crate::sink::SinkKind;
    use parking_lot::Mutex;
    use std::collections::BTreeMap;
    use std::fmt;
    use std::sync::Arc;
    use tracing::field::{Field, Visit};
    use tracing::Level;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::{Layer, Registry};

    #[derive(Debug)]
    struct Recorded {
        level: Level,
        target: String,
        fields: BTreeMap<String, String>,
    }

    #[derive(Default)]
    struct Fields(BTreeMap<String, String>);

    impl Visit for Fields {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_string(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_string(), format!("{:?}", value));
        }
    }

    struct Capture(Arc<Mutex<Vec<Recorded>>>);

    impl<S: tracing::Subscriber> Layer<S> for Capture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields::default();
            event.record(&mut fields);
            self.0.lock().push(Recorded {
                level: *event.metadata().level(),
                target: event.metadata().target().to_string(),
                fields: fields.0,
            });
        }
    }

    fn forwarded(severities: &[i32]) -> Vec<Recorded> {
        let bridge = LogBridge::new();
        install(&bridge);
        assert_eq!(bridge.active_sink(), SinkKind::Callback);

        let records = Arc::new(Mutex::new(Vec::new()));
        let subscriber = Registry::default().with(Capture(records.clone()));
        tracing::subscriber::with_default(subscriber, || {
            for &raw in severities {
                bridge.emit(&LogEvent::new(Severity::new(raw), "handshake", "timeout").at("net.c", 42));
            }
        });

        let mut records = records.lock();
        records.retain(|r| r.target == TARGET);
        std::mem::take(&mut *records)
    }

    #[test]
    fn test_severity_to_level() {
        let records = forwarded(&[-1, 0, 3, 4, 5, 6, 7, 9]);
        let levels: Vec<Level> = records.iter().map(|r| r.level).collect();
        assert_eq!(
            levels,
            vec![
                Level::ERROR,
                Level::ERROR,
                Level::ERROR,
                Level::WARN,
                Level::INFO,
                Level::INFO,
                Level::DEBUG,
                Level::TRACE,
            ]
        );
    }

    #[test]
    fn test_fields_are_recorded() {
        let records = forwarded(&[3]);
        assert_eq!(records.len(), 1);

        let fields = &records[0].fields;
        assert_eq!(fields["severity"], "3");
        assert_eq!(fields["file"], "net.c");
        assert_eq!(fields["line"], "42");
        assert_eq!(fields["area"], "handshake");
        assert_eq!(fields["message"], "timeout");
    }
}
