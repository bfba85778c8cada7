//! Telemetry capability
//!
//! Components report what they do through the [`Telemetry`] trait instead of
//! logging directly. Production code uses [`TracingTelemetry`], which forwards
//! to `tracing`; tests use [`RecordingTelemetry`] and assert on the events.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Key/value pairs attached to a telemetry event
pub type Fields<'a> = &'a [(&'a str, String)];

/// Severity of a telemetry event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TelemetryLevel {
    /// Diagnostic detail
    Debug,
    /// Normal progress
    Info,
    /// Recoverable anomaly
    Warn,
    /// Failure
    Error,
}

/// Structured event sink
pub trait Telemetry: Send + Sync {
    /// Record a debug event
    fn debug(&self, event: &str, fields: Fields<'_>);

    /// Record an info event
    fn info(&self, event: &str, fields: Fields<'_>);

    /// Record a warning event
    fn warn(&self, event: &str, fields: Fields<'_>);

    /// Record an error event
    fn error(&self, event: &str, fields: Fields<'_>);
}

/// The sink used when none is injected
pub fn default_telemetry() -> Arc<dyn Telemetry> {
    Arc::new(TracingTelemetry)
}

// =============================================================================
// Tracing Sink
// =============================================================================

struct FieldList<'a>(Fields<'a>);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Telemetry sink that forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn debug(&self, event: &str, fields: Fields<'_>) {
        tracing::debug!(target: "orbita", "{} {}", event, FieldList(fields));
    }

    fn info(&self, event: &str, fields: Fields<'_>) {
        tracing::info!(target: "orbita", "{} {}", event, FieldList(fields));
    }

    fn warn(&self, event: &str, fields: Fields<'_>) {
        tracing::warn!(target: "orbita", "{} {}", event, FieldList(fields));
    }

    fn error(&self, event: &str, fields: Fields<'_>) {
        tracing::error!(target: "orbita", "{} {}", event, FieldList(fields));
    }
}

/// Install a global `tracing` subscriber
///
/// `RUST_LOG` wins over `default_filter` when it is set. Fails if a
/// subscriber is already installed.
pub fn init_tracing(
    default_filter: &str,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).try_init()
}

// =============================================================================
// Recording Sink
// =============================================================================

/// A captured telemetry event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryEvent {
    /// Severity
    pub level: TelemetryLevel,
    /// Event name (e.g., "page_fetched")
    pub event: String,
    /// Attached fields in emission order
    pub fields: Vec<(String, String)>,
}

impl TelemetryEvent {
    /// Look up a field value by key
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Telemetry sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetry {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().clone()
    }

    /// Recorded events with the given name
    pub fn events_named(&self, event: &str) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.event == event)
            .cloned()
            .collect()
    }

    /// Recorded events at the given level
    pub fn events_at(&self, level: TelemetryLevel) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn record(&self, level: TelemetryLevel, event: &str, fields: Fields<'_>) {
        self.events.lock().push(TelemetryEvent {
            level,
            event: event.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
    }
}

impl Telemetry for RecordingTelemetry {
    fn debug(&self, event: &str, fields: Fields<'_>) {
        self.record(TelemetryLevel::Debug, event, fields);
    }

    fn info(&self, event: &str, fields: Fields<'_>) {
        self.record(TelemetryLevel::Info, event, fields);
    }

    fn warn(&self, event: &str, fields: Fields<'_>) {
        self.record(TelemetryLevel::Warn, event, fields);
    }

    fn error(&self, event: &str, fields: Fields<'_>) {
        self.record(TelemetryLevel::Error, event, fields);
    }
}
