//! Error reporting sink.
//!
//! Invocation wrappers report unexpected failures through an injected
//! [`TelemetrySink`]. The sink is fire-and-forget and must tolerate
//! concurrent calls from independent invocations.

use crate::types::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;
use uuid::Uuid;

// =============================================================================
// Event
// =============================================================================

/// A reported error event, configured by the reporter before it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// Error classification label, see [`Error::kind`].
    pub error_kind: String,
    /// True when the error escaped the adapter instead of being absorbed.
    pub unhandled: bool,
    /// section → key → value, e.g. `app.tool = "acme_search"`.
    pub metadata: BTreeMap<String, Map<String, Value>>,
}

impl TelemetryEvent {
    pub fn new(error: &Error) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            error_kind: error.kind().to_string(),
            unhandled: false,
            metadata: BTreeMap::new(),
        }
    }

    pub fn add_metadata(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        self.metadata
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    pub fn metadata_value(&self, section: &str, key: &str) -> Option<&Value> {
        self.metadata.get(section).and_then(|s| s.get(key))
    }
}

/// Callback that attaches context to an event before it is recorded.
pub type ConfigureEvent<'a> = &'a (dyn Fn(&mut TelemetryEvent) + Send + Sync);

/// Error reporting capability.
pub trait TelemetrySink: Send + Sync {
    /// Record `error`. `configure` runs once on the fresh event.
    fn notify(&self, error: &Error, configure: ConfigureEvent<'_>);
}

// =============================================================================
// Sinks
// =============================================================================

/// Sink that writes reported errors to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn notify(&self, error: &Error, configure: ConfigureEvent<'_>) {
        let mut event = TelemetryEvent::new(error);
        configure(&mut event);

        let metadata = serde_json::to_string(&event.metadata).unwrap_or_default();
        tracing::error!(
            event_id = %event.id,
            unhandled = event.unhandled,
            kind = %event.error_kind,
            metadata = %metadata,
            "error_reported: {}",
            error
        );
    }
}

/// A recorded report: the error text and its configured event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub message: String,
    pub event: TelemetryEvent,
}

/// Append-only in-memory sink. Retains every report for inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<Report>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all reports so far, oldest first.
    pub fn reports(&self) -> Vec<Report> {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TelemetrySink for MemorySink {
    fn notify(&self, error: &Error, configure: ConfigureEvent<'_>) {
        let mut event = TelemetryEvent::new(error);
        configure(&mut event);
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Report {
                message: error.to_string(),
                event,
            });
    }
}
