//! Port for structured search logging.
//!
//! Defines the [`SearchLogger`] trait for recording completed searches to a
//! machine-readable log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures each fresh
//! envelope (JSONL).

use serde_json::Value;

/// A structured search event for logging.
pub struct SearchEvent {
    /// Event type identifier (e.g., "search_completed", "single_lookup").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl SearchEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging search events to a structured log.
///
/// `log` is synchronous and non-fallible; logging failures are ignored so
/// they never affect a search result.
pub trait SearchLogger: Send + Sync {
    fn log(&self, event: SearchEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoSearchLogger;

impl SearchLogger for NoSearchLogger {
    fn log(&self, _event: SearchEvent) {}
}
