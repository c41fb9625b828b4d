//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Per-index counters
//! - Typed lifecycle events
//!
//! Observability is read-only: nothing here changes index contents or query
//! results.

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{IndexMetrics, MetricsSnapshot};

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
