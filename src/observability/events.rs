//! Observable events
//!
//! Events are explicit and typed; each carries its default severity.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// CLI configuration loaded
    ConfigLoaded,
    /// Rows file parsed
    RowsLoaded,

    // Index lifecycle
    /// Index constructed
    IndexCreated,
    /// Index buffers cleared
    IndexCleared,
    /// Bulk load finished
    BulkLoadComplete,

    // Per-row
    /// Row yielded no keys and was not indexed
    RowSkipped,

    // Queries
    /// Query answered
    QueryServed,
    /// Query request could not be parsed or answered
    RequestRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::RowsLoaded => "ROWS_LOADED",
            Event::IndexCreated => "INDEX_CREATED",
            Event::IndexCleared => "INDEX_CLEARED",
            Event::BulkLoadComplete => "BULK_LOAD_COMPLETE",
            Event::RowSkipped => "ROW_SKIPPED",
            Event::QueryServed => "QUERY_SERVED",
            Event::RequestRejected => "REQUEST_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RowSkipped | Event::QueryServed => Severity::Trace,
            Event::RequestRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
