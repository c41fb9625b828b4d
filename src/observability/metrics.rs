//! Index counters
//!
//! - Counters only, monotonic
//! - Relaxed atomics, so read-only queries on `&Index` can count

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters owned by one index.
#[derive(Debug, Default)]
pub struct IndexMetrics {
    rows_indexed: AtomicU64,
    rows_skipped: AtomicU64,
    rows_removed: AtomicU64,
    queries_served: AtomicU64,
    clears: AtomicU64,
}

impl IndexMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rows_indexed(&self, n: u64) {
        self.rows_indexed.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_rows_skipped(&self, n: u64) {
        self.rows_skipped.fetch_add(n, Ordering::Relaxed);
    }

    pub fn increment_rows_removed(&self) {
        self.rows_removed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries(&self) {
        self.queries_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_clears(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rows_indexed: self.rows_indexed.load(Ordering::Relaxed),
            rows_skipped: self.rows_skipped.load(Ordering::Relaxed),
            rows_removed: self.rows_removed.load(Ordering::Relaxed),
            queries_served: self.queries_served.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub rows_indexed: u64,
    pub rows_skipped: u64,
    pub rows_removed: u64,
    pub queries_served: u64,
    pub clears: u64,
}
