//! Sorted key sequence with multiplicity
//!
//! Keys are kept in a `Vec` sorted under the configured order. Every row that
//! produced a key contributes one entry, so duplicates are retained. All
//! window lookups locate their bounds by binary search.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use super::errors::IndexError;
use super::signature::IndexKey;

/// Direction in which keys are sorted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderType {
    #[default]
    Ascending,
    Descending,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Ascending => "ascending",
            OrderType::Descending => "descending",
        }
    }

    /// Compares two keys in sequence order.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            OrderType::Ascending => a.cmp(b),
            OrderType::Descending => b.cmp(a),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(OrderType::Ascending),
            "descending" => Ok(OrderType::Descending),
            other => Err(IndexError::invalid_configuration(format!(
                "Unknown order type: '{}'. Must be 'ascending' or 'descending'.",
                other
            ))),
        }
    }
}

/// Narrows a window by skipping `offset` entries and keeping at most `limit`.
///
/// Never extends past the window; `None` means no limit.
pub fn paginate(window: Range<usize>, offset: usize, limit: Option<usize>) -> Range<usize> {
    let start = window.start.saturating_add(offset).min(window.end);
    let end = match limit {
        Some(limit) => start.saturating_add(limit).min(window.end),
        None => window.end,
    };
    start..end
}

/// Keys in sorted order, duplicates kept.
#[derive(Debug, Clone, Default)]
pub struct OrderedKeyMultiset {
    items: Vec<IndexKey>,
    order: OrderType,
}

impl OrderedKeyMultiset {
    pub fn new(order: OrderType) -> Self {
        Self {
            items: Vec::new(),
            order,
        }
    }

    pub fn order_type(&self) -> OrderType {
        self.order
    }

    /// Inserts keys, keeping the sequence sorted.
    ///
    /// A single key is placed after its equals by binary search. A batch is
    /// sorted on its own and merged in one pass.
    pub fn add(&mut self, keys: Vec<IndexKey>) {
        match keys.len() {
            0 => {}
            1 => {
                for key in keys {
                    let pos = self.upper_bound(&key);
                    self.items.insert(pos, key);
                }
            }
            _ => self.merge(keys),
        }
    }

    fn merge(&mut self, mut keys: Vec<IndexKey>) {
        let order = self.order;
        keys.sort_by(|a, b| order.compare(a, b));

        let existing = std::mem::take(&mut self.items);
        let mut merged = Vec::with_capacity(existing.len() + keys.len());
        let mut left = existing.into_iter().peekable();
        let mut right = keys.into_iter().peekable();

        loop {
            let take_left = match (left.peek(), right.peek()) {
                (Some(l), Some(r)) => order.compare(l, r) != Ordering::Greater,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if take_left { left.next() } else { right.next() };
            merged.extend(next);
        }

        self.items = merged;
    }

    /// Removes one occurrence of each key. Absent keys are skipped.
    pub fn remove(&mut self, keys: &[IndexKey]) {
        for key in keys {
            let pos = self.lower_bound(key);
            if self.items.get(pos).is_some_and(|k| k == key) {
                self.items.remove(pos);
            }
        }
    }

    /// Position window of entries between two bounds, both inclusive.
    ///
    /// `start` is the logically lower value regardless of order type.
    /// Returns an empty window when `start > end`.
    pub fn range_window(&self, start: &str, end: &str) -> Range<usize> {
        let (first, last) = match self.order {
            OrderType::Ascending => (start, end),
            OrderType::Descending => (end, start),
        };
        let lo = self.lower_bound(first);
        let hi = self.upper_bound(last);
        if lo >= hi {
            lo..lo
        } else {
            lo..hi
        }
    }

    /// Position window of entries starting with `prefix`.
    ///
    /// With `exclude_exact` the entries equal to `prefix` are left out. An
    /// empty prefix covers the whole sequence.
    pub fn prefix_window(&self, prefix: &str, exclude_exact: bool) -> Range<usize> {
        match self.order {
            OrderType::Ascending => {
                let mut lo = self.lower_bound(prefix);
                let hi = lo + self.items[lo..].partition_point(|k| k.starts_with(prefix));
                if exclude_exact {
                    lo += self.items[lo..hi].partition_point(|k| k == prefix);
                }
                lo..hi
            }
            OrderType::Descending => {
                // keys >= prefix come first; the non-prefixed ones among
                // them sort above every prefixed key
                let mut hi = self.items.partition_point(|k| k.as_str() >= prefix);
                let lo = self.items[..hi].partition_point(|k| !k.starts_with(prefix));
                if exclude_exact {
                    hi = lo + self.items[lo..hi].partition_point(|k| k != prefix);
                }
                lo..hi
            }
        }
    }

    /// Raw keys in a position window, clamped to the sequence.
    pub fn slice_at(&self, offset: usize, count: Option<usize>) -> &[IndexKey] {
        let window = paginate(0..self.items.len(), offset, count);
        &self.items[window]
    }

    /// Raw keys for an already computed window, clamped to the sequence.
    pub fn window(&self, window: Range<usize>) -> &[IndexKey] {
        let end = window.end.min(self.items.len());
        let start = window.start.min(end);
        &self.items[start..end]
    }

    /// Number of entries equal to `key`
    pub fn count(&self, key: &str) -> usize {
        self.upper_bound(key) - self.lower_bound(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[IndexKey] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// First position whose entry does not precede `key`
    fn lower_bound(&self, key: &str) -> usize {
        self.items
            .partition_point(|k| self.order.compare(k, key) == Ordering::Less)
    }

    /// First position whose entry follows `key`
    fn upper_bound(&self, key: &str) -> usize {
        self.items
            .partition_point(|k| self.order.compare(k, key) != Ordering::Greater)
    }
}
