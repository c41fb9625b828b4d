//! Table index façade
//!
//! Owns one signature, one sorted key multiset and one key → row id
//! multimap, and keeps the latter two in lock-step: for every key, the
//! number of multiset entries equals the number of stored row ids.
//!
//! # API
//!
//! - `add_row(row, id)` / `remove_row(row, id)` - explicit maintenance
//! - `add_rows(rows)` - bulk build with one multiset merge
//! - `row_id_at`, `row_ids_between` - positional lookups
//! - `row_ids_for_keys` - exact match
//! - `row_ids_for_key_range` - inclusive bounds, paginated
//! - `row_ids_for_prefix` - prefix match, paginated
//!
//! Row id lists are de-duplicated, first occurrence first. The index is not
//! internally synchronized; writers must be serialized by the owner.

use std::collections::BTreeSet;

use crate::observability::{log_event_with_fields, Event, IndexMetrics, Logger};

use super::config::IndexConfig;
use super::errors::IndexResult;
use super::lookup::KeyToRowMultimap;
use super::ordered::{paginate, OrderType, OrderedKeyMultiset};
use super::row::{Row, RowId};
use super::signature::{IndexKey, RowSignature, SignatureType};

#[derive(Debug)]
pub struct Index {
    signature: RowSignature,
    sorted_keys: OrderedKeyMultiset,
    row_ids: KeyToRowMultimap,
    metrics: IndexMetrics,
}

impl Index {
    /// Creates an empty index.
    ///
    /// Fails with `TIDX_INVALID_CONFIGURATION` on an empty or invalid field
    /// list.
    pub fn new(
        field_names: Vec<String>,
        signature_type: SignatureType,
        case_insensitive: bool,
        order_type: OrderType,
    ) -> IndexResult<Self> {
        let signature = RowSignature::new(field_names, signature_type, case_insensitive)?;
        Ok(Self::with_signature(signature, order_type))
    }

    /// Creates an empty index from a deserialized config.
    pub fn from_config(config: &IndexConfig) -> IndexResult<Self> {
        let (signature, order_type) = config.validate()?;
        Ok(Self::with_signature(signature, order_type))
    }

    fn with_signature(signature: RowSignature, order_type: OrderType) -> Self {
        let fields = signature.field_names().join(",");
        let case_insensitive = signature.is_case_insensitive().to_string();
        log_event_with_fields(
            Event::IndexCreated,
            &[
                ("case_insensitive", case_insensitive.as_str()),
                ("fields", fields.as_str()),
                ("order_type", order_type.as_str()),
                ("signature_type", signature.signature_type().as_str()),
            ],
        );

        Self {
            signature,
            sorted_keys: OrderedKeyMultiset::new(order_type),
            row_ids: KeyToRowMultimap::new(),
            metrics: IndexMetrics::new(),
        }
    }

    /// Adds one row.
    ///
    /// Returns `false`, leaving the index untouched, when the row yields no
    /// keys.
    pub fn add_row<R: Row + ?Sized>(&mut self, row: &R, row_id: impl Into<RowId>) -> bool {
        let row_id = row_id.into();
        let keys = self.signature.keys_for_row(row);
        if keys.is_empty() {
            self.skip_row(&row_id);
            return false;
        }

        for key in &keys {
            self.row_ids.add(key.clone(), row_id.clone());
        }
        self.sorted_keys.add(keys);
        self.metrics.add_rows_indexed(1);
        true
    }

    /// Adds many rows, merging all of their keys into the sorted sequence in
    /// one pass. Returns the number of rows indexed.
    pub fn add_rows<I, R, Id>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = (R, Id)>,
        R: Row,
        Id: Into<RowId>,
    {
        let mut all_keys = Vec::new();
        let mut indexed = 0usize;
        let mut skipped = 0usize;

        for (row, row_id) in rows {
            let row_id = row_id.into();
            let keys = self.signature.keys_for_row(&row);
            if keys.is_empty() {
                self.skip_row(&row_id);
                skipped += 1;
                continue;
            }
            for key in &keys {
                self.row_ids.add(key.clone(), row_id.clone());
            }
            all_keys.extend(keys);
            indexed += 1;
        }

        self.sorted_keys.add(all_keys);
        self.metrics.add_rows_indexed(indexed as u64);

        let entries = self.sorted_keys.len().to_string();
        let indexed_str = indexed.to_string();
        let skipped_str = skipped.to_string();
        log_event_with_fields(
            Event::BulkLoadComplete,
            &[
                ("entries", entries.as_str()),
                ("rows_indexed", indexed_str.as_str()),
                ("rows_skipped", skipped_str.as_str()),
            ],
        );
        indexed
    }

    fn skip_row(&self, row_id: &RowId) {
        self.metrics.add_rows_skipped(1);
        if Logger::enabled(Event::RowSkipped.severity()) {
            let row_id = row_id.to_string();
            log_event_with_fields(Event::RowSkipped, &[("row_id", row_id.as_str())]);
        }
    }

    /// Removes one row.
    ///
    /// `row` must carry the same indexed values it had when added. Keys or
    /// ids that are not present are skipped. Returns whether any key was
    /// derived.
    pub fn remove_row<R: Row + ?Sized>(&mut self, row: &R, row_id: impl Into<RowId>) -> bool {
        let row_id = row_id.into();
        let keys = self.signature.keys_for_row(row);
        if keys.is_empty() {
            return false;
        }

        // only drop multiset entries whose id association existed, so a
        // mismatched id cannot break lock-step
        let mut removed = Vec::with_capacity(keys.len());
        for key in keys {
            if self.row_ids.remove(&key, &row_id) {
                removed.push(key);
            }
        }
        if !removed.is_empty() {
            self.sorted_keys.remove(&removed);
            self.metrics.increment_rows_removed();
        }
        true
    }

    /// Empties both the multiset and the multimap. The index stays usable.
    pub fn clear_buffers(&mut self) {
        self.row_ids.clear();
        self.sorted_keys.clear();
        self.metrics.increment_clears();
        let fields = self.signature.field_names().join(",");
        log_event_with_fields(Event::IndexCleared, &[("fields", fields.as_str())]);
    }

    /// First row id for the key at sorted position `offset`.
    ///
    /// Meant for unique indexes; uniqueness is not enforced. On a non-unique
    /// index use [`Index::row_ids_at`] to see every id for that key.
    pub fn row_id_at(&self, offset: usize) -> Option<RowId> {
        self.served();
        self.row_ids.resolve_first(self.sorted_keys.slice_at(offset, Some(1)))
    }

    /// Every row id for the key at sorted position `offset`.
    pub fn row_ids_at(&self, offset: usize) -> Vec<RowId> {
        self.served();
        self.row_ids.resolve(self.sorted_keys.slice_at(offset, Some(1)))
    }

    /// Unique row ids for the keys at positions `[start, end)`, clamped.
    pub fn row_ids_between(&self, start: usize, end: usize) -> Vec<RowId> {
        self.served();
        self.row_ids.resolve(self.sorted_keys.window(start..end))
    }

    /// Row ids grouped per position in `[start, end)`; ids are not collapsed
    /// across positions.
    pub fn row_ids_between_by_key(&self, start: usize, end: usize) -> Vec<(IndexKey, Vec<RowId>)> {
        self.served();
        self.row_ids.resolve_grouped(self.sorted_keys.window(start..end))
    }

    /// Unique row ids for the given keys, first seen first.
    ///
    /// Keys are folded like row keys on a case-insensitive index.
    pub fn row_ids_for_keys<I, K>(&self, keys: I) -> Vec<RowId>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.served();
        let signature = &self.signature;
        self.row_ids.resolve(
            keys.into_iter()
                .map(|k| signature.normalize(k.as_ref()).into_owned()),
        )
    }

    /// Unique row ids for one key
    pub fn row_ids_for_key(&self, key: &str) -> Vec<RowId> {
        self.row_ids_for_keys([key])
    }

    /// Unique row ids whose keys fall within `[start, end]`.
    ///
    /// `start` is the logically lower bound under either order type.
    /// `offset` and `limit` paginate the matching entries before ids are
    /// resolved.
    pub fn row_ids_for_key_range(
        &self,
        start: &str,
        end: &str,
        offset: usize,
        limit: Option<usize>,
    ) -> Vec<RowId> {
        self.served();
        let start = self.signature.normalize(start);
        let end = self.signature.normalize(end);
        let window = self.sorted_keys.range_window(&start, &end);
        self.row_ids
            .resolve(self.sorted_keys.window(paginate(window, offset, limit)))
    }

    /// Unique row ids whose keys start with `prefix`. An empty prefix
    /// matches every entry.
    pub fn row_ids_for_prefix(&self, prefix: &str, offset: usize, limit: Option<usize>) -> Vec<RowId> {
        self.served();
        let prefix = self.signature.normalize(prefix);
        let window = self.sorted_keys.prefix_window(&prefix, false);
        self.row_ids
            .resolve(self.sorted_keys.window(paginate(window, offset, limit)))
    }

    pub fn row_id_set_for_keys<I, K>(&self, keys: I) -> BTreeSet<RowId>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.row_ids_for_keys(keys).into_iter().collect()
    }

    pub fn row_id_set_for_key_range(
        &self,
        start: &str,
        end: &str,
        offset: usize,
        limit: Option<usize>,
    ) -> BTreeSet<RowId> {
        self.row_ids_for_key_range(start, end, offset, limit)
            .into_iter()
            .collect()
    }

    pub fn row_id_set_for_prefix(
        &self,
        prefix: &str,
        offset: usize,
        limit: Option<usize>,
    ) -> BTreeSet<RowId> {
        self.row_ids_for_prefix(prefix, offset, limit)
            .into_iter()
            .collect()
    }

    fn served(&self) {
        self.metrics.increment_queries();
    }

    /// Number of multiset entries
    pub fn len(&self) -> usize {
        self.sorted_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_keys.is_empty()
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.row_ids.key_count()
    }

    /// Keys in sorted order, with multiplicity
    pub fn sorted_keys(&self) -> &[IndexKey] {
        self.sorted_keys.as_slice()
    }

    /// Row ids stored under one already-folded key, with multiplicity
    pub fn stored_ids(&self, key: &str) -> &[RowId] {
        self.row_ids.ids_for(key)
    }

    pub fn signature(&self) -> &RowSignature {
        &self.signature
    }

    pub fn order_type(&self) -> OrderType {
        self.sorted_keys.order_type()
    }

    pub fn metrics(&self) -> &IndexMetrics {
        &self.metrics
    }
}
