//! Key to row id multimap
//!
//! Ids are stored per key with multiplicity: adding the same `(key, id)`
//! pair twice needs two removals. Resolution collapses duplicates.

use std::collections::{HashMap, HashSet};

use super::row::RowId;
use super::signature::IndexKey;

#[derive(Debug, Clone, Default)]
pub struct KeyToRowMultimap {
    entries: HashMap<IndexKey, Vec<RowId>>,
    len: usize,
}

impl KeyToRowMultimap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `row_id` under `key`.
    pub fn add(&mut self, key: IndexKey, row_id: RowId) {
        self.entries.entry(key).or_default().push(row_id);
        self.len += 1;
    }

    /// Detaches one occurrence of `row_id` from `key`.
    ///
    /// Drops the key once it has no ids left. Returns whether anything was
    /// removed.
    pub fn remove(&mut self, key: &str, row_id: &RowId) -> bool {
        let Some(ids) = self.entries.get_mut(key) else {
            return false;
        };
        let Some(pos) = ids.iter().position(|id| id == row_id) else {
            return false;
        };

        ids.remove(pos);
        if ids.is_empty() {
            self.entries.remove(key);
        }
        self.len -= 1;
        true
    }

    /// Ids stored under one key, in insertion order
    pub fn ids_for(&self, key: &str) -> &[RowId] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Union of ids for the given keys, first occurrence wins.
    ///
    /// Absent keys contribute nothing.
    pub fn resolve<I, K>(&self, keys: I) -> Vec<RowId>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for key in keys {
            for id in self.ids_for(key.as_ref()) {
                if seen.insert(id) {
                    result.push(id.clone());
                }
            }
        }
        result
    }

    /// First id resolved for the given keys
    pub fn resolve_first<I, K>(&self, keys: I) -> Option<RowId>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .find_map(|key| self.ids_for(key.as_ref()).first().cloned())
    }

    /// Ids per key, one group per input key, duplicates collapsed within
    /// each group only.
    pub fn resolve_grouped<I, K>(&self, keys: I) -> Vec<(IndexKey, Vec<RowId>)>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .map(|key| {
                let key = key.as_ref();
                (key.to_string(), self.resolve([key]))
            })
            .collect()
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of stored `(key, id)` entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[i64]) -> Vec<RowId> {
        v.iter().map(|&i| RowId::Int(i)).collect()
    }

    #[test]
    fn test_add_and_lookup() {
        let mut map = KeyToRowMultimap::new();
        map.add("x".into(), RowId::Int(7));
        map.add("x".into(), RowId::Int(8));
        map.add("y".into(), RowId::Int(9));

        assert_eq!(map.ids_for("x"), ids(&[7, 8]).as_slice());
        assert!(map.ids_for("z").is_empty());
        assert_eq!(map.key_count(), 2);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_resolve_collapses_duplicates_in_first_seen_order() {
        let mut map = KeyToRowMultimap::new();
        map.add("b".into(), RowId::Int(2));
        map.add("a".into(), RowId::Int(1));
        map.add("a".into(), RowId::Int(2));

        assert_eq!(map.resolve(["b", "a", "a", "missing"]), ids(&[2, 1]));
        assert!(map.resolve(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_resolve_first() {
        let mut map = KeyToRowMultimap::new();
        map.add("a".into(), RowId::from("r1"));

        assert_eq!(map.resolve_first(["missing", "a"]), Some(RowId::from("r1")));
        assert_eq!(map.resolve_first(["missing"]), None);
    }

    #[test]
    fn test_remove_one_occurrence() {
        let mut map = KeyToRowMultimap::new();
        map.add("a".into(), RowId::Int(1));
        map.add("a".into(), RowId::Int(1));

        assert!(map.remove("a", &RowId::Int(1)));
        assert_eq!(map.ids_for("a"), ids(&[1]).as_slice());

        assert!(map.remove("a", &RowId::Int(1)));
        assert_eq!(map.key_count(), 0);
        assert!(map.is_empty());

        assert!(!map.remove("a", &RowId::Int(1)));
    }

    #[test]
    fn test_resolve_grouped_keeps_per_key_groups() {
        let mut map = KeyToRowMultimap::new();
        map.add("a".into(), RowId::Int(1));
        map.add("b".into(), RowId::Int(1));

        let grouped = map.resolve_grouped(["a", "b"]);
        assert_eq!(
            grouped,
            vec![("a".to_string(), ids(&[1])), ("b".to_string(), ids(&[1]))]
        );
    }
}
