//! The row repository: keyed, insertion-ordered, in-memory.

use crate::{Row, RowId};
use std::collections::HashMap;

/// In-memory store of current row state.
///
/// Rows are keyed by id and the last write for an id wins; there is no
/// validation beyond uniqueness. Iteration and snapshots preserve
/// first-insertion order - the order the display layer first saw each row -
/// so an upsert never moves a row.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: HashMap<RowId, Row>,
    order: Vec<RowId>,
}

impl RowStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a row by id.
    pub fn get(&self, id: &str) -> Option<&Row> {
        self.rows.get(id)
    }

    /// Get a mutable row by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Row> {
        self.rows.get_mut(id)
    }

    /// Insert or replace a row, keyed by its id.
    pub fn insert(&mut self, row: Row) {
        if !self.rows.contains_key(&row.id) {
            self.order.push(row.id.clone());
        }
        self.rows.insert(row.id.clone(), row);
    }

    /// Check whether a row exists.
    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    /// Number of rows stored.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.order.iter().filter_map(|id| self.rows.get(id))
    }

    /// Clone out all rows in first-insertion order, for the initial load.
    pub fn snapshot(&self) -> Vec<Row> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, a: i64) -> Row {
        let mut row = Row::new(id);
        row.set_field("a", json!(a));
        row
    }

    #[test]
    fn insert_and_get() {
        let mut store = RowStore::new();
        store.insert(row("row-1", 1));

        assert!(store.contains("row-1"));
        assert_eq!(store.get("row-1").unwrap().field("a"), Some(&json!(1)));
        assert!(store.get("row-2").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn last_write_wins() {
        let mut store = RowStore::new();
        store.insert(row("row-1", 1));
        store.insert(row("row-1", 2));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("row-1").unwrap().field("a"), Some(&json!(2)));
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut store = RowStore::new();
        store.insert(row("c", 1));
        store.insert(row("a", 2));
        store.insert(row("b", 3));

        let ids: Vec<_> = store.snapshot().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn upsert_keeps_original_position() {
        let mut store = RowStore::new();
        store.insert(row("a", 1));
        store.insert(row("b", 2));
        store.insert(row("a", 9));

        let ids: Vec<_> = store.snapshot().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn get_mut_mutates_in_place() {
        let mut store = RowStore::new();
        store.insert(row("row-1", 1));

        store.get_mut("row-1").unwrap().dirty = true;
        assert!(store.get("row-1").unwrap().dirty);
    }

    #[test]
    fn empty_store() {
        let store = RowStore::new();
        assert!(store.is_empty());
        assert!(store.snapshot().is_empty());
    }
}
