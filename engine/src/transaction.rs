//! Incremental change-sets emitted by the engine.

use crate::Row;
use serde::{Deserialize, Serialize};

/// The minimal delta a display layer must apply: rows newly introduced,
/// rows whose content or flags changed, rows deleted.
///
/// Rows appear in arrival order within each list. `remove` is part of the
/// wire shape but never populated - the engine has no deletion path yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Rows the display layer has not seen before
    pub add: Vec<Row>,
    /// Rows whose field values or flags changed
    pub update: Vec<Row>,
    /// Rows deleted (never populated)
    pub remove: Vec<Row>,
}

impl Transaction {
    /// Create an empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transaction carrying a single changed row, as produced by the
    /// local edit path.
    pub fn single_update(row: Row) -> Self {
        Self {
            add: Vec::new(),
            update: vec![row],
            remove: Vec::new(),
        }
    }

    /// True when there is nothing to apply downstream.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.update.is_empty() && self.remove.is_empty()
    }

    /// Total number of row entries across all three lists.
    pub fn len(&self) -> usize {
        self.add.len() + self.update.len() + self.remove.len()
    }
}
