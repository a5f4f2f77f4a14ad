//! The merge pass: conflict resolution and diff building.
//!
//! Given the batch of updates accumulated since the last pass, this module
//! mutates the row store and produces the minimal change-set for the
//! display layer. The pass is a pure function of the store and the batch,
//! so the same inputs always produce the same transaction.

use crate::{Row, RowStore, RowUpdate, Transaction};

/// Run one merge pass over `updates`, in arrival order.
///
/// For each update:
/// - a dirty row that is already stale absorbs the update silently, so
///   repeated remote traffic against an edited row produces no duplicate
///   notifications;
/// - a dirty row not yet stale keeps the user's field values and only
///   gains `stale = true`; the flagged row is reported in `update`;
/// - any other target has the update's fields laid over its current values
///   with both flags cleared, reported in `add` when the id is new and in
///   `update` when it already existed.
///
/// A row created and then updated within one batch appears once in `add`
/// and once in `update`, in arrival order. `remove` is never populated.
pub fn merge_batch(store: &mut RowStore, updates: Vec<RowUpdate>) -> Transaction {
    let mut transaction = Transaction::new();

    for update in updates {
        if let Some(row) = store.get_mut(&update.id) {
            if row.dirty {
                if row.stale {
                    continue;
                }
                // Withhold the update: keep the user's values, flag the
                // row so the UI can show it is outdated.
                row.stale = true;
                transaction.update.push(row.clone());
                continue;
            }
            row.accept_remote(&update.fields);
            transaction.update.push(row.clone());
        } else {
            let row = Row::from_update(update);
            store.insert(row.clone());
            transaction.add.push(row);
        }
    }

    transaction
}
