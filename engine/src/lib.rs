//! # Trellis Engine
//!
//! The merge core for live data grids: reconciles a continuous stream of
//! remote row updates with concurrent, in-progress local edits, and hands
//! batched, conflict-aware change-sets to a display layer.
//!
//! ## Design Principles
//!
//! - **No transport, no UI**: remote payloads are pushed in, transactions
//!   are pulled out; the engine never talks to a network or a widget
//! - **Deterministic merges**: a batch pass is a pure function of the row
//!   store and the pending queue - same inputs, same transaction
//! - **Edits win locally**: a row the user is editing is never overwritten
//!   by a remote update; it is flagged stale instead, exactly once
//! - **Lossy delivery**: the consumer sees the latest transaction, not a
//!   backlog; production never blocks on consumption
//!
//! ## Core Concepts
//!
//! ### Rows
//!
//! A [`Row`] is an id, an open-ended map of domain fields, and two control
//! flags: `dirty` (uncommitted local edit) and `stale` (a remote update
//! was withheld while the row was dirty). A row is never stale without
//! being dirty.
//!
//! ### Transactions
//!
//! A [`Transaction`] is the minimal delta for the display layer: rows to
//! `add`, rows to `update`, rows to `remove` (the engine never populates
//! `remove` - there is no deletion path yet).
//!
//! ### Batching
//!
//! Remote updates queue up and merge in one pass after a quiescence window
//! ([`DEFAULT_QUIESCENCE_WINDOW`], 300 ms) with no new pass starting while
//! one runs. Local edits skip the queue entirely.
//!
//! ### The feed
//!
//! [`Updates`] is a single-consumer, infinite sequence of transactions
//! backed by a single-slot [`mailbox`]: if the consumer is not waiting
//! when a transaction lands, only the latest one survives.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use trellis_engine::{RowUpdate, SyncEngine};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (engine, mut updates) = SyncEngine::new();
//!
//! // Remote updates coalesce into one transaction per quiescence window.
//! engine.enqueue(RowUpdate::new("row-1").with_field("qty", json!(3)));
//! engine.enqueue(RowUpdate::new("row-2").with_field("qty", json!(5)));
//!
//! let transaction = updates.next().await.unwrap();
//! assert_eq!(transaction.add.len(), 2);
//!
//! // Local edits take effect immediately and mark the row dirty.
//! engine.handle_user_edit("row-1", "qty", json!(4)).unwrap();
//! let transaction = updates.next().await.unwrap();
//! assert!(transaction.update[0].dirty);
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod mailbox;
pub mod merge;
pub mod row;
pub mod schedule;
pub mod store;
pub mod transaction;

// Re-export main types at crate root
pub use engine::{SyncEngine, Updates, DEFAULT_QUIESCENCE_WINDOW};
pub use error::{Error, Result};
pub use merge::merge_batch;
pub use row::{Row, RowUpdate};
pub use schedule::BatchState;
pub use store::RowStore;
pub use transaction::Transaction;

/// Type aliases for clarity
pub type RowId = String;
pub type FieldName = String;
