//! The engine: update intake, debounced merge passes, local edit handling,
//! and the transaction feed.

use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use serde_json::Value;
use tracing::{debug, trace};

use crate::mailbox::{self, Receiver, Sender};
use crate::merge::merge_batch;
use crate::schedule::BatchState;
use crate::{Error, Result, Row, RowStore, RowUpdate, Transaction};

/// Delay after an enqueue before the batch pass runs. Bursts shorter than
/// this window coalesce into a single pass.
pub const DEFAULT_QUIESCENCE_WINDOW: Duration = Duration::from_millis(300);

struct Inner {
    rows: RowStore,
    batch: BatchState,
}

/// The merge engine.
///
/// Remote updates go in through [`enqueue`](Self::enqueue) and are merged
/// in debounced batches; local edits go in through
/// [`handle_user_edit`](Self::handle_user_edit) and take effect
/// immediately. Both paths emit [`Transaction`]s on the feed returned by
/// [`new`](Self::new).
///
/// Cheap to clone: all clones share one row store and one feed. Quiescence
/// timers are spawned on the ambient Tokio runtime, so `enqueue` must be
/// called from within one.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<Mutex<Inner>>,
    feed: Sender<Transaction>,
    quiescence: Duration,
}

impl SyncEngine {
    /// Create an engine and its transaction feed with the default
    /// quiescence window.
    pub fn new() -> (SyncEngine, Updates) {
        Self::with_quiescence_window(DEFAULT_QUIESCENCE_WINDOW)
    }

    /// Create an engine with a custom quiescence window.
    pub fn with_quiescence_window(window: Duration) -> (SyncEngine, Updates) {
        let (feed, rx) = mailbox::channel();
        let engine = SyncEngine {
            inner: Arc::new(Mutex::new(Inner {
                rows: RowStore::new(),
                batch: BatchState::new(),
            })),
            feed,
            quiescence: window,
        };
        (engine, Updates { rx })
    }

    /// Queue a remote update and request a merge pass after the quiescence
    /// window.
    ///
    /// If a pass is already scheduled or executing this only queues; the
    /// update is picked up by the pending or follow-up pass.
    pub fn enqueue(&self, update: RowUpdate) {
        let arm = self.inner.lock().unwrap().batch.push(update);
        if arm {
            self.arm_timer();
        }
    }

    /// Parse and queue a raw transport payload.
    pub fn enqueue_value(&self, value: Value) -> Result<()> {
        self.enqueue(RowUpdate::from_value(value)?);
        Ok(())
    }

    /// Apply a local cell edit and emit its transaction immediately,
    /// bypassing the queue and the quiescence window.
    ///
    /// The row is marked dirty; `stale` is left as it was, so an edit on an
    /// already-stale row stays stale until a non-conflicting remote update
    /// lands. An id the store has never seen is rejected - edits never
    /// create rows.
    pub fn handle_user_edit(&self, id: &str, field: &str, value: Value) -> Result<()> {
        let transaction = {
            let mut inner = self.inner.lock().unwrap();
            let row = inner
                .rows
                .get_mut(id)
                .ok_or_else(|| Error::RowNotFound(id.to_string()))?;
            row.set_field(field, value);
            row.dirty = true;
            Transaction::single_update(row.clone())
        };
        trace!(id, field, "local edit applied");
        self.deliver(transaction);
        Ok(())
    }

    /// Current rows in first-insertion order, for the initial render.
    pub fn snapshot(&self) -> Vec<Row> {
        self.inner.lock().unwrap().rows.snapshot()
    }

    /// A copy of one row.
    pub fn get(&self, id: &str) -> Option<Row> {
        self.inner.lock().unwrap().rows.get(id).cloned()
    }

    /// Number of updates waiting for the next pass.
    pub fn pending_count(&self) -> usize {
        self.inner.lock().unwrap().batch.pending()
    }

    /// The configured quiescence window.
    pub fn quiescence_window(&self) -> Duration {
        self.quiescence
    }

    fn arm_timer(&self) {
        let engine = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(engine.quiescence).await;
            engine.run_batch();
        });
    }

    /// One merge pass: drain the queue, reconcile against the store, hand
    /// the change-set to the feed.
    fn run_batch(&self) {
        let (transaction, rearm) = {
            let mut inner = self.inner.lock().unwrap();
            let Some(updates) = inner.batch.timer_fired() else {
                return;
            };
            debug!(updates = updates.len(), "merge pass");
            let transaction = merge_batch(&mut inner.rows, updates);
            let rearm = inner.batch.finish_pass();
            (transaction, rearm)
        };

        if !transaction.is_empty() {
            self.deliver(transaction);
        }
        if rearm {
            self.arm_timer();
        }
    }

    fn deliver(&self, transaction: Transaction) {
        trace!(
            add = transaction.add.len(),
            update = transaction.update.len(),
            "transaction handoff"
        );
        if !self.feed.send(transaction) {
            trace!("no consumer, transaction dropped");
        }
    }
}

/// The transaction feed: a lazy, infinite sequence of change-sets.
///
/// Single consumer, created once alongside its engine and not
/// restartable. Delivery is lossy: if the consumer is not waiting when a
/// transaction is produced, only the latest one is retained (see
/// [`mailbox`](crate::mailbox)).
///
/// The sequence cannot be ended from the producer side; it yields `None`
/// only once every engine handle is gone. The consumer stops by dropping
/// the feed or calling [`close`](Self::close), after which the engine
/// keeps running and its transactions are dropped.
pub struct Updates {
    rx: Receiver<Transaction>,
}

impl Updates {
    /// Wait for the next transaction.
    pub async fn next(&mut self) -> Option<Transaction> {
        self.rx.recv().await
    }

    /// Take a pending transaction without waiting, for frame-driven
    /// consumers that poll once per render.
    pub fn try_next(&mut self) -> Option<Transaction> {
        self.rx.try_recv()
    }

    /// Stop consuming. Subsequent transactions are dropped at the feed.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

impl Stream for Updates {
    type Item = Transaction;

    fn poll_next(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Transaction>> {
        std::pin::Pin::new(&mut self.get_mut().rx).poll_next(cx)
    }
}
