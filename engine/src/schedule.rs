//! Batch scheduling state: the pending queue, the debounce flag and the
//! reentrancy guard.
//!
//! `BatchState` is a pure state machine; the timer itself lives in
//! [`SyncEngine`](crate::SyncEngine). Keeping the transitions free of any
//! clock makes the scheduling policy testable without waiting on one.

use crate::RowUpdate;

/// Queue and guard state behind the debounce scheduler.
///
/// Policy: at most one timer is armed at a time, and a merge pass never
/// starts while another is executing. Updates that arrive mid-pass are
/// held and trigger exactly one follow-up pass. Bursts shorter than the
/// quiescence window therefore coalesce into a single pass, and no update
/// is ever left unprocessed - this is a debounce-with-drain, not a
/// fixed-rate window.
#[derive(Debug, Default)]
pub struct BatchState {
    queue: Vec<RowUpdate>,
    timer_armed: bool,
    processing: bool,
}

impl BatchState {
    /// Create an idle scheduler with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an update. Returns true when the caller should arm the
    /// quiescence timer.
    pub fn push(&mut self, update: RowUpdate) -> bool {
        self.queue.push(update);
        self.request()
    }

    /// Request a pass. A no-op (returns false) while a timer is already
    /// armed or a pass is executing.
    pub fn request(&mut self) -> bool {
        if self.timer_armed || self.processing {
            return false;
        }
        self.timer_armed = true;
        true
    }

    /// The armed timer fired. Drains the queue and enters the pass,
    /// returning the batch to merge - or `None` when a pass is already
    /// executing, in which case that pass's drain covers the queue.
    pub fn timer_fired(&mut self) -> Option<Vec<RowUpdate>> {
        self.timer_armed = false;
        if self.processing {
            return None;
        }
        self.processing = true;
        Some(std::mem::take(&mut self.queue))
    }

    /// A pass finished. Returns true when updates arrived mid-pass and the
    /// caller should arm a fresh timer; the armed flag is already set in
    /// that case.
    pub fn finish_pass(&mut self) -> bool {
        self.processing = false;
        if self.queue.is_empty() {
            return false;
        }
        self.request()
    }

    /// Number of updates waiting for the next pass.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether a quiescence timer is currently armed.
    pub fn is_timer_armed(&self) -> bool {
        self.timer_armed
    }

    /// Whether a merge pass is currently executing.
    pub fn is_processing(&self) -> bool {
        self.processing
    }
}
