//! Single-slot handoff between the engine and its consumer.
//!
//! A mailbox is a channel with room for exactly one value. `send`
//! overwrites whatever the consumer has not yet taken and wakes the
//! waiting consumer; `recv` takes the pending value or suspends until the
//! next send. When the producer outpaces the consumer, intermediate values
//! are dropped and only the latest is delivered.
//!
//! Sends never block and there is no backpressure signal. A consumer that
//! needs every value does not belong on a mailbox.

use std::future::poll_fn;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

use futures::Stream;

struct State<T> {
    slot: Option<T>,
    waker: Option<Waker>,
    receiver_alive: bool,
    sender_count: usize,
}

struct Shared<T> {
    state: Mutex<State<T>>,
}

/// Create a connected mailbox pair.
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            slot: None,
            waker: None,
            receiver_alive: true,
            sender_count: 1,
        }),
    });
    (
        Sender {
            shared: Arc::clone(&shared),
        },
        Receiver { shared },
    )
}

/// Producer half. Cloneable; sends never block.
pub struct Sender<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Sender<T> {
    /// Put `value` in the slot, replacing any value the consumer has not
    /// yet taken, and wake the waiting consumer if there is one.
    ///
    /// Returns `false` when the consumer is gone and the value was
    /// dropped.
    pub fn send(&self, value: T) -> bool {
        let waker = {
            let mut state = self.shared.state.lock().unwrap();
            if !state.receiver_alive {
                return false;
            }
            state.slot = Some(value);
            state.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
        true
    }

    /// Whether the consumer has closed or dropped its half.
    pub fn is_closed(&self) -> bool {
        !self.shared.state.lock().unwrap().receiver_alive
    }
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        self.shared.state.lock().unwrap().sender_count += 1;
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        let waker = {
            let mut state = self.shared.state.lock().unwrap();
            state.sender_count -= 1;
            if state.sender_count == 0 {
                state.waker.take()
            } else {
                None
            }
        };
        // Last sender gone: a parked consumer must observe the end.
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// Consumer half. Not cloneable, and `recv` takes `&mut self`: at most one
/// waiter can ever be registered.
pub struct Receiver<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Receiver<T> {
    /// Take the pending value, or suspend until the next send.
    ///
    /// Resolves to `None` once every sender is dropped and the slot is
    /// empty, or after [`close`](Self::close).
    pub async fn recv(&mut self) -> Option<T> {
        poll_fn(|cx| self.poll_recv(cx)).await
    }

    /// Take the pending value without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.shared.state.lock().unwrap().slot.take()
    }

    /// Stop receiving. The pending value, if any, is discarded, and
    /// subsequent sends drop their value.
    pub fn close(&mut self) {
        let mut state = self.shared.state.lock().unwrap();
        state.receiver_alive = false;
        state.slot = None;
        state.waker = None;
    }

    fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let mut state = self.shared.state.lock().unwrap();
        if let Some(value) = state.slot.take() {
            return Poll::Ready(Some(value));
        }
        if !state.receiver_alive || state.sender_count == 0 {
            return Poll::Ready(None);
        }
        state.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T> Stream for Receiver<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().poll_recv(cx)
    }
}
