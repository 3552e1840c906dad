//! Single-producer, single-consumer cell for a value computed elsewhere.
//!
//! [`AsyncResult`] is the synchronization point between a task that produces
//! a value and a task that waits for it. The cell starts out pending,
//! becomes ready when its [`Producer`] resolves it, and hands the value out
//! exactly once. Polling with [`AsyncResult::is_ready`] never blocks, which
//! is what lets the worker loop cycle a not-ready continuation back into the
//! queue instead of stalling a thread on it.

use crate::error::{Error, Result};
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::mem;
use std::sync::Arc;

enum State<T> {
    Pending,
    Ready(T),
    Consumed,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

/// Consumer half of the cell.
///
/// Obtained from [`AsyncResult::pending`] together with the matching
/// [`Producer`]. There is no way to clone the consumer: at most one party
/// can take the value.
pub struct AsyncResult<T> {
    shared: Arc<Shared<T>>,
}

/// Producer half of the cell. Resolving consumes the handle, so a value is
/// produced at most once.
pub struct Producer<T> {
    shared: Arc<Shared<T>>,
}

impl<T> AsyncResult<T> {
    /// Create an unresolved cell and the handle that will resolve it.
    pub fn pending() -> (AsyncResult<T>, Producer<T>) {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::Pending),
            ready: Condvar::new(),
        });

        (
            AsyncResult {
                shared: Arc::clone(&shared),
            },
            Producer { shared },
        )
    }

    /// Non-blocking readiness poll.
    ///
    /// Returns `true` once the producer has resolved the cell, and `false`
    /// again after the value has been taken. Safe to call any number of
    /// times from any thread holding the consumer.
    pub fn is_ready(&self) -> bool {
        matches!(*self.shared.state.lock(), State::Ready(_))
    }

    /// Take the value, blocking while the cell is still pending.
    ///
    /// The first call returns the value; every later call fails with
    /// [`Error::AlreadyConsumed`]. If the producer is dropped without
    /// resolving, the cell stays pending and this call never returns; the
    /// worker loop avoids that by only taking after a successful poll.
    pub fn take(&mut self) -> Result<T> {
        let mut state = self.shared.state.lock();
        while matches!(*state, State::Pending) {
            self.shared.ready.wait(&mut state);
        }

        match mem::replace(&mut *state, State::Consumed) {
            State::Ready(value) => Ok(value),
            _ => Err(Error::AlreadyConsumed),
        }
    }
}

impl<T> Producer<T> {
    /// Resolve the cell and wake the consumer if it is blocked in
    /// [`AsyncResult::take`].
    pub fn resolve(self, value: T) {
        let mut state = self.shared.state.lock();
        *state = State::Ready(value);
        self.shared.ready.notify_all();
    }
}

impl<T> fmt::Debug for AsyncResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match *self.shared.state.lock() {
            State::Pending => "Pending",
            State::Ready(_) => "Ready",
            State::Consumed => "Consumed",
        };
        f.debug_struct("AsyncResult").field("state", &state).finish()
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").finish()
    }
}
