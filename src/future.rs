// Path: src/future.rs
//! The "batch future whose completion signals that every item's result slot is
//! filled" pattern described in the engine's design notes.
//!
//! Two observables exist per async work item: the completion signal
//! (`BatchFuture`, shared by every item in the same batch) and the result slot
//! living on the item itself (`Hash`, `VerificationStatus`, ...). `ItemFuture<T>`
//! folds both into a single blocking handle whose `get()` first waits for the
//! batch to drain and then reads the slot, matching the "wrapping future"
//! convenience entry points described in the pipeline design.

use crate::error::CryptoError;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

struct Shared {
    done: Mutex<bool>,
    condvar: Condvar,
}

/// A future resolved once, shared by every item in a batch.
#[derive(Clone)]
pub struct BatchFuture(Arc<Shared>);

/// The write side of a `BatchFuture`, held by the batch handler.
pub struct BatchResolver(Arc<Shared>);

/// Builds a fresh, unresolved batch future/resolver pair.
pub fn batch_future_pair() -> (BatchFuture, BatchResolver) {
    let shared = Arc::new(Shared {
        done: Mutex::new(false),
        condvar: Condvar::new(),
    });
    (BatchFuture(shared.clone()), BatchResolver(shared))
}

impl BatchFuture {
    /// True if the batch has already been drained.
    pub fn is_done(&self) -> bool {
        *self.0.done.lock().expect("batch future mutex poisoned")
    }

    /// Blocks the calling thread until the batch is drained.
    pub fn wait(&self) {
        let guard = self.0.done.lock().expect("batch future mutex poisoned");
        let _unused = self
            .0
            .condvar
            .wait_while(guard, |done| !*done)
            .expect("batch future mutex poisoned");
    }

    /// Blocks with a timeout; returns `true` if the batch drained before it elapsed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.0.done.lock().expect("batch future mutex poisoned");
        let (guard, _result) = self
            .0
            .condvar
            .wait_timeout_while(guard, timeout, |done| !*done)
            .expect("batch future mutex poisoned");
        *guard
    }
}

impl BatchResolver {
    /// Resolves the future, waking every waiter.
    pub fn resolve(self) {
        let mut done = self.0.done.lock().expect("batch future mutex poisoned");
        *done = true;
        self.0.condvar.notify_all();
    }
}

/// A result slot plus the batch future that signals when it has been filled.
///
/// `get()` blocks on the batch future, then reads the slot. If the item's
/// per-item computation failed (logged, not propagated — see the pipeline's
/// error policy) the slot stays empty and `get()` returns `NoSuchAlgorithm`.
pub struct ItemFuture<T> {
    slot: Arc<Mutex<Option<T>>>,
    batch: BatchFuture,
}

impl<T: Clone> ItemFuture<T> {
    pub(crate) fn new(slot: Arc<Mutex<Option<T>>>, batch: BatchFuture) -> Self {
        ItemFuture { slot, batch }
    }

    /// Blocks until the batch resolves, then returns the item's result.
    pub fn get(&self) -> Result<T, CryptoError> {
        self.batch.wait();
        self.slot
            .lock()
            .expect("result slot mutex poisoned")
            .clone()
            .ok_or_else(|| CryptoError::NoSuchAlgorithm("item result was never produced".into()))
    }

    /// Non-blocking poll of the underlying batch future.
    pub fn is_done(&self) -> bool {
        self.batch.is_done()
    }
}
