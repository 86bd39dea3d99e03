// Path: src/model/running_hash.rs
use crate::future::{batch_future_pair, BatchFuture, BatchResolver, ItemFuture};
use crate::value::Hash;
use std::sync::{Arc, Mutex};

/// Holds an optional current hash plus a future that resolves once that hash
/// becomes known. Once resolved, it behaves like an already-resolved past
/// value: further reads of `hash()` return it immediately, and `future()`
/// returns a handle that will not block.
pub struct RunningHash {
    hash: Arc<Mutex<Option<Hash>>>,
    batch: BatchFuture,
    resolver: Mutex<Option<BatchResolver>>,
}

impl RunningHash {
    /// Creates an unresolved running hash.
    pub fn new() -> RunningHash {
        let (batch, resolver) = batch_future_pair();
        RunningHash {
            hash: Arc::new(Mutex::new(None)),
            batch,
            resolver: Mutex::new(Some(resolver)),
        }
    }

    /// Creates an already-resolved running hash wrapping `hash`.
    pub fn resolved(hash: Hash) -> RunningHash {
        let running_hash = RunningHash::new();
        running_hash.set_hash(hash);
        running_hash
    }

    /// The currently known hash, if any.
    pub fn hash(&self) -> Option<Hash> {
        self.hash.lock().expect("running hash slot poisoned").clone()
    }

    /// Sets the hash and resolves the future. A no-op (beyond overwriting the
    /// slot) if already resolved — the engine's sync chain operation and a
    /// racing resolver must not both try to consume the one-shot resolver.
    pub fn set_hash(&self, hash: Hash) {
        *self.hash.lock().expect("running hash slot poisoned") = Some(hash);
        if let Some(resolver) = self.resolver.lock().expect("resolver slot poisoned").take() {
            resolver.resolve();
        }
    }

    /// A future that resolves once `hash()` becomes known, either because
    /// this value's owner called `set_hash` or another party resolved it.
    pub fn future(&self) -> ItemFuture<Hash> {
        ItemFuture::new(self.hash.clone(), self.batch.clone())
    }
}

impl Default for RunningHash {
    fn default() -> Self {
        RunningHash::new()
    }
}
