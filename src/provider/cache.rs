// Path: src/provider/cache.rs
//! Per-thread algorithm cache.
//!
//! The underlying cryptographic primitive instances (message digests, etc.)
//! are not safe for concurrent use, so each provider keeps one instance per
//! thread, keyed by the algorithm type's ordinal. Entries are grown on demand
//! and live for the lifetime of the thread; there is no cross-thread
//! migration.

use crate::error::CryptoError;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

thread_local! {
    static CACHE: RefCell<HashMap<(usize, i32), Box<dyn Any>>> = RefCell::new(HashMap::new());
}

static NEXT_PROVIDER_ID: AtomicUsize = AtomicUsize::new(0);

/// A per-thread cache of loaded algorithm instances of type `A`, scoped to one
/// operation provider instance.
pub struct ThreadLocalAlgorithmCache<A> {
    provider_id: usize,
    _marker: PhantomData<fn() -> A>,
}

impl<A: 'static> ThreadLocalAlgorithmCache<A> {
    /// Allocates a fresh cache scope. Each `OperationProvider` owns exactly
    /// one of these, so caches from different providers never collide even
    /// though they share the same thread-local storage.
    pub fn new() -> Self {
        ThreadLocalAlgorithmCache {
            provider_id: NEXT_PROVIDER_ID.fetch_add(1, Ordering::Relaxed),
            _marker: PhantomData,
        }
    }

    /// Runs `use_algorithm` against the cached instance for `algorithm_ordinal`
    /// on the current thread, loading (and caching) it first via `load` if
    /// this is the first use on this thread.
    pub fn with<R>(
        &self,
        algorithm_ordinal: i32,
        load: impl FnOnce() -> Result<A, CryptoError>,
        use_algorithm: impl FnOnce(&mut A) -> Result<R, CryptoError>,
    ) -> Result<R, CryptoError> {
        CACHE.with(|cache| {
            let mut map = cache.borrow_mut();
            let key = (self.provider_id, algorithm_ordinal);
            if !map.contains_key(&key) {
                let algorithm = load()?;
                map.insert(key, Box::new(algorithm));
            }
            let boxed = map
                .get_mut(&key)
                .expect("algorithm cache entry just inserted");
            let algorithm = boxed
                .downcast_mut::<A>()
                .expect("algorithm cache type mismatch for this provider");
            use_algorithm(algorithm)
        })
    }

    /// Drops the cached instance for `algorithm_ordinal` on the current thread,
    /// forcing the next `with` call to reload it.
    pub fn evict(&self, algorithm_ordinal: i32) {
        CACHE.with(|cache| {
            cache
                .borrow_mut()
                .remove(&(self.provider_id, algorithm_ordinal));
        });
    }
}

impl<A: 'static> Default for ThreadLocalAlgorithmCache<A> {
    fn default() -> Self {
        ThreadLocalAlgorithmCache::new()
    }
}
