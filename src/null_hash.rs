// Path: src/null_hash.rs
//! The cache of all-zero "hash of absent child" placeholders, one per digest
//! type. This is the sole place the all-zero invariant on `Hash` is
//! deliberately bypassed.

use crate::registry::DigestType;
use crate::value::Hash;
use std::collections::HashMap;

/// Immutable, built once at engine construction.
pub struct NullHashCache {
    by_digest_type: HashMap<DigestType, Hash>,
}

impl NullHashCache {
    /// Computes the null hash for every known digest type.
    pub fn new() -> NullHashCache {
        let by_digest_type = DigestType::ALL
            .iter()
            .map(|digest_type| {
                let bytes = vec![0u8; digest_type.output_length()];
                (*digest_type, Hash::new_unchecked(*digest_type, bytes))
            })
            .collect();
        NullHashCache { by_digest_type }
    }

    /// The cached null hash for `digest_type`.
    pub fn get(&self, digest_type: DigestType) -> Hash {
        self.by_digest_type
            .get(&digest_type)
            .cloned()
            .unwrap_or_else(|| {
                Hash::new_unchecked(digest_type, vec![0u8; digest_type.output_length()])
            })
    }
}

impl Default for NullHashCache {
    fn default() -> Self {
        NullHashCache::new()
    }
}
