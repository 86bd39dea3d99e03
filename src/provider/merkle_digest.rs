// Path: src/provider/merkle_digest.rs
//! Merkle-internal digest provider: `H(class_id, version, child1, child2, …)`.
//!
//! Substitution of a missing child with the null hash is opt-in: callers that
//! want a missing child to count as present must already have replaced it
//! with `Some(null_hash)` before calling `digest_internal` (see
//! `crate::merkle`, which does this for the tree hasher). A bare `None` here
//! always raises `IllegalChildHash` — there is no implicit substitution.

use super::digest::MessageDigestProvider;
use crate::error::CryptoError;
use crate::model::MerkleNodeView;
use crate::registry::DigestType;
use crate::value::Hash;

/// Hashes an internal Merkle node from its class id, version, and already
/// resolved child hashes.
pub struct MerkleInternalDigestProvider {
    inner: MessageDigestProvider,
}

impl MerkleInternalDigestProvider {
    pub fn new() -> Self {
        MerkleInternalDigestProvider {
            inner: MessageDigestProvider::new(),
        }
    }

    /// Hashes `node` given its children's hashes, in child order. A `None`
    /// entry raises `IllegalChildHash` naming `node` and the offending index.
    pub fn digest_internal(
        &self,
        node: &dyn MerkleNodeView,
        child_hashes: &[Option<Hash>],
        digest_type: DigestType,
    ) -> Result<Hash, CryptoError> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&node.class_id().to_be_bytes());
        buf.extend_from_slice(&node.version().to_be_bytes());
        for (index, child_hash) in child_hashes.iter().enumerate() {
            match child_hash {
                Some(hash) => buf.extend_from_slice(hash.as_bytes()),
                None => {
                    return Err(CryptoError::IllegalChildHash {
                        parent_class_id: node.class_id(),
                        child_index: index,
                    })
                }
            }
        }
        self.inner.digest(&buf, digest_type)
    }
}

impl Default for MerkleInternalDigestProvider {
    fn default() -> Self {
        MerkleInternalDigestProvider::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MerkleNodeView;
    use std::sync::{Arc, Mutex};

    struct FakeNode {
        class_id: i64,
        version: i32,
        hash: Mutex<Option<Hash>>,
    }
    impl MerkleNodeView for FakeNode {
        fn is_leaf(&self) -> bool {
            false
        }
        fn class_id(&self) -> i64 {
            self.class_id
        }
        fn version(&self) -> i32 {
            self.version
        }
        fn child_count(&self) -> usize {
            0
        }
        fn child(&self, _index: usize) -> Option<Arc<dyn MerkleNodeView>> {
            None
        }
        fn hash(&self) -> Option<Hash> {
            self.hash.lock().unwrap().clone()
        }
        fn set_hash(&self, hash: Hash) {
            *self.hash.lock().unwrap() = Some(hash);
        }
        fn serialize_leaf(&self) -> Vec<u8> {
            Vec::new()
        }
    }

    #[test]
    fn null_child_raises_illegal_child_hash() {
        let provider = MerkleInternalDigestProvider::new();
        let node = FakeNode {
            class_id: 7,
            version: 1,
            hash: Mutex::new(None),
        };
        let err = provider
            .digest_internal(&node, &[None], DigestType::Sha384)
            .unwrap_err();
        match err {
            CryptoError::IllegalChildHash {
                parent_class_id,
                child_index,
            } => {
                assert_eq!(parent_class_id, 7);
                assert_eq!(child_index, 0);
            }
            other => panic!("expected IllegalChildHash, got {other:?}"),
        }
    }

    #[test]
    fn different_child_order_yields_different_hash() {
        let provider = MerkleInternalDigestProvider::new();
        let node = FakeNode {
            class_id: 1,
            version: 1,
            hash: Mutex::new(None),
        };
        let a = Hash::new(DigestType::Sha384, {
            let mut b = vec![0u8; 48];
            b[0] = 1;
            b
        })
        .unwrap();
        let b = Hash::new(DigestType::Sha384, {
            let mut b = vec![0u8; 48];
            b[0] = 2;
            b
        })
        .unwrap();
        let ab = provider
            .digest_internal(&node, &[Some(a.clone()), Some(b.clone())], DigestType::Sha384)
            .unwrap();
        let ba = provider
            .digest_internal(&node, &[Some(b), Some(a)], DigestType::Sha384)
            .unwrap();
        assert_ne!(ab, ba);
    }
}
