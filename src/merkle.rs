// Path: src/merkle.rs
//! Post-order Merkle tree hashing, synchronous and parallel.
//!
//! A leaf's hash covers its class id, version, and serialized payload; an
//! internal node's hash covers its class id, version, and its children's
//! hashes in order (`provider::merkle_digest`). A missing child (`child(i)`
//! returning `None`) is substituted with the cached null hash for the digest
//! type before the internal node is hashed — this is the one place that
//! substitution happens; `MerkleInternalDigestProvider` itself never does it
//! implicitly (see its doc comment).

use crate::error::CryptoError;
use crate::future::{batch_future_pair, ItemFuture};
use crate::model::MerkleNodeView;
use crate::null_hash::NullHashCache;
use crate::pipeline::WorkerPool;
use crate::provider::digest::MessageDigestProvider;
use crate::provider::merkle_digest::MerkleInternalDigestProvider;
use crate::registry::DigestType;
use crate::value::Hash;
use rayon::prelude::*;
use std::sync::{Arc, Mutex};

pub struct MerkleTreeHasher {
    leaf_digest: MessageDigestProvider,
    internal_digest: MerkleInternalDigestProvider,
    null_hashes: Arc<NullHashCache>,
    pool: WorkerPool,
}

impl MerkleTreeHasher {
    pub fn new(null_hashes: Arc<NullHashCache>, thread_count: usize) -> Self {
        MerkleTreeHasher {
            leaf_digest: MessageDigestProvider::new(),
            internal_digest: MerkleInternalDigestProvider::new(),
            null_hashes,
            pool: WorkerPool::new(thread_count),
        }
    }

    /// Hashes `root`, setting every descendant's hash along the way, entirely
    /// on the caller's thread.
    pub fn hash_sync(&self, root: &dyn MerkleNodeView, digest_type: DigestType) -> Result<Hash, CryptoError> {
        self.hash_node(root, digest_type)
    }

    /// Hashes `root` on the worker pool, returning a future that resolves
    /// once the root's hash has been set.
    pub fn hash_async(
        self: &Arc<Self>,
        root: Arc<dyn MerkleNodeView>,
        digest_type: DigestType,
    ) -> ItemFuture<Hash> {
        let slot = Arc::new(Mutex::new(None));
        let (future, resolver) = batch_future_pair();
        let item_future = ItemFuture::new(slot.clone(), future);
        let hasher = self.clone();
        self.pool.spawn(move || {
            match hasher.hash_node_parallel(root.as_ref(), digest_type) {
                Ok(hash) => *slot.lock().expect("merkle root slot poisoned") = Some(hash),
                Err(err) => log::warn!("merkle tree hashing failed: {err}"),
            }
            resolver.resolve();
        });
        item_future
    }

    fn hash_leaf(&self, node: &dyn MerkleNodeView, digest_type: DigestType) -> Result<Hash, CryptoError> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&node.class_id().to_be_bytes());
        buf.extend_from_slice(&node.version().to_be_bytes());
        buf.extend_from_slice(&node.serialize_leaf());
        self.leaf_digest.digest(&buf, digest_type)
    }

    /// Sequential post-order traversal; deterministic by `child(i)` order.
    fn hash_node(&self, node: &dyn MerkleNodeView, digest_type: DigestType) -> Result<Hash, CryptoError> {
        if let Some(existing) = node.hash() {
            return Ok(existing);
        }
        let hash = if node.is_leaf() {
            self.hash_leaf(node, digest_type)?
        } else {
            let mut child_hashes = Vec::with_capacity(node.child_count());
            for index in 0..node.child_count() {
                let child_hash = match node.child(index) {
                    Some(child) => self.hash_node(child.as_ref(), digest_type)?,
                    None => self.null_hashes.get(digest_type),
                };
                child_hashes.push(Some(child_hash));
            }
            self.internal_digest.digest_internal(node, &child_hashes, digest_type)?
        };
        node.set_hash(hash.clone());
        Ok(hash)
    }

    /// Same traversal, but a node's children are hashed concurrently on the
    /// pool this hasher owns. Running on a pool worker thread, `into_par_iter`
    /// schedules onto that same pool rather than the global one.
    fn hash_node_parallel(&self, node: &dyn MerkleNodeView, digest_type: DigestType) -> Result<Hash, CryptoError> {
        if let Some(existing) = node.hash() {
            return Ok(existing);
        }
        let hash = if node.is_leaf() {
            self.hash_leaf(node, digest_type)?
        } else {
            let children: Vec<Option<Arc<dyn MerkleNodeView>>> =
                (0..node.child_count()).map(|index| node.child(index)).collect();
            let child_hashes: Vec<Option<Hash>> = children
                .into_par_iter()
                .map(|child| match child {
                    Some(child) => self.hash_node_parallel(child.as_ref(), digest_type).map(Some),
                    None => Ok(Some(self.null_hashes.get(digest_type))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            self.internal_digest.digest_internal(node, &child_hashes, digest_type)?
        };
        node.set_hash(hash.clone());
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    struct Leaf {
        class_id: i64,
        version: i32,
        bytes: Vec<u8>,
        hash: StdMutex<Option<Hash>>,
    }

    struct Internal {
        class_id: i64,
        version: i32,
        children: Vec<Option<Arc<dyn MerkleNodeView>>>,
        hash: StdMutex<Option<Hash>>,
    }

    impl MerkleNodeView for Leaf {
        fn is_leaf(&self) -> bool {
            true
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
            self.bytes.clone()
        }
    }

    impl MerkleNodeView for Internal {
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
            self.children.len()
        }
        fn child(&self, index: usize) -> Option<Arc<dyn MerkleNodeView>> {
            self.children.get(index).cloned().flatten()
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

    fn sample_tree() -> Arc<dyn MerkleNodeView> {
        let left: Arc<dyn MerkleNodeView> = Arc::new(Leaf {
            class_id: 9,
            version: 1,
            bytes: vec![0x00, 0x01, 0x02, 0x03],
            hash: StdMutex::new(None),
        });
        let right: Arc<dyn MerkleNodeView> = Arc::new(Leaf {
            class_id: 9,
            version: 1,
            bytes: vec![0x04, 0x05, 0x06, 0x07],
            hash: StdMutex::new(None),
        });
        Arc::new(Internal {
            class_id: 1,
            version: 1,
            children: vec![Some(left), Some(right)],
            hash: StdMutex::new(None),
        })
    }

    #[test]
    fn sync_and_async_agree() {
        let null_hashes = Arc::new(NullHashCache::new());
        let hasher = Arc::new(MerkleTreeHasher::new(null_hashes, 2));

        let sync_tree = sample_tree();
        let sync_hash = hasher.hash_sync(sync_tree.as_ref(), DigestType::Sha384).unwrap();

        let async_tree = sample_tree();
        let future = hasher.hash_async(async_tree, DigestType::Sha384);
        let async_hash = future.get().unwrap();

        assert_eq!(sync_hash, async_hash);
    }

    #[test]
    fn missing_child_is_substituted_with_null_hash_not_an_error() {
        let null_hashes = Arc::new(NullHashCache::new());
        let hasher = MerkleTreeHasher::new(null_hashes, 1);
        let leaf: Arc<dyn MerkleNodeView> = Arc::new(Leaf {
            class_id: 9,
            version: 1,
            bytes: vec![1, 2, 3],
            hash: StdMutex::new(None),
        });
        let tree = Internal {
            class_id: 1,
            version: 1,
            children: vec![Some(leaf), None],
            hash: StdMutex::new(None),
        };
        let hash = hasher.hash_sync(&tree, DigestType::Sha384).unwrap();
        assert_eq!(hash.digest_type(), DigestType::Sha384);
    }

    #[test]
    fn hashing_sets_every_descendant_hash() {
        let null_hashes = Arc::new(NullHashCache::new());
        let hasher = MerkleTreeHasher::new(null_hashes, 1);
        let tree = sample_tree();
        hasher.hash_sync(tree.as_ref(), DigestType::Sha384).unwrap();
        assert!(tree.hash().is_some());
        assert!(tree.child(0).unwrap().hash().is_some());
        assert!(tree.child(1).unwrap().hash().is_some());
    }
}
