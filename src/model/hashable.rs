// Path: src/model/hashable.rs
use crate::value::Hash;

/// The storage mode backing a `Hashable` implementor.
#[derive(Debug, Clone)]
pub enum HashSlot {
    /// An externally settable hash, `None` until computed or assigned.
    Managed(Option<Hash>),
    /// The object always computes its own hash; `set_hash` is rejected and
    /// `invalidate_hash` is a no-op.
    SelfComputing,
}

/// Capability for objects that carry a cached hash.
///
/// Mutating the object invalidates the cached hash (resets it to `None`)
/// unless the object is self-computing, in which case it always returns a
/// non-null hash and rejects external assignment. Takes `&self`, not
/// `&mut self`: implementors (e.g. `Message`) are shared across pipeline
/// worker threads behind an `Arc` and back the slot with interior
/// mutability, the same way `MerkleNodeView::set_hash` does.
pub trait Hashable {
    /// The currently cached hash, if any.
    fn hash(&self) -> Option<Hash>;

    /// Assigns the cached hash. Returns `false` if this object is
    /// self-computing (assignment is rejected, not an error: the caller is
    /// expected to check first via `is_self_computing`).
    fn set_hash(&self, hash: Hash) -> bool;

    /// Clears the cached hash. A no-op for self-computing objects.
    fn invalidate_hash(&self);

    /// True if this object computes its own hash rather than accepting one.
    fn is_self_computing(&self) -> bool;
}

impl Hashable for crate::model::Message {
    fn hash(&self) -> Option<Hash> {
        crate::model::Message::hash(self)
    }

    fn set_hash(&self, hash: Hash) -> bool {
        *self.hash_slot().lock().expect("message hash slot poisoned") = Some(hash);
        true
    }

    fn invalidate_hash(&self) {
        *self.hash_slot().lock().expect("message hash slot poisoned") = None;
    }

    fn is_self_computing(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DigestType;
    use bytes::Bytes;

    struct SelfComputingThing;
    impl Hashable for SelfComputingThing {
        fn hash(&self) -> Option<Hash> {
            Some(Hash::new(DigestType::Sha384, vec![7u8; 48]).expect("fixture"))
        }
        fn set_hash(&self, _hash: Hash) -> bool {
            false
        }
        fn invalidate_hash(&self) {}
        fn is_self_computing(&self) -> bool {
            true
        }
    }

    #[test]
    fn self_computing_rejects_external_assignment() {
        let thing = SelfComputingThing;
        assert!(thing.is_self_computing());
        assert!(!thing.set_hash(Hash::new(DigestType::Sha384, vec![1u8; 48]).unwrap()));
        assert!(thing.hash().is_some());
    }

    #[test]
    fn message_is_hashable_and_invalidation_clears_the_slot() {
        let message = crate::model::Message::whole(Bytes::from_static(b"abc"), DigestType::Sha384);
        assert!(!message.is_self_computing());
        let hash = Hash::new(DigestType::Sha384, vec![1u8; 48]).unwrap();
        assert!(Hashable::set_hash(&message, hash.clone()));
        assert_eq!(Hashable::hash(&message), Some(hash));
        message.invalidate_hash();
        assert_eq!(Hashable::hash(&message), None);
    }
}
