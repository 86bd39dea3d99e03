// Path: tests/end_to_end.rs
//! End-to-end scenarios against the public facade.

use bytes::Bytes;
use ledger_crypto_engine::engine::CryptographyEngine;
use ledger_crypto_engine::error::CryptoError;
use ledger_crypto_engine::model::{Message, MerkleNodeView};
use ledger_crypto_engine::registry::{DigestType, SignatureType};
use ledger_crypto_engine::settings::EngineSettings;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn engine() -> CryptographyEngine {
    CryptographyEngine::new(EngineSettings {
        cpu_digest_thread_count: 2,
        cpu_verifier_thread_count: 2,
        cpu_digest_queue_size: 16,
        cpu_verifier_queue_size: 16,
        merkle_thread_count: 2,
        force_cpu: true,
    })
}

#[test]
fn sha384_of_abc_matches_known_answer() {
    let engine = engine();
    let hash = engine.digest(b"abc", DigestType::Sha384).unwrap();
    assert_eq!(
        hash.to_hex().to_lowercase(),
        "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7"
    );
}

#[test]
fn null_hash_for_sha384_is_48_zero_bytes() {
    let engine = engine();
    let hash = engine.null_hash(DigestType::Sha384);
    assert_eq!(hash.as_bytes(), &[0u8; 48][..]);
}

#[test]
fn constructing_a_hash_from_an_all_zero_buffer_is_rejected() {
    use ledger_crypto_engine::value::Hash;
    let err = Hash::new(DigestType::Sha384, vec![0u8; 48]).unwrap_err();
    assert!(matches!(err, CryptoError::EmptyHashValue));
}

#[test]
fn batch_of_ten_messages_preserves_order_and_matches_independent_digests() {
    let engine = engine();
    let messages: Vec<Arc<Message>> = (0..10u8)
        .map(|n| Arc::new(Message::whole(Bytes::from(vec![n; 16]), DigestType::Sha384)))
        .collect();

    let future = engine.digest_batch_async(messages.clone()).unwrap();
    assert!(future.wait_timeout(Duration::from_secs(2)));

    for message in &messages {
        let expected = engine.digest(message.payload_slice(), DigestType::Sha384).unwrap();
        assert_eq!(message.hash(), Some(expected));
    }
}

#[test]
fn rfc8032_empty_message_vector_verifies_through_the_public_engine_api() {
    // RFC 8032 §7.1 vector 1: empty message, standard test key pair. Regression
    // guard for routing empty-message verification through `DelegatingVerifier`
    // rather than only unit-testing `Ed25519Verifier` directly.
    use dcrypt::algorithms::ByteSerializable;
    use dcrypt::sign::eddsa;

    let sk_seed = hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f6").unwrap();
    let sk_seed: [u8; 32] = sk_seed[..32].try_into().unwrap();
    let sk = eddsa::Ed25519SecretKey::from_seed(&sk_seed).unwrap();
    let pk = sk.public_key().unwrap();
    let signature = eddsa::Ed25519::sign(&[], &sk).unwrap();

    let engine = engine();
    let valid = engine
        .verify(&[], signature.to_bytes().as_slice(), pk.to_bytes().as_slice(), SignatureType::Ed25519)
        .unwrap();
    assert!(valid);
}

struct Leaf {
    class_id: i64,
    version: i32,
    bytes: Vec<u8>,
    hash: Mutex<Option<ledger_crypto_engine::value::Hash>>,
}

struct Internal {
    class_id: i64,
    version: i32,
    children: Vec<Arc<dyn MerkleNodeView>>,
    hash: Mutex<Option<ledger_crypto_engine::value::Hash>>,
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
    fn hash(&self) -> Option<ledger_crypto_engine::value::Hash> {
        self.hash.lock().unwrap().clone()
    }
    fn set_hash(&self, hash: ledger_crypto_engine::value::Hash) {
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
        self.children.get(index).cloned()
    }
    fn hash(&self) -> Option<ledger_crypto_engine::value::Hash> {
        self.hash.lock().unwrap().clone()
    }
    fn set_hash(&self, hash: ledger_crypto_engine::value::Hash) {
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
        hash: Mutex::new(None),
    });
    let right: Arc<dyn MerkleNodeView> = Arc::new(Leaf {
        class_id: 9,
        version: 1,
        bytes: vec![0x04, 0x05, 0x06, 0x07],
        hash: Mutex::new(None),
    });
    Arc::new(Internal {
        class_id: 1,
        version: 1,
        children: vec![left, right],
        hash: Mutex::new(None),
    })
}

#[test]
fn merkle_tree_hash_is_identical_sync_and_async() {
    let engine = engine();

    let sync_tree = sample_tree();
    let sync_hash = engine.digest_tree_sync(sync_tree.as_ref(), DigestType::Sha384).unwrap();

    let async_tree = sample_tree();
    let future = engine.digest_tree_async(async_tree, DigestType::Sha384);
    let async_hash = future.get().unwrap();

    assert_eq!(sync_hash, async_hash);
}

#[test]
fn running_hash_is_sequential_and_sensitive_to_new_hash() {
    let engine = engine();
    let a = engine.digest(b"alpha", DigestType::Sha384).unwrap();
    let b = engine.digest(b"beta", DigestType::Sha384).unwrap();
    let prev = engine.digest(b"genesis", DigestType::Sha384).unwrap();

    let chained_a = engine.running_hash(Some(&prev), Some(&a), DigestType::Sha384).unwrap();
    let chained_b = engine.running_hash(Some(&prev), Some(&b), DigestType::Sha384).unwrap();
    assert_ne!(chained_a, chained_b);

    let chained_a_again = engine.running_hash(Some(&prev), Some(&a), DigestType::Sha384).unwrap();
    assert_eq!(chained_a, chained_a_again);
}
