// Path: src/engine.rs
//! The cryptography facade: the public surface combining the primitive
//! providers, the two async pipelines (digest, verify), the Merkle tree
//! hasher, and the null-hash cache. Construction is the composition root's
//! job; this crate does not provide the process-wide singleton holder the
//! historical facade used (see the design notes on that decision).

use crate::error::CryptoError;
use crate::future::{BatchFuture, ItemFuture};
use crate::model::{Message, MerkleNodeView, RunningHash, TransactionSignature, VerificationStatus};
use crate::null_hash::NullHashCache;
use crate::pipeline::{Pipeline, PipelineItem};
use crate::provider::digest::MessageDigestProvider;
use crate::provider::merkle_digest::MerkleInternalDigestProvider;
use crate::provider::running_hash::RunningHashProvider;
use crate::provider::self_digest::{SelfSerializable, SelfSerializableDigestProvider};
use crate::provider::verify::DelegatingVerifier;
use crate::registry::{DigestType, SignatureType};
use crate::settings::EngineSettings;
use crate::value::Hash;
use std::io::Write;
use std::sync::{Arc, Mutex, RwLock};

use crate::merkle::MerkleTreeHasher;

pub struct CryptographyEngine {
    digest: Arc<MessageDigestProvider>,
    self_digest: SelfSerializableDigestProvider,
    merkle_digest: MerkleInternalDigestProvider,
    running_hash: RunningHashProvider,
    verifier: Arc<DelegatingVerifier>,
    null_hashes: Arc<NullHashCache>,
    merkle_hasher: Mutex<Arc<MerkleTreeHasher>>,
    digest_pipeline: RwLock<Pipeline<Message>>,
    verify_pipeline: RwLock<Pipeline<TransactionSignature>>,
    settings: Mutex<EngineSettings>,
}

impl CryptographyEngine {
    /// Builds an engine from `settings`. At most one instance should exist
    /// per process; the composition root owns it and applies settings before
    /// the first real call (see the design notes on the removed singleton).
    pub fn new(settings: EngineSettings) -> Self {
        let digest = Arc::new(MessageDigestProvider::new());
        let verifier = Arc::new(DelegatingVerifier::new());
        let null_hashes = Arc::new(NullHashCache::new());
        let merkle_hasher = Arc::new(MerkleTreeHasher::new(null_hashes.clone(), settings.merkle_thread_count));

        let digest_pipeline = RwLock::new(build_digest_pipeline(&settings, digest.clone()));
        let verify_pipeline = RwLock::new(build_verify_pipeline(&settings, verifier.clone()));

        CryptographyEngine {
            digest,
            self_digest: SelfSerializableDigestProvider::new(),
            merkle_digest: MerkleInternalDigestProvider::new(),
            running_hash: RunningHashProvider::new(),
            verifier,
            null_hashes,
            merkle_hasher: Mutex::new(merkle_hasher),
            digest_pipeline,
            verify_pipeline,
            settings: Mutex::new(settings),
        }
    }

    // ---- digest -------------------------------------------------------

    /// Hashes a raw byte slice.
    pub fn digest(&self, payload: &[u8], digest_type: DigestType) -> Result<Hash, CryptoError> {
        self.digest.digest(payload, digest_type)
    }

    /// Hashes a `Message` on the caller's thread, stamping its hash slot.
    pub fn digest_message(&self, message: &Message) -> Result<Hash, CryptoError> {
        let hash = self.digest.digest(message.payload_slice(), message.digest_type())?;
        message.stamp(hash.clone());
        Ok(hash)
    }

    /// Hashes each message in order on the caller's thread. Stops and
    /// propagates on the first error, per the sync error-propagation policy.
    pub fn digest_batch_sync(&self, messages: &[Arc<Message>]) -> Result<(), CryptoError> {
        for message in messages {
            self.digest_message(message)?;
        }
        Ok(())
    }

    /// Enqueues `messages` as one batch onto the digest pipeline. Per-item
    /// failures are logged and skipped; the returned future resolves once
    /// every item has been attempted.
    pub fn digest_batch_async(&self, messages: Vec<Arc<Message>>) -> Result<BatchFuture, CryptoError> {
        self.digest_pipeline
            .read()
            .expect("digest pipeline lock poisoned")
            .submit(messages)
    }

    /// Hashes a self-serializable item's canonical byte form, optionally
    /// teeing the same bytes to `downstream`.
    pub fn digest_serializable(
        &self,
        item: &dyn SelfSerializable,
        digest_type: DigestType,
        downstream: Option<&mut dyn Write>,
    ) -> Result<Hash, CryptoError> {
        self.self_digest.digest(item, digest_type, downstream)
    }

    /// Hashes a Merkle internal node from its already-resolved child hashes.
    /// `set_hash` controls whether the node's hash slot is also stamped.
    pub fn digest_internal(
        &self,
        node: &dyn MerkleNodeView,
        child_hashes: &[Option<Hash>],
        digest_type: DigestType,
        set_hash: bool,
    ) -> Result<Hash, CryptoError> {
        let hash = self.merkle_digest.digest_internal(node, child_hashes, digest_type)?;
        if set_hash {
            node.set_hash(hash.clone());
        }
        Ok(hash)
    }

    /// Hashes an entire Merkle tree on the caller's thread.
    pub fn digest_tree_sync(&self, root: &dyn MerkleNodeView, digest_type: DigestType) -> Result<Hash, CryptoError> {
        self.merkle_hasher
            .lock()
            .expect("merkle hasher lock poisoned")
            .hash_sync(root, digest_type)
    }

    /// Hashes an entire Merkle tree on the Merkle worker pool.
    pub fn digest_tree_async(
        &self,
        root: Arc<dyn MerkleNodeView>,
        digest_type: DigestType,
    ) -> ItemFuture<Hash> {
        let hasher = self.merkle_hasher.lock().expect("merkle hasher lock poisoned").clone();
        hasher.hash_async(root, digest_type)
    }

    /// The cached null hash for `digest_type`.
    pub fn null_hash(&self, digest_type: DigestType) -> Hash {
        self.null_hashes.get(digest_type)
    }

    // ---- verify ---------------------------------------------------------

    /// Verifies a detached signature over raw bytes.
    pub fn verify(
        &self,
        data: &[u8],
        signature: &[u8],
        public_key: &[u8],
        signature_type: SignatureType,
    ) -> Result<bool, CryptoError> {
        self.verifier.verify(data, signature, public_key, signature_type)
    }

    /// Verifies a `TransactionSignature` on the caller's thread, stamping its
    /// status slot.
    pub fn verify_signature(&self, tx: &TransactionSignature) -> Result<bool, CryptoError> {
        let valid = self
            .verifier
            .verify(tx.message(), tx.signature(), tx.public_key(), tx.signature_type())?;
        tx.stamp(if valid {
            VerificationStatus::Valid
        } else {
            VerificationStatus::Invalid
        });
        Ok(valid)
    }

    /// Verifies each signature in order on the caller's thread; `true` iff
    /// every one verified valid. Stops and propagates on the first error.
    pub fn verify_batch_sync(&self, signatures: &[Arc<TransactionSignature>]) -> Result<bool, CryptoError> {
        let mut all_valid = true;
        for tx in signatures {
            if !self.verify_signature(tx)? {
                all_valid = false;
            }
        }
        Ok(all_valid)
    }

    /// Enqueues `signatures` as one batch onto the verify pipeline.
    pub fn verify_batch_async(
        &self,
        signatures: Vec<Arc<TransactionSignature>>,
    ) -> Result<BatchFuture, CryptoError> {
        self.verify_pipeline
            .read()
            .expect("verify pipeline lock poisoned")
            .submit(signatures)
    }

    // ---- running hash -----------------------------------------------------

    /// Folds `new_hash` onto `running_hash`, producing the next running hash.
    pub fn running_hash(
        &self,
        running_hash: Option<&Hash>,
        new_hash: Option<&Hash>,
        digest_type: DigestType,
    ) -> Result<Hash, CryptoError> {
        self.running_hash.chain(running_hash, new_hash, digest_type)
    }

    /// Chains `new_hash` onto `chain`'s current value, stamping `chain`'s
    /// slot and resolving its future.
    pub fn running_hash_chain(
        &self,
        chain: &RunningHash,
        new_hash: &Hash,
        digest_type: DigestType,
    ) -> Result<Hash, CryptoError> {
        let next = self.running_hash.chain(chain.hash().as_ref(), Some(new_hash), digest_type)?;
        chain.set_hash(next.clone());
        Ok(next)
    }

    // ---- lifecycle ----------------------------------------------------

    /// Atomically tears down and rebuilds both pipelines and the Merkle
    /// hasher under the new settings: queues are replaced with fresh ones of
    /// the new size, worker pools shut down (5 s soft, then forced) and
    /// restarted.
    pub fn apply_settings(&self, new_settings: EngineSettings) {
        let new_digest_pipeline = build_digest_pipeline(&new_settings, self.digest.clone());
        let new_verify_pipeline = build_verify_pipeline(&new_settings, self.verifier.clone());
        let new_merkle_hasher = Arc::new(MerkleTreeHasher::new(
            self.null_hashes.clone(),
            new_settings.merkle_thread_count,
        ));

        let old_digest_pipeline = {
            let mut guard = self.digest_pipeline.write().expect("digest pipeline lock poisoned");
            std::mem::replace(&mut *guard, new_digest_pipeline)
        };
        let old_verify_pipeline = {
            let mut guard = self.verify_pipeline.write().expect("verify pipeline lock poisoned");
            std::mem::replace(&mut *guard, new_verify_pipeline)
        };
        *self.merkle_hasher.lock().expect("merkle hasher lock poisoned") = new_merkle_hasher;
        *self.settings.lock().expect("settings lock poisoned") = new_settings;

        old_digest_pipeline.shutdown();
        old_verify_pipeline.shutdown();
    }

    /// Tears down both pipelines: soft shutdown (5 s) then forced.
    pub fn shutdown(self) {
        self.digest_pipeline
            .into_inner()
            .expect("digest pipeline lock poisoned")
            .shutdown();
        self.verify_pipeline
            .into_inner()
            .expect("verify pipeline lock poisoned")
            .shutdown();
    }
}

fn build_digest_pipeline(settings: &EngineSettings, digest: Arc<MessageDigestProvider>) -> Pipeline<Message> {
    let compute: Arc<dyn Fn(&Message) -> Result<Hash, CryptoError> + Send + Sync> =
        Arc::new(move |message: &Message| digest.digest(message.payload_slice(), message.digest_type()));
    Pipeline::new(settings.cpu_digest_queue_size, settings.cpu_digest_thread_count, compute)
}

fn build_verify_pipeline(
    settings: &EngineSettings,
    verifier: Arc<DelegatingVerifier>,
) -> Pipeline<TransactionSignature> {
    let compute: Arc<dyn Fn(&TransactionSignature) -> Result<VerificationStatus, CryptoError> + Send + Sync> =
        Arc::new(move |tx: &TransactionSignature| {
            verifier
                .verify(tx.message(), tx.signature(), tx.public_key(), tx.signature_type())
                .map(|valid| {
                    if valid {
                        VerificationStatus::Valid
                    } else {
                        VerificationStatus::Invalid
                    }
                })
        });
    Pipeline::new(
        settings.cpu_verifier_queue_size,
        settings.cpu_verifier_thread_count,
        compute,
    )
}
