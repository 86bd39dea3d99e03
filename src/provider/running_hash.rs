// Path: src/provider/running_hash.rs
//! Running-hash chain provider: `H(classId, version, prev, classId, version, new)`.
//!
//! Deterministic and history-sensitive: distinct sequences of `new_hash`
//! values are overwhelmingly likely to yield distinct outputs, because each
//! step folds in the entirety of the previous output's bytes.

use super::digest::MessageDigestProvider;
use crate::error::CryptoError;
use crate::registry::DigestType;
use crate::value::Hash;

/// A fixed class id/version pair the running-hash chain tags each folded
/// hash with, so the wire form of a chained hash is unambiguous about which
/// half (previous vs. new) produced which bytes.
const RUNNING_HASH_CLASS_ID: i64 = 0x5275_6e48_6173_68; // "RunHash"
const RUNNING_HASH_VERSION: i32 = 1;

pub struct RunningHashProvider {
    inner: MessageDigestProvider,
}

impl RunningHashProvider {
    pub fn new() -> Self {
        RunningHashProvider {
            inner: MessageDigestProvider::new(),
        }
    }

    /// Folds `new_hash` onto `running_hash`, producing the next running hash.
    pub fn chain(
        &self,
        running_hash: Option<&Hash>,
        new_hash: Option<&Hash>,
        digest_type: DigestType,
    ) -> Result<Hash, CryptoError> {
        let new_hash = new_hash.ok_or_else(|| {
            CryptoError::IllegalArgument("new_hash must not be null".into())
        })?;

        let mut buf = Vec::new();
        if let Some(prev) = running_hash {
            buf.extend_from_slice(&RUNNING_HASH_CLASS_ID.to_be_bytes());
            buf.extend_from_slice(&RUNNING_HASH_VERSION.to_be_bytes());
            buf.extend_from_slice(prev.as_bytes());
        }
        buf.extend_from_slice(&RUNNING_HASH_CLASS_ID.to_be_bytes());
        buf.extend_from_slice(&RUNNING_HASH_VERSION.to_be_bytes());
        buf.extend_from_slice(new_hash.as_bytes());

        self.inner.digest(&buf, digest_type)
    }
}

impl Default for RunningHashProvider {
    fn default() -> Self {
        RunningHashProvider::new()
    }
}
