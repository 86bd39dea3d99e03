// Path: src/provider/digest.rs
//! Message digest provider: hashes a raw byte slice under a requested digest
//! type, via a per-thread cached digest handle.

use super::{OperationProvider, ThreadLocalAlgorithmCache};
use crate::error::CryptoError;
use crate::registry::DigestType;
use crate::value::Hash;
use dcrypt::algorithms::hash::sha2::{Sha384 as DcryptSha384, Sha512 as DcryptSha512};
use dcrypt::algorithms::hash::HashFunction as DcryptHashFunction;
use dcrypt::algorithms::ByteSerializable;

/// A loaded digest handle. Construction is trivial here, but the type exists
/// so the cache models the same "expensive to (re)construct, not safe to
/// share across threads" primitive instance the underlying library exposes
/// for other algorithms (e.g. Ed25519 signing contexts).
#[derive(Clone, Copy)]
pub struct DigestHandle(DigestType);

impl DigestHandle {
    fn digest(&self, bytes: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self.0 {
            DigestType::Sha384 => {
                let out = DcryptSha384::digest(bytes).map_err(dcrypt::Error::from)?;
                Ok(out.to_bytes())
            }
            DigestType::Sha512 => {
                let out = DcryptSha512::digest(bytes).map_err(dcrypt::Error::from)?;
                Ok(out.to_bytes())
            }
        }
    }
}

/// Computes `Hash::new(digest_type, digest(payload))` for a raw byte slice,
/// caching the loaded digest handle per thread.
pub struct MessageDigestProvider {
    cache: ThreadLocalAlgorithmCache<DigestHandle>,
}

impl MessageDigestProvider {
    pub fn new() -> Self {
        MessageDigestProvider {
            cache: ThreadLocalAlgorithmCache::new(),
        }
    }

    /// Hashes `payload`, reusing this thread's cached handle for `digest_type`.
    pub fn digest(&self, payload: &[u8], digest_type: DigestType) -> Result<Hash, CryptoError> {
        self.cache.with(
            digest_type.identifier(),
            || self.load_algorithm(digest_type),
            |handle| self.handle_item(handle, digest_type, payload, &()),
        )
    }
}

impl Default for MessageDigestProvider {
    fn default() -> Self {
        MessageDigestProvider::new()
    }
}

impl OperationProvider for MessageDigestProvider {
    type Input = [u8];
    type Aux = ();
    type Output = Hash;
    type Algorithm = DigestHandle;
    type AlgorithmType = DigestType;

    fn load_algorithm(&self, algorithm_type: DigestType) -> Result<DigestHandle, CryptoError> {
        Ok(DigestHandle(algorithm_type))
    }

    fn handle_item(
        &self,
        algorithm: &mut DigestHandle,
        algorithm_type: DigestType,
        input: &[u8],
        _aux: &(),
    ) -> Result<Hash, CryptoError> {
        let bytes = algorithm.digest(input)?;
        Hash::new(algorithm_type, bytes)
    }
}
