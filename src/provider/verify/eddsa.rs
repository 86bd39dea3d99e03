// Path: src/provider/verify/eddsa.rs
use super::VerifyAlgorithm;
use crate::error::CryptoError;
use crate::provider::ThreadLocalAlgorithmCache;
use dcrypt::sign::eddsa;

/// Detached Ed25519 signature verification. Logs a debug-level record with
/// the hex-encoded public key and signature on any verification failure.
pub struct Ed25519Verifier {
    cache: ThreadLocalAlgorithmCache<()>,
}

impl Ed25519Verifier {
    pub fn new() -> Self {
        Ed25519Verifier {
            cache: ThreadLocalAlgorithmCache::new(),
        }
    }

    pub fn verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool, CryptoError> {
        self.cache.with(0, || Ok(()), |_| {
            let pk = eddsa::Ed25519PublicKey::from_bytes(public_key)
                .map_err(|e| CryptoError::IllegalArgument(format!("invalid Ed25519 public key: {e:?}")))?;
            let sig = eddsa::Ed25519Signature::from_bytes(signature)
                .map_err(|e| CryptoError::IllegalArgument(format!("invalid Ed25519 signature: {e:?}")))?;
            match eddsa::Ed25519::verify(data, &sig, &pk) {
                Ok(()) => Ok(true),
                Err(_) => {
                    log::debug!(
                        "Ed25519 verification failed: public_key={} signature={}",
                        hex_upper(public_key),
                        hex_upper(signature)
                    );
                    Ok(false)
                }
            }
        })
    }
}

impl Default for Ed25519Verifier {
    fn default() -> Self {
        Ed25519Verifier::new()
    }
}

impl VerifyAlgorithm for Ed25519Verifier {
    fn verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool, CryptoError> {
        Ed25519Verifier::verify(self, data, signature, public_key)
    }
}

fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}
