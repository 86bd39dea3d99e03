// Path: src/provider/verify/ecdsa.rs
use super::VerifyAlgorithm;
use crate::error::CryptoError;
use crate::provider::ThreadLocalAlgorithmCache;
use k256::ecdsa::signature::Verifier;
use k256::ecdsa::{Signature, VerifyingKey};

/// ECDSA signature verification over secp256k1, compact (r, s) signatures
/// and SEC1-encoded public keys (compressed or uncompressed).
pub struct Secp256k1Verifier {
    cache: ThreadLocalAlgorithmCache<()>,
}

impl Secp256k1Verifier {
    pub fn new() -> Self {
        Secp256k1Verifier {
            cache: ThreadLocalAlgorithmCache::new(),
        }
    }

    pub fn verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool, CryptoError> {
        self.cache.with(0, || Ok(()), |_| {
            let verifying_key = VerifyingKey::from_sec1_bytes(public_key)
                .map_err(|e| CryptoError::IllegalArgument(format!("invalid secp256k1 public key: {e}")))?;
            let sig = Signature::from_slice(signature)
                .map_err(|e| CryptoError::IllegalArgument(format!("invalid secp256k1 signature: {e}")))?;
            match verifying_key.verify(data, &sig) {
                Ok(()) => Ok(true),
                Err(_) => {
                    log::debug!(
                        "ECDSA secp256k1 verification failed: public_key={} signature={}",
                        hex_upper(public_key),
                        hex_upper(signature)
                    );
                    Ok(false)
                }
            }
        })
    }
}

impl Default for Secp256k1Verifier {
    fn default() -> Self {
        Secp256k1Verifier::new()
    }
}

impl VerifyAlgorithm for Secp256k1Verifier {
    fn verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool, CryptoError> {
        Secp256k1Verifier::verify(self, data, signature, public_key)
    }
}

fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}
