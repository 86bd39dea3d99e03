// Path: src/provider/verify/mod.rs
//! Signature verification providers and the delegating verifier that routes
//! by signature type.

mod ecdsa;
mod eddsa;

pub use ecdsa::Secp256k1Verifier;
pub use eddsa::Ed25519Verifier;

use crate::error::CryptoError;
use crate::registry::SignatureType;

/// A signature verification algorithm: detached-signature verify over
/// `(data, signature, public_key)`.
pub trait VerifyAlgorithm {
    fn verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool, CryptoError>;
}

/// The flattened inputs of a verification work item, so both the delegating
/// verifier and its sub-verifiers share one `Input` shape.
pub struct VerifyInput<'a> {
    pub data: &'a [u8],
    pub signature: &'a [u8],
    pub public_key: &'a [u8],
}

/// Routes verification by signature type: `Ed25519` and `EcdsaSecp256k1` go to
/// their respective verifiers; any other type (including the registered but
/// unimplemented `Rsa`) is a `NoSuchAlgorithm` failure — see the design notes
/// on why RSA is never silently accepted.
pub struct DelegatingVerifier {
    ed25519: Ed25519Verifier,
    secp256k1: Secp256k1Verifier,
}

impl DelegatingVerifier {
    pub fn new() -> Self {
        DelegatingVerifier {
            ed25519: Ed25519Verifier::new(),
            secp256k1: Secp256k1Verifier::new(),
        }
    }

    /// `data` may legitimately be zero-length (e.g. RFC 8032's empty-message
    /// Ed25519 test vector); only `signature` and `public_key`, which have
    /// fixed non-zero required lengths, are rejected when empty.
    pub fn verify(
        &self,
        data: &[u8],
        signature: &[u8],
        public_key: &[u8],
        signature_type: SignatureType,
    ) -> Result<bool, CryptoError> {
        if signature.is_empty() {
            return Err(CryptoError::IllegalArgument("signature must not be empty".into()));
        }
        if public_key.is_empty() {
            return Err(CryptoError::IllegalArgument("public_key must not be empty".into()));
        }
        match signature_type {
            SignatureType::Ed25519 => self.ed25519.verify(data, signature, public_key),
            SignatureType::EcdsaSecp256k1 => self.secp256k1.verify(data, signature, public_key),
            other => Err(CryptoError::NoSuchAlgorithm(format!(
                "no verifier registered for {other}"
            ))),
        }
    }
}

impl Default for DelegatingVerifier {
    fn default() -> Self {
        DelegatingVerifier::new()
    }
}
