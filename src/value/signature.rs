// Path: src/value/signature.rs
use crate::error::CryptoError;
use crate::registry::SignatureType;

/// A signature-type tag plus an owned byte sequence of the tag's fixed length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    signature_type: SignatureType,
    bytes: Vec<u8>,
}

impl Signature {
    /// Builds a signature, validating length against the signature type's
    /// declared fixed length.
    pub fn new(signature_type: SignatureType, bytes: Vec<u8>) -> Result<Signature, CryptoError> {
        if bytes.len() != signature_type.signature_length() {
            return Err(CryptoError::BadIo(format!(
                "{} signature must be {} bytes, got {}",
                signature_type,
                signature_type.signature_length(),
                bytes.len()
            )));
        }
        Ok(Signature {
            signature_type,
            bytes,
        })
    }

    /// The signature scheme this value was produced under.
    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    /// Borrowed view of the signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let err = Signature::new(SignatureType::Ed25519, vec![0u8; 10]).unwrap_err();
        assert!(matches!(err, CryptoError::BadIo(_)));
    }

    #[test]
    fn accepts_correct_length() {
        let sig = Signature::new(SignatureType::Ed25519, vec![7u8; 64]).unwrap();
        assert_eq!(sig.as_bytes().len(), 64);
    }
}
