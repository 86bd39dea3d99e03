// Path: src/wire.rs
//! Byte-exact wire formats for hashes and signatures.
//!
//! Hash:      `[digest_type_id: i32 BE][length: i32 BE][bytes]`
//! Signature: `[ordinal: i32 BE][length: i32 BE][bytes]`

use crate::error::CryptoError;
use crate::registry::{DigestType, SignatureType};
use crate::value::{Hash, Signature};

/// Encodes a hash in its on-wire form.
pub fn encode_hash(hash: &Hash) -> Vec<u8> {
    let bytes = hash.as_bytes();
    let mut out = Vec::with_capacity(8 + bytes.len());
    out.extend_from_slice(&hash.digest_type().identifier().to_be_bytes());
    out.extend_from_slice(&(bytes.len() as i32).to_be_bytes());
    out.extend_from_slice(bytes);
    out
}

/// Decodes a hash from its on-wire form. The declared length must equal the
/// digest type's required output length, or `BadIo` is raised.
pub fn decode_hash(buf: &[u8]) -> Result<Hash, CryptoError> {
    let mut reader = Reader::new(buf);
    let digest_type_id = reader.read_i32_be()?;
    let len = reader.read_i32_be()?;
    let digest_type = DigestType::from_identifier(digest_type_id)
        .map_err(|_| CryptoError::BadIo(format!("unknown digest type id {digest_type_id}")))?;
    if len < 0 || len as usize != digest_type.output_length() {
        return Err(CryptoError::BadIo(format!(
            "declared hash length {len} does not match {digest_type}'s output length {}",
            digest_type.output_length()
        )));
    }
    let bytes = reader.read_exact(len as usize)?;
    Hash::new(digest_type, bytes)
}

/// Encodes a signature in its on-wire form.
pub fn encode_signature(signature: &Signature) -> Vec<u8> {
    let bytes = signature.as_bytes();
    let mut out = Vec::with_capacity(8 + bytes.len());
    out.extend_from_slice(&signature.signature_type().ordinal().to_be_bytes());
    out.extend_from_slice(&(bytes.len() as i32).to_be_bytes());
    out.extend_from_slice(bytes);
    out
}

/// Decodes a signature from its on-wire form. An unknown ordinal decodes to
/// `SignatureType::DEFAULT` (RSA), per the documented fallback.
pub fn decode_signature(buf: &[u8]) -> Result<Signature, CryptoError> {
    let mut reader = Reader::new(buf);
    let ordinal = reader.read_i32_be()?;
    let len = reader.read_i32_be()?;
    let signature_type = SignatureType::from_ordinal(ordinal, SignatureType::DEFAULT);
    if len < 0 || len as usize != signature_type.signature_length() {
        return Err(CryptoError::BadIo(format!(
            "declared signature length {len} does not match {signature_type}'s length {}",
            signature_type.signature_length()
        )));
    }
    let bytes = reader.read_exact(len as usize)?;
    Signature::new(signature_type, bytes)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, CryptoError> {
        let end = self
            .pos
            .checked_add(n)
            .ok_or_else(|| CryptoError::BadIo("length overflow".into()))?;
        let slice = self
            .buf
            .get(self.pos..end)
            .ok_or_else(|| CryptoError::BadIo("buffer too short".into()))?;
        self.pos = end;
        Ok(slice.to_vec())
    }

    fn read_i32_be(&mut self) -> Result<i32, CryptoError> {
        let bytes = self.read_exact(4)?;
        Ok(i32::from_be_bytes(
            bytes
                .try_into()
                .map_err(|_| CryptoError::BadIo("short int32".into()))?,
        ))
    }
}
