// Path: src/value/hash.rs
use crate::error::CryptoError;
use crate::registry::DigestType;
use std::cmp::Ordering;
use std::fmt;

/// An immutable digest value paired with its digest type.
///
/// Two hashes are equal iff their digest-type identifiers and bytes are equal.
/// Ordering is total: first by digest-type identifier, then lexicographically
/// on bytes.
#[derive(Debug, Clone)]
pub struct Hash {
    digest_type: DigestType,
    bytes: Vec<u8>,
}

impl Hash {
    /// Builds a hash from owned bytes, validating length against `digest_type`'s
    /// declared output length and rejecting all-zero content.
    pub fn new(digest_type: DigestType, bytes: Vec<u8>) -> Result<Hash, CryptoError> {
        if bytes.len() != digest_type.output_length() {
            return Err(CryptoError::BadIo(format!(
                "{} hash must be {} bytes, got {}",
                digest_type,
                digest_type.output_length(),
                bytes.len()
            )));
        }
        if bytes.iter().all(|b| *b == 0) {
            return Err(CryptoError::EmptyHashValue);
        }
        Ok(Hash { digest_type, bytes })
    }

    /// Builds a hash without the all-zero check. Reserved for the engine's
    /// null-hash cache (`crate::null_hash`); not exposed outside the crate.
    pub(crate) fn new_unchecked(digest_type: DigestType, bytes: Vec<u8>) -> Hash {
        debug_assert_eq!(bytes.len(), digest_type.output_length());
        Hash { digest_type, bytes }
    }

    /// The digest type this hash was produced under.
    pub fn digest_type(&self) -> DigestType {
        self.digest_type
    }

    /// Borrowed view of the hash bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A defensive copy of the hash bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Uppercase hex rendering, as returned by `Display`.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02X}", b)).collect()
    }

    /// True if this hash is the all-zero placeholder for the given digest type.
    pub fn is_null(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl PartialEq for Hash {
    fn eq(&self, other: &Self) -> bool {
        self.digest_type == other.digest_type && self.bytes == other.bytes
    }
}

impl Eq for Hash {}

impl std::hash::Hash for Hash {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.digest_type.hash(state);
        self.bytes.hash(state);
    }
}

impl PartialOrd for Hash {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hash {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digest_type
            .identifier()
            .cmp(&other.digest_type.identifier())
            .then_with(|| self.bytes.cmp(&other.bytes))
    }
}
