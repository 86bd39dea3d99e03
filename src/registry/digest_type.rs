// Path: src/registry/digest_type.rs
use crate::error::CryptoError;

/// A named hash function with a fixed output length and a stable on-wire identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DigestType {
    /// SHA-384, 48-byte output.
    Sha384,
    /// SHA-512, 64-byte output.
    Sha512,
}

impl DigestType {
    /// All known variants, in ascending identifier order.
    pub const ALL: [DigestType; 2] = [DigestType::Sha384, DigestType::Sha512];

    /// The stable wire identifier for this digest type.
    pub const fn identifier(&self) -> i32 {
        match self {
            DigestType::Sha384 => 1,
            DigestType::Sha512 => 2,
        }
    }

    /// Canonical algorithm name, as used in logs and error messages.
    pub const fn algorithm_name(&self) -> &'static str {
        match self {
            DigestType::Sha384 => "SHA-384",
            DigestType::Sha512 => "SHA-512",
        }
    }

    /// Fixed output length in bytes.
    pub const fn output_length(&self) -> usize {
        match self {
            DigestType::Sha384 => 48,
            DigestType::Sha512 => 64,
        }
    }

    /// The largest output length across all known digest types, used to size
    /// scratch buffers (e.g. the null-hash cache).
    pub fn max_output_length() -> usize {
        Self::ALL.iter().map(DigestType::output_length).max().unwrap_or(0)
    }

    /// Looks up a digest type by its wire identifier in O(1).
    pub fn from_identifier(id: i32) -> Result<DigestType, CryptoError> {
        match id {
            1 => Ok(DigestType::Sha384),
            2 => Ok(DigestType::Sha512),
            other => Err(CryptoError::InvalidDigestType(other)),
        }
    }
}

impl std::fmt::Display for DigestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.algorithm_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_identifier() {
        for digest_type in DigestType::ALL {
            let id = digest_type.identifier();
            assert_eq!(DigestType::from_identifier(id).unwrap(), digest_type);
        }
    }

    #[test]
    fn rejects_unknown_identifier() {
        assert!(matches!(
            DigestType::from_identifier(99),
            Err(CryptoError::InvalidDigestType(99))
        ));
    }

    #[test]
    fn max_output_length_is_sha512() {
        assert_eq!(DigestType::max_output_length(), 64);
    }

    #[test]
    fn identifiers_are_unique() {
        let mut ids: Vec<i32> = DigestType::ALL.iter().map(DigestType::identifier).collect();
        ids.sort_unstable();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped, "duplicate digest type identifier");
    }
}
