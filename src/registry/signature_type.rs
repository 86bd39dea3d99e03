// Path: src/registry/signature_type.rs

/// Elliptic curve identifier carried by elliptic-curve signature types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveTag {
    /// Curve25519 (in its Edwards form, as used by Ed25519).
    X25519,
    /// The Koblitz curve secp256k1.
    Secp256k1,
}

impl std::fmt::Display for CurveTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CurveTag::X25519 => "x25519",
            CurveTag::Secp256k1 => "secp256k1",
        };
        f.write_str(name)
    }
}

/// A named signature scheme with a fixed signature length, a curve tag where
/// applicable, and a stable ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureType {
    /// Ed25519, 64-byte signatures over Curve25519.
    Ed25519,
    /// RSA. Registered for wire compatibility; the engine never verifies it
    /// (see `provider::verify::DelegatingVerifier`).
    Rsa,
    /// ECDSA over secp256k1, 64-byte compact (r, s) signatures.
    EcdsaSecp256k1,
}

impl SignatureType {
    /// The documented fallback used by `from_ordinal` for an unrecognized value.
    pub const DEFAULT: SignatureType = SignatureType::Rsa;

    /// The stable ordinal used on the wire.
    pub const fn ordinal(&self) -> i32 {
        match self {
            SignatureType::Ed25519 => 0,
            SignatureType::Rsa => 1,
            SignatureType::EcdsaSecp256k1 => 2,
        }
    }

    /// Label of the signing algorithm, as used in logs.
    pub const fn signing_algorithm(&self) -> &'static str {
        match self {
            SignatureType::Ed25519 => "Ed25519",
            SignatureType::Rsa => "RSASSA-PKCS1-v1_5",
            SignatureType::EcdsaSecp256k1 => "ECDSA",
        }
    }

    /// Label of the underlying key algorithm.
    pub const fn key_algorithm(&self) -> &'static str {
        match self {
            SignatureType::Ed25519 => "Ed25519",
            SignatureType::Rsa => "RSA",
            SignatureType::EcdsaSecp256k1 => "EC",
        }
    }

    /// Fixed signature length in bytes.
    pub const fn signature_length(&self) -> usize {
        match self {
            SignatureType::Ed25519 => 64,
            SignatureType::Rsa => 384,
            SignatureType::EcdsaSecp256k1 => 64,
        }
    }

    /// The elliptic curve backing this signature type, if any.
    pub const fn curve_tag(&self) -> Option<CurveTag> {
        match self {
            SignatureType::Ed25519 => Some(CurveTag::X25519),
            SignatureType::Rsa => None,
            SignatureType::EcdsaSecp256k1 => Some(CurveTag::Secp256k1),
        }
    }

    /// Looks up a signature type by its wire ordinal, falling back to `default`
    /// for any value outside the known range.
    pub fn from_ordinal(ordinal: i32, default: SignatureType) -> SignatureType {
        match ordinal {
            0 => SignatureType::Ed25519,
            1 => SignatureType::Rsa,
            2 => SignatureType::EcdsaSecp256k1,
            _ => default,
        }
    }
}

impl std::fmt::Display for SignatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.signing_algorithm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_ordinal() {
        for sig_type in [
            SignatureType::Ed25519,
            SignatureType::Rsa,
            SignatureType::EcdsaSecp256k1,
        ] {
            let ordinal = sig_type.ordinal();
            assert_eq!(
                SignatureType::from_ordinal(ordinal, SignatureType::DEFAULT),
                sig_type
            );
        }
    }

    #[test]
    fn unknown_ordinal_falls_back_to_default() {
        assert_eq!(
            SignatureType::from_ordinal(99, SignatureType::DEFAULT),
            SignatureType::Rsa
        );
        assert_eq!(
            SignatureType::from_ordinal(99, SignatureType::Ed25519),
            SignatureType::Ed25519
        );
    }

    #[test]
    fn curve_tags_match_lengths() {
        assert_eq!(SignatureType::Ed25519.signature_length(), 64);
        assert_eq!(SignatureType::EcdsaSecp256k1.signature_length(), 64);
        assert_eq!(SignatureType::Rsa.curve_tag(), None);
    }
}
