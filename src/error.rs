// Path: src/error.rs
//! Error types for the cryptography engine.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
///
/// Mirrors the error taxonomy used by the surrounding platform: every error enum
/// carries a stable code independent of the (unstable) Display message, so
/// telemetry and client error handling do not depend on message text.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised by the cryptography engine.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The requested digest or signature algorithm is unknown or unavailable.
    #[error("no such algorithm: {0}")]
    NoSuchAlgorithm(String),

    /// An algorithm name or identifier supplied at a parsing boundary was not recognized.
    #[error("invalid digest type identifier: {0}")]
    InvalidDigestType(i32),

    /// Attempted to construct a `Hash` from an all-zero buffer outside the null-hash path.
    #[error("hash value must not be all zero")]
    EmptyHashValue,

    /// Malformed serialized hash or signature encountered on deserialization.
    #[error("malformed wire data: {0}")]
    BadIo(String),

    /// A Merkle internal node was hashed while one of its children's hashes was null.
    #[error("illegal null child hash: parent class {parent_class_id} child index {child_index}")]
    IllegalChildHash {
        /// Class identifier of the parent node being hashed.
        parent_class_id: i64,
        /// Index of the child whose hash was null.
        child_index: usize,
    },

    /// A required argument was null, empty, or otherwise malformed.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// Cooperative cancellation occurred while enqueueing a batch.
    #[error("operation cancelled")]
    Cancelled,

    /// A generic failure surfaced from an underlying cryptographic library.
    #[error("cryptographic operation failed: {0}")]
    OperationFailed(String),
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoSuchAlgorithm(_) => "CRYPTO_NO_SUCH_ALGORITHM",
            Self::InvalidDigestType(_) => "CRYPTO_INVALID_DIGEST_TYPE",
            Self::EmptyHashValue => "CRYPTO_EMPTY_HASH_VALUE",
            Self::BadIo(_) => "CRYPTO_BAD_IO",
            Self::IllegalChildHash { .. } => "CRYPTO_ILLEGAL_CHILD_HASH",
            Self::IllegalArgument(_) => "CRYPTO_ILLEGAL_ARGUMENT",
            Self::Cancelled => "CRYPTO_CANCELLED",
            Self::OperationFailed(_) => "CRYPTO_OPERATION_FAILED",
        }
    }
}

impl From<dcrypt::Error> for CryptoError {
    fn from(e: dcrypt::Error) -> Self {
        CryptoError::OperationFailed(e.to_string())
    }
}
