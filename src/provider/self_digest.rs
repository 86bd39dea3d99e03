// Path: src/provider/self_digest.rs
//! Self-serializable digest provider: hashes an item's own canonical byte
//! form (class identifier, version, then payload) through a hashing stream
//! that can optionally tee the same bytes to a downstream writer.

use super::digest::MessageDigestProvider;
use crate::error::CryptoError;
use crate::registry::DigestType;
use crate::value::Hash;
use std::io::{self, Write};

/// An item that can serialize itself into the canonical byte form the engine
/// hashes (class id, version, then payload).
pub trait SelfSerializable {
    /// Application-defined class identifier, written first.
    fn class_id(&self) -> i64;
    /// Application-defined version, written second.
    fn version(&self) -> i32;
    /// Writes the item's payload bytes (everything after class id/version).
    fn write_payload(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// A `Write` sink that forwards every byte to an internal accumulator (later
/// digested as one slice — `dcrypt`'s digest functions are one-shot) and,
/// optionally, to a downstream writer.
///
/// Zero-length writes are no-ops in both `write` and `write_u8`.
pub struct HashingStream<'a> {
    accumulated: Vec<u8>,
    downstream: Option<&'a mut dyn Write>,
}

impl<'a> HashingStream<'a> {
    pub fn new() -> Self {
        HashingStream {
            accumulated: Vec::new(),
            downstream: None,
        }
    }

    pub fn with_downstream(downstream: &'a mut dyn Write) -> Self {
        HashingStream {
            accumulated: Vec::new(),
            downstream: Some(downstream),
        }
    }

    pub fn write_u8(&mut self, byte: u8) -> io::Result<()> {
        self.write_all(&[byte])
    }

    fn into_bytes(self) -> Vec<u8> {
        self.accumulated
    }
}

impl<'a> Default for HashingStream<'a> {
    fn default() -> Self {
        HashingStream::new()
    }
}

impl<'a> Write for HashingStream<'a> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.accumulated.extend_from_slice(buf);
        if let Some(downstream) = self.downstream.as_mut() {
            downstream.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(downstream) = self.downstream.as_mut() {
            downstream.flush()?;
        }
        Ok(())
    }
}

/// Hashes a `SelfSerializable` item's canonical byte form.
pub struct SelfSerializableDigestProvider {
    inner: MessageDigestProvider,
}

impl SelfSerializableDigestProvider {
    pub fn new() -> Self {
        SelfSerializableDigestProvider {
            inner: MessageDigestProvider::new(),
        }
    }

    /// Hashes `item`'s canonical byte form. `downstream`, if given, receives
    /// the same bytes as they are written (e.g. to serialize and hash an
    /// item in one pass).
    pub fn digest(
        &self,
        item: &dyn SelfSerializable,
        digest_type: DigestType,
        downstream: Option<&mut dyn Write>,
    ) -> Result<Hash, CryptoError> {
        let mut stream = match downstream {
            Some(w) => HashingStream::with_downstream(w),
            None => HashingStream::new(),
        };
        stream
            .write_all(&item.class_id().to_be_bytes())
            .map_err(|e| CryptoError::OperationFailed(e.to_string()))?;
        stream
            .write_all(&item.version().to_be_bytes())
            .map_err(|e| CryptoError::OperationFailed(e.to_string()))?;
        item.write_payload(&mut stream)
            .map_err(|e| CryptoError::OperationFailed(e.to_string()))?;
        let bytes = stream.into_bytes();
        self.inner.digest(&bytes, digest_type)
    }
}

impl Default for SelfSerializableDigestProvider {
    fn default() -> Self {
        SelfSerializableDigestProvider::new()
    }
}
