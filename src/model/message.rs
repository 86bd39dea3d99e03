// Path: src/model/message.rs
use crate::error::CryptoError;
use crate::future::{BatchFuture, ItemFuture};
use crate::registry::DigestType;
use crate::value::Hash;
use bytes::Bytes;
use std::sync::{Arc, Mutex};

/// A digest work item: a byte payload slice plus a slot for the resulting hash
/// and a slot for the future that completes when that hash is set.
pub struct Message {
    payload: Bytes,
    offset: usize,
    length: usize,
    digest_type: DigestType,
    hash: Arc<Mutex<Option<Hash>>>,
    future: Mutex<Option<BatchFuture>>,
}

impl Message {
    /// Builds a message over `payload[offset..offset+length]`, validating the
    /// slice is in bounds.
    pub fn new(
        payload: Bytes,
        offset: usize,
        length: usize,
        digest_type: DigestType,
    ) -> Result<Message, CryptoError> {
        let end = offset
            .checked_add(length)
            .ok_or_else(|| CryptoError::IllegalArgument("message slice overflows".into()))?;
        if end > payload.len() {
            return Err(CryptoError::IllegalArgument(format!(
                "message slice [{offset}, {end}) out of bounds for payload of length {}",
                payload.len()
            )));
        }
        Ok(Message {
            payload,
            offset,
            length,
            digest_type,
            hash: Arc::new(Mutex::new(None)),
            future: Mutex::new(None),
        })
    }

    /// Convenience constructor over the whole buffer.
    pub fn whole(payload: impl Into<Bytes>, digest_type: DigestType) -> Message {
        let payload = payload.into();
        let length = payload.len();
        Message {
            payload,
            offset: 0,
            length,
            digest_type,
            hash: Arc::new(Mutex::new(None)),
            future: Mutex::new(None),
        }
    }

    /// The requested digest type.
    pub fn digest_type(&self) -> DigestType {
        self.digest_type
    }

    /// The payload slice this message covers.
    pub fn payload_slice(&self) -> &[u8] {
        &self.payload[self.offset..self.offset + self.length]
    }

    /// The hash slot's current value, if the engine has already filled it.
    pub fn hash(&self) -> Option<Hash> {
        self.hash.lock().expect("message hash slot poisoned").clone()
    }

    /// Used by the pipeline to write the computed hash.
    pub(crate) fn hash_slot(&self) -> Arc<Mutex<Option<Hash>>> {
        self.hash.clone()
    }

    /// Attaches the batch future this item was submitted with.
    pub(crate) fn attach_future(&self, future: BatchFuture) {
        *self.future.lock().expect("message future slot poisoned") = Some(future);
    }

    /// The future attached at enqueue time, if this message was submitted
    /// asynchronously.
    pub fn future(&self) -> Option<ItemFuture<Hash>> {
        self.future
            .lock()
            .expect("message future slot poisoned")
            .clone()
            .map(|batch| ItemFuture::new(self.hash.clone(), batch))
    }
}

impl crate::pipeline::PipelineItem for Message {
    type Result = Hash;

    fn attach_future(&self, future: BatchFuture) {
        Message::attach_future(self, future)
    }

    fn stamp(&self, result: Hash) {
        *self.hash.lock().expect("message hash slot poisoned") = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_bounds_slice() {
        let err = Message::new(Bytes::from_static(b"abc"), 1, 10, DigestType::Sha384).unwrap_err();
        assert!(matches!(err, CryptoError::IllegalArgument(_)));
    }

    #[test]
    fn payload_slice_respects_offset_and_length() {
        let message = Message::new(Bytes::from_static(b"abcdef"), 2, 3, DigestType::Sha384).unwrap();
        assert_eq!(message.payload_slice(), b"cde");
    }
}
