// Path: src/model/tx_signature.rs
use crate::error::CryptoError;
use crate::future::{BatchFuture, ItemFuture};
use crate::registry::SignatureType;
use bytes::Bytes;
use std::sync::{Arc, Mutex};

/// Result of verifying a transaction signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Not yet verified.
    Unknown,
    /// Verified and found valid.
    Valid,
    /// Verified and found invalid.
    Invalid,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            VerificationStatus::Unknown => "UNKNOWN",
            VerificationStatus::Valid => "VALID",
            VerificationStatus::Invalid => "INVALID",
        };
        f.write_str(label)
    }
}

/// A verification work item: a single flat buffer packing `message`,
/// `signature`, and `public_key` contiguously, described by offset/length
/// pairs, plus the signature type, a verification status slot, and a
/// completion future.
///
/// An optional "expanded public key" buffer overrides the payload's public
/// key slice — some signature schemes need a derived/decompressed key that
/// does not live contiguously with the rest of the payload.
pub struct TransactionSignature {
    payload: Bytes,
    sig_off: u32,
    sig_len: u32,
    pk_off: u32,
    pk_len: u32,
    msg_off: u32,
    msg_len: u32,
    expanded_public_key: Option<Bytes>,
    signature_type: SignatureType,
    status: Arc<Mutex<Option<VerificationStatus>>>,
    future: Mutex<Option<BatchFuture>>,
}

impl TransactionSignature {
    /// Builds a transaction signature work item over a flat buffer, validating
    /// that the three described ranges are disjoint and in-bounds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        payload: Bytes,
        sig_off: u32,
        sig_len: u32,
        pk_off: u32,
        pk_len: u32,
        msg_off: u32,
        msg_len: u32,
        expanded_public_key: Option<Bytes>,
        signature_type: SignatureType,
    ) -> Result<TransactionSignature, CryptoError> {
        let ranges = [
            (sig_off, sig_len, "signature"),
            (pk_off, pk_len, "public key"),
            (msg_off, msg_len, "message"),
        ];
        let mut spans: Vec<(u32, u32)> = Vec::with_capacity(3);
        for (off, len, label) in ranges {
            let end = off
                .checked_add(len)
                .ok_or_else(|| CryptoError::IllegalArgument(format!("{label} range overflows")))?;
            if end as usize > payload.len() {
                return Err(CryptoError::IllegalArgument(format!(
                    "{label} range [{off}, {end}) out of bounds for payload of length {}",
                    payload.len()
                )));
            }
            spans.push((off, end));
        }
        spans.sort_unstable();
        for window in spans.windows(2) {
            if window[0].1 > window[1].0 {
                return Err(CryptoError::IllegalArgument(
                    "signature, public key, and message ranges must be disjoint".into(),
                ));
            }
        }
        Ok(TransactionSignature {
            payload,
            sig_off,
            sig_len,
            pk_off,
            pk_len,
            msg_off,
            msg_len,
            expanded_public_key,
            signature_type,
            status: Arc::new(Mutex::new(None)),
            future: Mutex::new(None),
        })
    }

    /// The signature scheme to verify under.
    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    /// The message slice.
    pub fn message(&self) -> &[u8] {
        self.slice(self.msg_off, self.msg_len)
    }

    /// The signature slice.
    pub fn signature(&self) -> &[u8] {
        self.slice(self.sig_off, self.sig_len)
    }

    /// The public-key slice: the expanded buffer if one was supplied,
    /// otherwise the payload's own public-key range.
    pub fn public_key(&self) -> &[u8] {
        match &self.expanded_public_key {
            Some(expanded) => expanded,
            None => self.slice(self.pk_off, self.pk_len),
        }
    }

    fn slice(&self, off: u32, len: u32) -> &[u8] {
        &self.payload[off as usize..(off + len) as usize]
    }

    /// The current verification status.
    pub fn status(&self) -> VerificationStatus {
        self.status
            .lock()
            .expect("verification status slot poisoned")
            .unwrap_or(VerificationStatus::Unknown)
    }

    /// Used by the pipeline to write the verification result.
    pub(crate) fn status_slot(&self) -> Arc<Mutex<Option<VerificationStatus>>> {
        self.status.clone()
    }

    /// Attaches the batch future this item was submitted with.
    pub(crate) fn attach_future(&self, future: BatchFuture) {
        *self.future.lock().expect("tx signature future slot poisoned") = Some(future);
    }

    /// The future attached at enqueue time, if this item was submitted
    /// asynchronously.
    pub fn future(&self) -> Option<ItemFuture<VerificationStatus>> {
        self.future
            .lock()
            .expect("tx signature future slot poisoned")
            .clone()
            .map(|batch| ItemFuture::new(self.status.clone(), batch))
    }
}

impl crate::pipeline::PipelineItem for TransactionSignature {
    type Result = VerificationStatus;

    fn attach_future(&self, future: BatchFuture) {
        TransactionSignature::attach_future(self, future)
    }

    fn stamp(&self, result: VerificationStatus) {
        *self.status.lock().expect("verification status slot poisoned") = Some(result);
    }
}
