// Path: src/pipeline/queue.rs
//! Bounded blocking queue of batches. Backed by `std::sync::mpsc::sync_channel`:
//! a full queue blocks the submitter (the capacity-bounded backpressure §5
//! requires), and a disconnected receiver (the pipeline shutting down) turns a
//! blocked or future `push` into a `Cancelled` error rather than hanging
//! forever — this crate's stand-in for the source platform's cooperative
//! thread-interrupt cancellation, which has no direct Rust equivalent.

use crate::error::CryptoError;
use std::sync::mpsc::{self, Receiver, SyncSender};

pub struct BoundedQueue<T> {
    sender: SyncSender<T>,
}

impl<T> BoundedQueue<T> {
    /// Builds a queue of the given capacity, returning the submitter-facing
    /// handle and the receiver the dispatcher polls.
    pub fn new(capacity: usize) -> (BoundedQueue<T>, Receiver<T>) {
        let (sender, receiver) = mpsc::sync_channel(capacity.max(1));
        (BoundedQueue { sender }, receiver)
    }

    /// Blocks until there is room, or the receiver has been dropped.
    pub fn push(&self, item: T) -> Result<(), CryptoError> {
        self.sender.send(item).map_err(|_| CryptoError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn push_succeeds_while_capacity_remains() {
        let (queue, receiver) = BoundedQueue::new(2);
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        assert_eq!(receiver.recv().unwrap(), 1);
        assert_eq!(receiver.recv().unwrap(), 2);
    }

    #[test]
    fn push_errors_with_cancelled_once_receiver_is_dropped() {
        let (queue, receiver) = BoundedQueue::new(1);
        drop(receiver);
        let err = queue.push(1).unwrap_err();
        assert!(matches!(err, CryptoError::Cancelled));
    }

    #[test]
    fn full_queue_blocks_until_drained() {
        let (queue, receiver) = BoundedQueue::new(1);
        queue.push(1).unwrap();
        let queue = Arc::new(queue);
        let pusher = queue.clone();
        let handle = thread::spawn(move || {
            pusher.push(2).unwrap();
        });
        thread::sleep(Duration::from_millis(20));
        assert_eq!(receiver.recv().unwrap(), 1);
        handle.join().unwrap();
        assert_eq!(receiver.recv().unwrap(), 2);
    }
}
