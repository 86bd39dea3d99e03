// Path: src/pipeline/dispatcher.rs
//! The single long-running thread that polls a pipeline's queue and hands
//! batches to its worker pool. Polls with a short timeout so it notices
//! shutdown promptly without busy-waiting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct Dispatcher {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Dispatcher {
    /// Spawns the dispatcher thread. `on_batch` is invoked with each batch
    /// popped from `receiver`, in the dispatcher thread (the caller typically
    /// hands the batch straight to a worker pool and returns immediately).
    pub fn start<T: Send + 'static>(
        receiver: Receiver<T>,
        mut on_batch: impl FnMut(T) + Send + 'static,
    ) -> Dispatcher {
        let running = Arc::new(AtomicBool::new(true));
        let loop_running = running.clone();
        let handle = thread::spawn(move || loop {
            match receiver.recv_timeout(POLL_INTERVAL) {
                Ok(batch) => on_batch(batch),
                Err(RecvTimeoutError::Timeout) => {
                    if !loop_running.load(Ordering::Acquire) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        Dispatcher {
            running,
            handle: Some(handle),
        }
    }

    /// Signals the dispatcher to stop after its current poll and waits for it
    /// to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Mutex;

    #[test]
    fn dispatches_batches_in_arrival_order() {
        let (sender, receiver) = mpsc::sync_channel::<u32>(4);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let collector = seen.clone();
        let mut dispatcher = Dispatcher::start(receiver, move |value| {
            collector.lock().unwrap().push(value);
        });
        for value in 0..5 {
            sender.send(value).unwrap();
        }
        thread::sleep(Duration::from_millis(50));
        dispatcher.stop();
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn stop_joins_promptly() {
        let (_sender, receiver) = mpsc::sync_channel::<u32>(1);
        let mut dispatcher = Dispatcher::start(receiver, |_value: u32| {});
        let started = std::time::Instant::now();
        dispatcher.stop();
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
