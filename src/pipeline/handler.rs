// Path: src/pipeline/handler.rs
//! A batch handler: drains a batch in submission order, stamping each item's
//! result slot, and resolves the batch future once every item has been
//! attempted — whether or not every item succeeded.

use crate::future::{BatchFuture, BatchResolver};
use crate::pipeline::rate_limit::RateLimitedLogGate;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Minimum gap between consecutive "item failed"/"item panicked" log lines,
/// so a batch where every item fails or panics logs a handful of lines
/// instead of one per item.
const LOG_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(1);

fn item_failure_gate() -> &'static RateLimitedLogGate {
    static GATE: OnceLock<RateLimitedLogGate> = OnceLock::new();
    GATE.get_or_init(|| RateLimitedLogGate::new(LOG_RATE_LIMIT_WINDOW))
}

fn item_panic_gate() -> &'static RateLimitedLogGate {
    static GATE: OnceLock<RateLimitedLogGate> = OnceLock::new();
    GATE.get_or_init(|| RateLimitedLogGate::new(LOG_RATE_LIMIT_WINDOW))
}

/// A work item a pipeline can batch-process: attaches the batch's completion
/// future to itself and accepts its computed result.
pub trait PipelineItem: Send + Sync {
    type Result: Clone + Send + 'static;

    /// Attaches the future that resolves once this item's whole batch drains.
    fn attach_future(&self, future: BatchFuture);

    /// Writes the computed result into this item's result slot.
    fn stamp(&self, result: Self::Result);
}

pub struct BatchHandler<I: PipelineItem> {
    items: Vec<Arc<I>>,
    compute: Arc<dyn Fn(&I) -> Result<I::Result, crate::error::CryptoError> + Send + Sync>,
}

impl<I: PipelineItem + 'static> BatchHandler<I> {
    pub fn new(
        items: Vec<Arc<I>>,
        compute: Arc<dyn Fn(&I) -> Result<I::Result, crate::error::CryptoError> + Send + Sync>,
    ) -> Self {
        BatchHandler { items, compute }
    }

    /// Processes every item in submission order, then resolves the batch
    /// future. A per-item error or panic is logged and that item is left
    /// without a result; it does not stop the rest of the batch.
    pub fn run(self, resolver: BatchResolver) {
        for item in &self.items {
            let outcome = catch_unwind(AssertUnwindSafe(|| (self.compute)(item)));
            match outcome {
                Ok(Ok(result)) => item.stamp(result),
                Ok(Err(err)) => {
                    if let Some(suppressed) = item_failure_gate().allow() {
                        if suppressed > 0 {
                            log::warn!("pipeline item failed: {err} ({suppressed} further failure(s) suppressed)");
                        } else {
                            log::warn!("pipeline item failed: {err}");
                        }
                    }
                }
                Err(panic) => {
                    if let Some(suppressed) = item_panic_gate().allow() {
                        let message = panic_message(&panic);
                        if suppressed > 0 {
                            log::error!("pipeline item panicked: {message} ({suppressed} further panic(s) suppressed)");
                        } else {
                            log::error!("pipeline item panicked: {message}");
                        }
                    }
                }
            }
        }
        resolver.resolve();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;
    use crate::future::batch_future_pair;
    use std::sync::Mutex;

    struct Item {
        input: u32,
        result: Mutex<Option<u32>>,
    }

    impl PipelineItem for Item {
        type Result = u32;
        fn attach_future(&self, _future: crate::future::BatchFuture) {}
        fn stamp(&self, result: u32) {
            *self.result.lock().unwrap() = Some(result);
        }
    }

    #[test]
    fn stamps_every_item_and_resolves() {
        let items: Vec<Arc<Item>> = (0..3)
            .map(|n| {
                Arc::new(Item {
                    input: n,
                    result: Mutex::new(None),
                })
            })
            .collect();
        let (future, resolver) = batch_future_pair();
        let compute: Arc<dyn Fn(&Item) -> Result<u32, CryptoError> + Send + Sync> =
            Arc::new(|item: &Item| Ok(item.input * 10));
        BatchHandler::new(items.clone(), compute).run(resolver);
        assert!(future.is_done());
        for (index, item) in items.iter().enumerate() {
            assert_eq!(*item.result.lock().unwrap(), Some(index as u32 * 10));
        }
    }

    #[test]
    fn failing_item_is_skipped_without_stopping_the_batch() {
        let items: Vec<Arc<Item>> = (0..3)
            .map(|n| {
                Arc::new(Item {
                    input: n,
                    result: Mutex::new(None),
                })
            })
            .collect();
        let (future, resolver) = batch_future_pair();
        let compute: Arc<dyn Fn(&Item) -> Result<u32, CryptoError> + Send + Sync> =
            Arc::new(|item: &Item| {
                if item.input == 1 {
                    Err(CryptoError::NoSuchAlgorithm("boom".into()))
                } else {
                    Ok(item.input)
                }
            });
        BatchHandler::new(items.clone(), compute).run(resolver);
        assert!(future.is_done());
        assert_eq!(*items[0].result.lock().unwrap(), Some(0));
        assert_eq!(*items[1].result.lock().unwrap(), None);
        assert_eq!(*items[2].result.lock().unwrap(), Some(2));
    }

    #[test]
    fn panicking_item_is_caught_and_batch_still_resolves() {
        let items: Vec<Arc<Item>> = vec![Arc::new(Item {
            input: 0,
            result: Mutex::new(None),
        })];
        let (future, resolver) = batch_future_pair();
        let compute: Arc<dyn Fn(&Item) -> Result<u32, CryptoError> + Send + Sync> =
            Arc::new(|_item: &Item| panic!("simulated worker panic"));
        BatchHandler::new(items, compute).run(resolver);
        assert!(future.is_done());
    }
}
