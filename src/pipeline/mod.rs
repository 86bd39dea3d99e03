// Path: src/pipeline/mod.rs
//! The async intake pipeline: a bounded queue of batches, a single dispatcher
//! thread, and a fixed worker pool that drains each batch and resolves its
//! completion future. One `Pipeline` exists per kind of batched work (digest,
//! verify); the cryptography facade (`crate::engine`) owns both.

mod dispatcher;
mod handler;
mod pool;
mod queue;
pub mod rate_limit;

pub use handler::PipelineItem;
pub use pool::WorkerPool;

use crate::error::CryptoError;
use crate::future::{batch_future_pair, BatchFuture, BatchResolver};
use dispatcher::Dispatcher;
use handler::BatchHandler;
use queue::BoundedQueue;
use std::sync::Arc;
use std::time::Duration;

const SOFT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

struct PendingBatch<I: PipelineItem> {
    items: Vec<Arc<I>>,
    resolver: BatchResolver,
}

/// One bounded-queue → dispatcher → worker-pool pipeline, parameterized over
/// the item type it batches and bound to a single `compute` function (in
/// practice, a primitive provider's `digest`/`verify` call).
pub struct Pipeline<I: PipelineItem + 'static> {
    queue: BoundedQueue<PendingBatch<I>>,
    dispatcher: Dispatcher,
    pool: Arc<WorkerPool>,
}

impl<I: PipelineItem + 'static> Pipeline<I> {
    pub fn new(
        queue_capacity: usize,
        thread_count: usize,
        compute: Arc<dyn Fn(&I) -> Result<I::Result, CryptoError> + Send + Sync>,
    ) -> Self {
        let (queue, receiver) = BoundedQueue::new(queue_capacity);
        let pool = Arc::new(WorkerPool::new(thread_count));
        let dispatch_pool = pool.clone();
        let dispatcher = Dispatcher::start(receiver, move |batch: PendingBatch<I>| {
            let compute = compute.clone();
            dispatch_pool.spawn(move || {
                BatchHandler::new(batch.items, compute).run(batch.resolver);
            });
        });
        Pipeline {
            queue,
            dispatcher,
            pool,
        }
    }

    /// Enqueues `items` as a single batch, attaching a freshly created batch
    /// future to each item before the batch becomes visible to the
    /// dispatcher. Blocks the caller while the queue is full.
    pub fn submit(&self, items: Vec<Arc<I>>) -> Result<BatchFuture, CryptoError> {
        let (future, resolver) = batch_future_pair();
        for item in &items {
            item.attach_future(future.clone());
        }
        self.queue.push(PendingBatch { items, resolver })?;
        Ok(future)
    }

    /// Stops the dispatcher, then shuts down the worker pool (soft timeout
    /// followed by a forced drop — see `WorkerPool::shutdown`).
    pub fn shutdown(mut self) {
        self.dispatcher.stop();
        if let Ok(pool) = Arc::try_unwrap(self.pool) {
            pool.shutdown(SOFT_SHUTDOWN_TIMEOUT);
        }
    }
}
