// Path: src/pipeline/pool.rs
//! Fixed-size worker pool, one per pipeline. Grounded in the orchestration
//! layer's `Arc<rayon::ThreadPool>` sized by `num_cpus::get()`.

use crate::pipeline::rate_limit::RateLimitedLogGate;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Condvar, Mutex, OnceLock};
use std::time::{Duration, Instant};

fn shutdown_timeout_gate() -> &'static RateLimitedLogGate {
    static GATE: OnceLock<RateLimitedLogGate> = OnceLock::new();
    GATE.get_or_init(|| RateLimitedLogGate::new(Duration::from_secs(1)))
}

struct InFlight {
    count: Mutex<usize>,
    idle: Condvar,
}

/// A fixed-size `rayon` thread pool plus an in-flight job counter used to
/// implement the soft/forced shutdown sequence.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    in_flight: Arc<InFlight>,
}

impl WorkerPool {
    /// Builds a pool with `thread_count` workers (clamped to at least 1).
    pub fn new(thread_count: usize) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count.max(1))
            .build()
            .expect("failed to build pipeline worker pool");
        WorkerPool {
            pool,
            in_flight: Arc::new(InFlight {
                count: Mutex::new(0),
                idle: Condvar::new(),
            }),
        }
    }

    /// Sizes a pool to the number of available CPUs.
    pub fn sized_to_cpus() -> Self {
        WorkerPool::new(num_cpus::get())
    }

    /// Schedules `job` on the pool, tracking it as in-flight until it returns.
    pub fn spawn(&self, job: impl FnOnce() + Send + 'static) {
        let in_flight = self.in_flight.clone();
        *in_flight.count.lock().expect("pool in-flight counter poisoned") += 1;
        self.pool.spawn(move || {
            job();
            let mut count = in_flight.count.lock().expect("pool in-flight counter poisoned");
            *count -= 1;
            if *count == 0 {
                in_flight.idle.notify_all();
            }
        });
    }

    /// Waits up to `soft_timeout` for in-flight work to drain, then logs and
    /// drops the pool. `rayon::ThreadPool` has no forced-termination API, so
    /// "forced" here means: stop waiting and let the pool's own `Drop` (which
    /// blocks until each worker thread's *current* task returns) run on a
    /// background thread instead of the caller's.
    pub fn shutdown(self, soft_timeout: Duration) {
        let guard = self.in_flight.count.lock().expect("pool in-flight counter poisoned");
        let (guard, timed_out) = self
            .in_flight
            .idle
            .wait_timeout_while(guard, soft_timeout, |count| *count > 0)
            .expect("pool in-flight counter poisoned");
        if timed_out.timed_out() && *guard > 0 {
            if let Some(suppressed) = shutdown_timeout_gate().allow() {
                if suppressed > 0 {
                    log::warn!(
                        "worker pool still had {} in-flight job(s) after {:?}, forcing shutdown ({suppressed} further such warning(s) suppressed)",
                        *guard,
                        soft_timeout
                    );
                } else {
                    log::warn!(
                        "worker pool still had {} in-flight job(s) after {:?}, forcing shutdown",
                        *guard,
                        soft_timeout
                    );
                }
            }
        }
        drop(guard);
        std::thread::spawn(move || drop(self.pool));
    }
}
