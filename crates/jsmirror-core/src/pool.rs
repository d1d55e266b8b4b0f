//! Bounded-concurrency task pool.
//!
//! Runs one async worker per input item while never letting more than
//! `concurrency` of them be in flight. Results come back in input order and
//! a failing worker is just an `Err` in its slot; siblings keep going.
//!
//! ```ignore
//! let pool = TaskPool::new(NonZeroUsize::new(6).unwrap());
//! let results = pool
//!     .run(urls, |url| async move { transfer.fetch_bytes(&url).await })
//!     .await;
//! assert_eq!(results.len(), urls_len);
//! ```

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;

use crate::error::ConfigError;

/// Default number of operations in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Bounded-concurrency executor for independent async operations.
///
/// Holds no tasks between calls to [`TaskPool::run`]; only the counters
/// persist so callers can inspect how a run behaved.
#[derive(Debug)]
pub struct TaskPool {
    concurrency: NonZeroUsize,

    /// Times submission waited for an in-flight task to finish
    suspensions: AtomicUsize,

    /// Widest in-flight set observed
    peak_in_flight: AtomicUsize,
}

impl TaskPool {
    pub const fn new(concurrency: NonZeroUsize) -> Self {
        Self {
            concurrency,
            suspensions: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Create a pool from a plain count, rejecting zero.
    pub fn with_concurrency(concurrency: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(concurrency)
            .map(Self::new)
            .ok_or(ConfigError::InvalidConcurrency { value: concurrency })
    }

    pub const fn concurrency(&self) -> NonZeroUsize {
        self.concurrency
    }

    /// Number of times submission has been suspended waiting for capacity.
    pub fn suspensions(&self) -> usize {
        self.suspensions.load(Ordering::Relaxed)
    }

    /// Peak number of tasks in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    /// Run `worker` over every item with at most `concurrency` in flight.
    ///
    /// The i-th result belongs to the i-th item regardless of completion
    /// order. Workers are submitted in input order; once the in-flight set is
    /// full, submission waits for any task to complete before continuing.
    pub async fn run<T, R, E, F, Fut>(
        &self,
        items: impl IntoIterator<Item = T>,
        worker: F,
    ) -> Vec<Result<R, E>>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let cap = self.concurrency.get();
        let mut in_flight = FuturesUnordered::new();
        let mut slots: Vec<Option<Result<R, E>>> = Vec::new();

        for (index, item) in items.into_iter().enumerate() {
            if in_flight.len() >= cap {
                self.suspensions.fetch_add(1, Ordering::Relaxed);
                if let Some((done, result)) = in_flight.next().await {
                    slots[done] = Some(result);
                }
            }

            let task = worker(item);
            in_flight.push(async move { (index, task.await) });
            slots.push(None);
            self.peak_in_flight
                .fetch_max(in_flight.len(), Ordering::Relaxed);
        }

        while let Some((done, result)) = in_flight.next().await {
            slots[done] = Some(result);
        }

        // Every slot is filled: each pushed future is yielded exactly once.
        slots.into_iter().flatten().collect()
    }
}

impl Default for TaskPool {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_CONCURRENCY).unwrap_or(NonZeroUsize::MIN))
    }
}
