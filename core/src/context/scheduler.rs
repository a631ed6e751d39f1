//! Bounded-concurrency chunk execution.
//!
//! A fixed pool of workers gated by a semaphore: submission waits while
//! the pool is at capacity, shutdown drains in-flight work without
//! cancelling it. A failure inside a worker is caught at the worker
//! boundary and the chunk abandoned; creature state is cumulative, so the
//! next chunk re-syncs naturally.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Decrements the active-worker count on every exit path, panics included.
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ChunkScheduler {
    capacity: usize,
    semaphore: Arc<Semaphore>,
    active: Arc<AtomicUsize>,
    workers: JoinSet<()>,
}

impl ChunkScheduler {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
            active: Arc::new(AtomicUsize::new(0)),
            workers: JoinSet::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Workers admitted and not yet finished.
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Run `job` over `chunk` on the pool. Waits while the pool is at
    /// capacity; returns once the worker is admitted, not once it
    /// finishes.
    pub async fn process_async<F>(&mut self, chunk: Vec<String>, job: F)
    where
        F: FnOnce(&[String]) + Send + 'static,
    {
        if chunk.is_empty() {
            return;
        }

        // Reap finished workers so the set does not grow unbounded
        while self.workers.try_join_next().is_some() {}

        let Ok(permit) = Arc::clone(&self.semaphore).acquire_owned().await else {
            // The semaphore closes only when dropped
            return;
        };

        self.active.fetch_add(1, Ordering::SeqCst);
        let guard = ActiveGuard(Arc::clone(&self.active));
        let started = Instant::now();
        let line_count = chunk.len();

        self.workers.spawn(async move {
            let _permit = permit;
            let _guard = guard;
            if catch_unwind(AssertUnwindSafe(|| job(&chunk))).is_err() {
                tracing::error!(line_count, "chunk worker failed, chunk abandoned");
            }
            crate::debug_log!(
                "worker done: {} lines in {:?}",
                line_count,
                started.elapsed()
            );
        });
    }

    /// Block until every outstanding worker finishes. Drain, not cancel.
    pub async fn shutdown(&mut self) {
        while self.workers.join_next().await.is_some() {}
    }
}
