//! Dedicated fork-join pool for sort invocations
//!
//! `SortPool` owns a rayon work-stealing thread pool. Tasks submitted through
//! it may submit more tasks to the same pool from inside a worker; rayon runs
//! such nested work inline or lets the waiting worker steal it, so blocking on
//! children never holds a slot the children need.

use crate::config::{MergeStrategy, SortConfig};
use crate::error::{SortError, SortResult};
use crate::task::SortTask;
use rayon::prelude::*;
use tracing::info;

pub struct SortPool {
    pool: rayon::ThreadPool,
    threshold: usize,
    merge_strategy: MergeStrategy,
}

impl SortPool {
    /// Build a pool sized and tuned from `config`. Workers are torn down when
    /// the pool is dropped.
    pub fn new(config: &SortConfig) -> SortResult<Self> {
        config.validate()?;

        let num_threads = config.effective_thread_count();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("parsort-worker-{index}"))
            .build()
            .map_err(|e| SortError::thread_pool_error(&e.to_string()))?;

        info!(
            threads = num_threads,
            threshold = config.threshold,
            merge = %config.merge_strategy,
            "sort pool started"
        );

        Ok(Self {
            pool,
            threshold: config.threshold,
            merge_strategy: config.merge_strategy,
        })
    }

    /// Pool with default tuning and a fixed number of workers
    pub fn with_threads(num_threads: usize) -> SortResult<Self> {
        Self::new(&SortConfig::default().with_parallel_threads(Some(num_threads)))
    }

    pub fn current_num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Root task carrying this pool's threshold and merge strategy
    pub fn task<T: Ord + Send>(&self, values: Vec<T>) -> SortTask<T> {
        SortTask::new(values, self.threshold).with_merge_strategy(self.merge_strategy)
    }

    /// Sort `items` on this pool and block until the result is ready.
    /// The items are moved into a fresh work unit; the returned vector is a
    /// new allocation.
    pub fn sort<T, I>(&self, items: I) -> Vec<T>
    where
        T: Ord + Send,
        I: IntoIterator<Item = T>,
    {
        let task = self.task(items.into_iter().collect());
        self.pool.install(move || task.compute())
    }

    /// Run every task concurrently and return their results in submission
    /// order. Safe to call from a job already running on this pool.
    pub fn submit_and_await_all<T: Ord + Send>(&self, tasks: Vec<SortTask<T>>) -> Vec<Vec<T>> {
        self.pool
            .install(move || tasks.into_par_iter().map(SortTask::compute).collect())
    }

    /// Execute `op` on one of this pool's workers
    pub fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for SortPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortPool")
            .field("threads", &self.pool.current_num_threads())
            .field("threshold", &self.threshold)
            .field("merge_strategy", &self.merge_strategy)
            .finish()
    }
}
