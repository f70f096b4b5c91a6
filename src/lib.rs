//! Parallel divide-and-conquer sorting in Rust
//!
//! Work is split recursively into halves until each piece is at or below a
//! threshold, small pieces are sorted sequentially, and sorted halves are
//! merged back together. Forks run on a rayon work-stealing pool, either the
//! lazily created process-wide pool ([`parallel_sort`]) or an explicitly
//! constructed [`SortPool`].

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod input;
pub mod pool;
pub mod task;

use std::path::Path;
use tracing::{debug, info};

// Re-export commonly used types
pub use config::{MergeStrategy, SortConfig, SortConfigBuilder, DEFAULT_THRESHOLD};
pub use error::{SortError, SortResult};
pub use pool::SortPool;
pub use task::{merge_sorted, SortTask, TaskStats};

/// Exit codes of the `parsort` binary
pub const EXIT_SUCCESS: i32 = 0;
pub const INSUFFICIENT_ARGUMENTS: i32 = 1;
pub const FILE_NOT_FOUND: i32 = 2;
pub const SOURCE_FILE_READ_ERROR: i32 = 3;
pub const INTERNAL_FAILURE: i32 = 4;
pub const OUTPUT_WRITE_ERROR: i32 = 5;

/// Sort `items` ascending on rayon's global pool using the default threshold.
///
/// Blocks until the sort completes and returns a newly allocated vector with
/// exactly the input's elements.
pub fn parallel_sort<T, I>(items: I) -> Vec<T>
where
    T: Ord + Send,
    I: IntoIterator<Item = T>,
{
    SortTask::from_values(items).compute()
}

/// Read the data lines of `path` and sort them on a pool built from `config`
pub fn sort_file(config: &SortConfig, path: &Path) -> SortResult<Vec<String>> {
    let values = input::read_values(path)?;
    debug!(count = values.len(), "the initial (unsorted) values are: {:?}", values);

    let pool = SortPool::new(config)?;
    let sorted = pool.sort(values);
    info!(count = sorted.len(), source = %path.display(), "sorted values");
    Ok(sorted)
}
