//! Configuration management for parallel sort runs

use crate::error::{SortError, SortResult};
use std::str::FromStr;

/// Largest work unit sorted directly without forking
pub const DEFAULT_THRESHOLD: usize = 10;

/// Upper bound on worker threads for a dedicated pool
pub const MAX_THREADS: usize = 1024;

/// How two sorted halves are combined after a fork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Stable two-way merge of the already sorted halves
    #[default]
    Linear,
    /// Concatenate both halves and run one stable sort pass over the result
    Resort,
}

/// Main configuration structure for sort operations
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// Maximum work unit size eligible for direct sequential sorting
    pub threshold: usize,
    /// Merge step used by non-leaf tasks
    pub merge_strategy: MergeStrategy,
    /// Number of worker threads (defaults to the number of CPUs)
    pub parallel_threads: Option<usize>,
    /// Debug mode (raises log verbosity)
    pub debug: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            merge_strategy: MergeStrategy::default(),
            parallel_threads: None,
            debug: false,
        }
    }
}

impl SortConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = strategy;
        self
    }

    /// Set parallel threads
    pub fn with_parallel_threads(mut self, threads: Option<usize>) -> Self {
        self.parallel_threads = threads;
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> SortResult<()> {
        // A zero threshold would keep splitting single-element work units
        if self.threshold == 0 {
            return Err(SortError::invalid_threshold(
                "threshold must be at least 1",
            ));
        }

        if let Some(threads) = self.parallel_threads {
            if threads == 0 {
                return Err(SortError::invalid_thread_count(
                    "thread count must be positive",
                ));
            }
            if threads > MAX_THREADS {
                return Err(SortError::invalid_thread_count(&format!(
                    "too many threads (maximum {MAX_THREADS})"
                )));
            }
        }

        Ok(())
    }

    /// Get effective thread count
    pub fn effective_thread_count(&self) -> usize {
        self.parallel_threads.unwrap_or_else(num_cpus::get)
    }
}

impl FromStr for MergeStrategy {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(MergeStrategy::Linear),
            "resort" => Ok(MergeStrategy::Resort),
            _ => Err(SortError::invalid_merge_strategy(s)),
        }
    }
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MergeStrategy::Linear => "linear",
            MergeStrategy::Resort => "resort",
        };
        write!(f, "{name}")
    }
}

/// Builder pattern for creating configurations
pub struct SortConfigBuilder {
    config: SortConfig,
}

impl SortConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: SortConfig::default(),
        }
    }

    pub fn threshold(mut self, threshold: usize) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.config.merge_strategy = strategy;
        self
    }

    pub fn parallel_threads(mut self, threads: usize) -> Self {
        self.config.parallel_threads = Some(threads);
        self
    }

    pub fn debug(mut self) -> Self {
        self.config.debug = true;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> SortResult<SortConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SortConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
