//! Recursive fork-join sorting task
//!
//! A [`SortTask`] owns one work unit. Work units at or below the threshold are
//! sorted in place on the current thread; larger ones are split at the midpoint
//! into two child tasks that run through `rayon::join`. A parent waiting in
//! `join` keeps executing queued jobs from its own deque (or steals from other
//! workers), so nested forks never starve the pool even when it has a single
//! thread.

use crate::config::{MergeStrategy, DEFAULT_THRESHOLD};
use itertools::Itertools;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Counters shared by every task of one sort invocation
#[derive(Debug, Default)]
pub struct TaskStats {
    splits: AtomicUsize,
    leaves: AtomicUsize,
}

impl TaskStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks that forked two children
    pub fn splits(&self) -> usize {
        self.splits.load(Ordering::Relaxed)
    }

    /// Number of tasks that sorted their work unit directly
    pub fn leaves(&self) -> usize {
        self.leaves.load(Ordering::Relaxed)
    }

    fn record_split(&self) {
        self.splits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_leaf(&self) {
        self.leaves.fetch_add(1, Ordering::Relaxed);
    }
}

/// One unit of recursive sorting work
#[derive(Debug)]
pub struct SortTask<T> {
    values: Vec<T>,
    threshold: usize,
    merge_strategy: MergeStrategy,
    stats: Option<Arc<TaskStats>>,
}

impl<T: Ord + Send> SortTask<T> {
    /// Create a task over `values`. A threshold of 0 is treated as 1.
    pub fn new(values: Vec<T>, threshold: usize) -> Self {
        Self {
            values,
            threshold: threshold.max(1),
            merge_strategy: MergeStrategy::default(),
            stats: None,
        }
    }

    /// Create a task with the default threshold from any collection
    pub fn from_values<I: IntoIterator<Item = T>>(values: I) -> Self {
        Self::new(values.into_iter().collect(), DEFAULT_THRESHOLD)
    }

    pub fn with_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = strategy;
        self
    }

    /// Record split/leaf counts for this task and all of its descendants
    pub fn with_stats(mut self, stats: Arc<TaskStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// True when the work unit is small enough to sort without forking
    pub fn is_leaf(&self) -> bool {
        self.values.len() <= self.threshold
    }

    /// Divide the work unit at `len / 2`. For odd sizes the second half
    /// receives the extra element.
    pub fn split(self) -> (Self, Self) {
        let Self {
            mut values,
            threshold,
            merge_strategy,
            stats,
        } = self;

        let midpoint = values.len() / 2;
        let second_half = values.split_off(midpoint);
        debug!(
            first = values.len(),
            second = second_half.len(),
            "divided work unit"
        );

        let first = Self {
            values,
            threshold,
            merge_strategy,
            stats: stats.clone(),
        };
        let second = Self {
            values: second_half,
            threshold,
            merge_strategy,
            stats,
        };
        (first, second)
    }

    /// Sort the work unit, forking onto the current rayon pool when it
    /// exceeds the threshold. Called outside any pool, the forks run on
    /// rayon's global pool.
    pub fn compute(self) -> Vec<T> {
        if self.is_leaf() {
            debug!(items = self.values.len(), "sorting work unit directly");
            if let Some(stats) = &self.stats {
                stats.record_leaf();
            }
            let mut values = self.values;
            values.sort();
            return values;
        }

        debug!(
            items = self.values.len(),
            threshold = self.threshold,
            "divide and conquer: work unit exceeds threshold"
        );
        if let Some(stats) = &self.stats {
            stats.record_split();
        }

        let strategy = self.merge_strategy;
        let (first, second) = self.split();
        let (left, right) = rayon::join(move || first.compute(), move || second.compute());
        merge_sorted(left, right, strategy)
    }
}

/// Combine two ascending sequences into one. Equal elements from `left`
/// precede those from `right` under both strategies.
pub fn merge_sorted<T: Ord>(left: Vec<T>, right: Vec<T>, strategy: MergeStrategy) -> Vec<T> {
    match strategy {
        MergeStrategy::Linear => {
            let mut merged = Vec::with_capacity(left.len() + right.len());
            merged.extend(left.into_iter().merge(right));
            merged
        }
        MergeStrategy::Resort => {
            let mut merged = left;
            merged.extend(right);
            merged.sort();
            merged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    const THIRTY_NAMES: [&str; 30] = [
        "Steve", "Larry", "Mike", "Xavier", "Jake", "Nate", "Julie", "Evelyne", "Beverly",
        "Thomas", "River", "Charlie", "Adam", "Russ", "Garrett", "Harry", "David", "Fred", "Zeke",
        "Victor", "Yvonne", "Siobhan", "Jeff", "Ivan", "Kyle", "Frank", "Rob", "Erin", "Nicole",
        "Paul",
    ];

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn reference_sort(values: &[String]) -> Vec<String> {
        let mut expected = values.to_vec();
        expected.sort();
        expected
    }

    #[test]
    fn test_compute_no_split() {
        let input = owned(&["Steve", "Larry", "Adam", "Mike", "Xavier", "Jake", "Nate"]);
        let stats = Arc::new(TaskStats::new());

        let sorted = SortTask::from_values(input)
            .with_stats(Arc::clone(&stats))
            .compute();

        assert_eq!(
            sorted,
            owned(&["Adam", "Jake", "Larry", "Mike", "Nate", "Steve", "Xavier"])
        );
        assert_eq!(stats.splits(), 0);
        assert_eq!(stats.leaves(), 1);
    }

    #[test]
    fn test_compute_split() {
        let input = owned(&THIRTY_NAMES);
        let stats = Arc::new(TaskStats::new());

        let sorted = SortTask::from_values(input.clone())
            .with_stats(Arc::clone(&stats))
            .compute();

        assert_eq!(sorted.len(), 30);
        assert_eq!(sorted, reference_sort(&input));
        // 30 -> 15 + 15 -> (7 + 8) + (7 + 8)
        assert_eq!(stats.splits(), 3);
        assert_eq!(stats.leaves(), 4);
    }

    #[test]
    fn test_empty_and_single() {
        let empty: Vec<String> = SortTask::from_values(Vec::new()).compute();
        assert!(empty.is_empty());

        let single = SortTask::from_values(vec!["only".to_string()]).compute();
        assert_eq!(single, vec!["only".to_string()]);
    }

    #[test]
    fn test_duplicates_preserved() {
        let sorted = SortTask::from_values(owned(&["b", "a", "b"])).compute();
        assert_eq!(sorted, owned(&["a", "b", "b"]));

        let all_same = vec![7u32; 50];
        let sorted = SortTask::new(all_same.clone(), 3).compute();
        assert_eq!(sorted, all_same);
    }

    #[test]
    fn test_threshold_boundary() {
        let at_threshold: Vec<u32> = (0..10).rev().collect();
        let stats = Arc::new(TaskStats::new());
        let sorted = SortTask::new(at_threshold, 10)
            .with_stats(Arc::clone(&stats))
            .compute();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
        assert_eq!(stats.splits(), 0);
        assert_eq!(stats.leaves(), 1);

        let above_threshold: Vec<u32> = (0..11).rev().collect();
        let stats = Arc::new(TaskStats::new());
        let sorted = SortTask::new(above_threshold, 10)
            .with_stats(Arc::clone(&stats))
            .compute();
        assert_eq!(sorted, (0..11).collect::<Vec<_>>());
        assert_eq!(stats.splits(), 1);
        assert_eq!(stats.leaves(), 2);
    }

    #[test]
    fn test_split_sizes() {
        let (first, second) = SortTask::new((0..11).collect::<Vec<u32>>(), 4).split();
        assert_eq!(first.len(), 5);
        assert_eq!(second.len(), 6);
        assert_eq!(first.threshold(), 4);
        assert_eq!(second.threshold(), 4);

        let (first, second) = SortTask::new((0..8).collect::<Vec<u32>>(), 4).split();
        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 4);
        assert!(first.is_leaf());
    }

    #[test]
    fn test_zero_threshold_clamped() {
        let task = SortTask::new(vec![3, 1, 2], 0);
        assert_eq!(task.threshold(), 1);
        assert_eq!(task.compute(), vec![1, 2, 3]);
    }

    #[test]
    fn test_deep_recursion_threshold_one() {
        let mut values: Vec<u64> = (0..2_000).collect();
        values.shuffle(&mut StdRng::seed_from_u64(7));
        let stats = Arc::new(TaskStats::new());

        let sorted = SortTask::new(values, 1)
            .with_stats(Arc::clone(&stats))
            .compute();

        assert_eq!(sorted, (0..2_000).collect::<Vec<_>>());
        // Every leaf holds exactly one element, and a binary tree with n
        // leaves has n - 1 internal nodes.
        assert_eq!(stats.leaves(), 2_000);
        assert_eq!(stats.splits(), 1_999);
    }

    #[test]
    fn test_merge_strategies_agree() {
        let mut values: Vec<i32> = (0..500).map(|i| (i * 37) % 101 - 50).collect();
        values.shuffle(&mut StdRng::seed_from_u64(42));
        let mut expected = values.clone();
        expected.sort();

        let linear = SortTask::new(values.clone(), 4)
            .with_merge_strategy(MergeStrategy::Linear)
            .compute();
        let resort = SortTask::new(values, 4)
            .with_merge_strategy(MergeStrategy::Resort)
            .compute();

        assert_eq!(linear, expected);
        assert_eq!(resort, expected);
    }

    #[test]
    fn test_merge_sorted_keeps_left_first_on_ties() {
        let left = vec![(1, 'l'), (2, 'l')];
        let right = vec![(1, 'r'), (3, 'r')];
        // Compare on the key only so ties are observable.
        #[derive(Debug, PartialEq, Eq)]
        struct Keyed(i32, char);
        impl PartialOrd for Keyed {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }
        impl Ord for Keyed {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.0.cmp(&other.0)
            }
        }
        let wrap = |v: Vec<(i32, char)>| v.into_iter().map(|(k, s)| Keyed(k, s)).collect::<Vec<_>>();

        for strategy in [MergeStrategy::Linear, MergeStrategy::Resort] {
            let merged = merge_sorted(wrap(left.clone()), wrap(right.clone()), strategy);
            let sides: Vec<char> = merged.iter().map(|k| k.1).collect();
            assert_eq!(sides, vec!['l', 'r', 'l', 'r'], "strategy {strategy}");
        }
    }
}
