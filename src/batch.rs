//! Batch Scheduler
//!
//! Produces a uniformly random permutation of the flat key set and partitions
//! it into fixed-size batches. Randomization avoids biasing the backend
//! toward any systematic ordering (alphabetical runs of related keys tend to
//! produce repetitive failure patterns); the Output Assembler re-sorts keys,
//! so send order never leaks into the artifact.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Maximum number of keys sent to the backend in one call
pub const BATCH_SIZE: usize = 32;

/// Collect and shuffle the keys of a flat map
///
/// The shuffle is `rand`'s Fisher–Yates, an unbiased swap-based permutation.
/// Chunk the result with [`BATCH_SIZE`] to obtain the batch partition: every
/// key lands in exactly one batch, each batch is contiguous in the
/// permutation, and only the final batch may be short.
pub fn shuffled_keys<R: Rng>(flat: &HashMap<String, String>, rng: &mut R) -> Vec<String> {
    let mut keys: Vec<String> = flat.keys().cloned().collect();
    keys.shuffle(rng);
    keys
}

/// Progress snapshot reported before each batch after the first
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Percent of keys processed so far, 0-100
    pub percent: f64,
    /// Estimated remaining duration, `(elapsed / processed) * remaining`
    pub estimated_remaining: Duration,
}

/// Tracks elapsed time against the total key count for progress reporting
///
/// Observability only; it never affects scheduling decisions.
#[derive(Debug)]
pub struct ProgressTracker {
    started: Instant,
    total: usize,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            started: Instant::now(),
            total,
        }
    }

    /// Report progress after `processed` keys
    ///
    /// Returns `None` before any key has been processed (no rate to
    /// extrapolate from) or when the total is zero.
    pub fn report(&self, processed: usize) -> Option<Progress> {
        if processed == 0 || self.total == 0 {
            return None;
        }
        let elapsed = self.started.elapsed();
        let remaining = self.total.saturating_sub(processed);
        let per_key = elapsed.as_secs_f64() / processed as f64;
        Some(Progress {
            percent: (processed as f64 / self.total as f64) * 100.0,
            estimated_remaining: Duration::from_secs_f64(per_key * remaining as f64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_map(n: usize) -> HashMap<String, String> {
        (0..n)
            .map(|i| (format!("key{}", i), format!("value{}", i)))
            .collect()
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let flat = flat_map(100);
        let mut rng = rand::rng();
        let keys = shuffled_keys(&flat, &mut rng);
        assert_eq!(keys.len(), 100);
        let mut sorted = keys.clone();
        sorted.sort();
        let mut expected: Vec<String> = flat.keys().cloned().collect();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_partition_covers_all_keys_exactly_once() {
        let flat = flat_map(100);
        let mut rng = rand::rng();
        let keys = shuffled_keys(&flat, &mut rng);
        let batches: Vec<&[String]> = keys.chunks(BATCH_SIZE).collect();

        // 100 keys -> 32, 32, 32, 4
        assert_eq!(batches.len(), 4);
        for batch in &batches[..3] {
            assert_eq!(batch.len(), BATCH_SIZE);
        }
        assert_eq!(batches[3].len(), 4);

        let mut seen: Vec<&String> = batches.iter().flat_map(|b| b.iter()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 100);
    }

    #[test]
    fn test_partition_exact_multiple() {
        let flat = flat_map(64);
        let mut rng = rand::rng();
        let keys = shuffled_keys(&flat, &mut rng);
        let batches: Vec<&[String]> = keys.chunks(BATCH_SIZE).collect();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == BATCH_SIZE));
    }

    #[test]
    fn test_partition_single_short_batch() {
        let flat = flat_map(5);
        let mut rng = rand::rng();
        let keys = shuffled_keys(&flat, &mut rng);
        let batches: Vec<&[String]> = keys.chunks(BATCH_SIZE).collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 5);
    }

    #[test]
    fn test_shuffle_empty_map() {
        let flat = flat_map(0);
        let mut rng = rand::rng();
        assert!(shuffled_keys(&flat, &mut rng).is_empty());
    }

    #[test]
    fn test_progress_none_before_first_batch() {
        let tracker = ProgressTracker::new(100);
        assert!(tracker.report(0).is_none());
    }

    #[test]
    fn test_progress_none_for_empty_total() {
        let tracker = ProgressTracker::new(0);
        assert!(tracker.report(0).is_none());
    }

    #[test]
    fn test_progress_percent() {
        let tracker = ProgressTracker::new(128);
        let progress = tracker.report(32).unwrap();
        assert!((progress.percent - 25.0).abs() < f64::EPSILON);
        let progress = tracker.report(128).unwrap();
        assert!((progress.percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_eta_shrinks_with_work_done() {
        let tracker = ProgressTracker::new(100);
        std::thread::sleep(Duration::from_millis(10));
        let early = tracker.report(10).unwrap();
        let late = tracker.report(90).unwrap();
        // Same elapsed time, more keys done, so the estimate must shrink.
        assert!(late.estimated_remaining < early.estimated_remaining);
    }
}
