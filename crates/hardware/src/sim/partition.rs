//! Core-to-thread partitioning.
//!
//! Splits `C` cores into `T` contiguous, near-equal index ranges, one per worker
//! thread. The first `C % T` partitions receive one extra core; the last partition's
//! end is pinned to `C`.

use std::ops::Range;

/// Half-open range `[start, end)` of core indices owned by one worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadPartition {
    /// First core index owned by the partition.
    pub start: usize,
    /// One past the last core index owned by the partition.
    pub end: usize,
}

impl ThreadPartition {
    /// Number of cores in the partition.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the partition owns no cores.
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// The partition as a `Range`.
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Clamps a requested thread count into `1..=cores` (and to `1` when there are no cores).
pub fn clamp_threads(requested: usize, cores: usize) -> usize {
    requested.min(cores).max(1)
}

/// Partitions `cores` across `requested_threads` worker threads.
///
/// The thread count is clamped with [`clamp_threads`]. Returns an empty list when
/// `cores` is zero; configuration validation rejects that machine before any run.
///
/// # Examples
///
/// ```
/// use mcsim_core::sim::partition::partition;
///
/// let parts = partition(10, 4);
/// let sizes: Vec<_> = parts.iter().map(|p| p.len()).collect();
/// assert_eq!(sizes, vec![3, 3, 2, 2]);
/// assert_eq!(parts.last().unwrap().end, 10);
/// ```
pub fn partition(cores: usize, requested_threads: usize) -> Vec<ThreadPartition> {
    if cores == 0 {
        return Vec::new();
    }
    let threads = clamp_threads(requested_threads, cores);
    let base = cores / threads;
    let remainder = cores % threads;

    let mut parts = Vec::with_capacity(threads);
    let mut start = 0;
    for i in 0..threads {
        let size = if i < remainder { base + 1 } else { base };
        parts.push(ThreadPartition {
            start,
            end: start + size,
        });
        start += size;
    }
    if let Some(last) = parts.last_mut() {
        last.end = cores;
    }
    parts
}
