//! # Partition Tests
//!
//! Cover, contiguity, and balance of the core-to-thread split.

use mcsim_core::sim::partition::{ThreadPartition, clamp_threads, partition};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case(10, 4, vec![3, 3, 2, 2])]
#[case(16, 4, vec![4, 4, 4, 4])]
#[case(5, 1, vec![5])]
#[case(3, 8, vec![1, 1, 1])]
#[case(1, 1, vec![1])]
fn test_partition_sizes(#[case] cores: usize, #[case] threads: usize, #[case] sizes: Vec<usize>) {
    let parts = partition(cores, threads);
    assert_eq!(parts.iter().map(ThreadPartition::len).collect::<Vec<_>>(), sizes);
}

#[test]
fn test_partition_ranges() {
    let ranges: Vec<_> = partition(7, 3).iter().map(ThreadPartition::range).collect();
    assert_eq!(ranges, vec![0..3, 3..5, 5..7]);
}

#[test]
fn test_clamp_matches_partition_count() {
    for cores in 1..20 {
        for threads in 0..30 {
            assert_eq!(partition(cores, threads).len(), clamp_threads(threads, cores));
        }
    }
}

proptest! {
    #[test]
    fn prop_partitions_cover_all_cores(cores in 1usize..1024, threads in 1usize..128) {
        let parts = partition(cores, threads);
        prop_assert_eq!(parts.len(), threads.min(cores));
        prop_assert_eq!(parts.first().map(|p| p.start), Some(0));
        prop_assert_eq!(parts.last().map(|p| p.end), Some(cores));
        for pair in parts.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
        prop_assert_eq!(parts.iter().map(ThreadPartition::len).sum::<usize>(), cores);
    }

    #[test]
    fn prop_partitions_are_balanced(cores in 1usize..1024, threads in 1usize..128) {
        let parts = partition(cores, threads);
        let min = parts.iter().map(ThreadPartition::len).min().unwrap_or(0);
        let max = parts.iter().map(ThreadPartition::len).max().unwrap_or(0);
        prop_assert!(min >= 1);
        prop_assert!(max - min <= 1);
        // Larger partitions come first.
        for pair in parts.windows(2) {
            prop_assert!(pair[0].len() >= pair[1].len());
        }
    }
}
