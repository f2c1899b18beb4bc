//! # Scheduler Tests
//!
//! Stall-biased visiting order and the per-partition run loop.

use mcsim_core::sim::barrier::CycleBarrier;
use mcsim_core::sim::halt::{HaltMonitor, StopReason};
use mcsim_core::sim::scheduler::{
    PartitionRun, finish_partition, issue_offset, run_partition, step_partition,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::MachineBuilder;

#[rstest]
#[case(vec![2, 5, 1, 5], 1)]
#[case(vec![0, 0, 0, 0], 0)]
#[case(vec![9, 1, 1], 0)]
#[case(vec![1, 1, 3], 2)]
#[case(vec![], 0)]
fn test_issue_offset_first_max(#[case] stalls: Vec<u64>, #[case] offset: usize) {
    assert_eq!(issue_offset(stalls), offset);
}

#[test]
fn test_round_robin_from_most_stalled() {
    let mut machine = MachineBuilder::new(4).stalls(vec![2, 5, 1, 5]).build();
    let offset = step_partition(&mut machine.cores);
    assert_eq!(offset, 1);
    assert_eq!(machine.log.rise_order(0), vec![1, 2, 3, 0]);
}

#[test]
fn test_every_core_stepped_once_per_cycle() {
    let mut machine = MachineBuilder::new(5).stalls(vec![0, 0, 0, 7, 0]).build();
    for _ in 0..3 {
        let _ = step_partition(&mut machine.cores);
        finish_partition(&mut machine.cores);
    }
    for cycle in 0..3 {
        let mut order = machine.log.rise_order(cycle);
        assert_eq!(order, vec![3, 4, 0, 1, 2]);
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }
    assert!(machine.cores.iter().all(|c| c.cycle_num() == 3));
}

#[test]
fn test_single_participant_runs_to_halt() {
    let mut machine = MachineBuilder::new(2).halt_at(vec![Some(2), Some(3)]).build();
    let barrier = CycleBarrier::new(1, 0u64);

    let run = run_partition(&mut machine.cores, &barrier, HaltMonitor::new(None), |n| *n += 1)
        .expect("run");

    assert_eq!(
        run,
        PartitionRun {
            cycles: 3,
            reason: StopReason::AllHalted
        }
    );
    assert_eq!(barrier.with_shared(|n| *n), 3);
}

#[test]
fn test_single_participant_stops_at_cycle() {
    let mut machine = MachineBuilder::new(2).build();
    let barrier = CycleBarrier::new(1, 0u64);

    let run = run_partition(&mut machine.cores, &barrier, HaltMonitor::new(Some(6)), |n| *n += 1)
        .expect("run");

    assert_eq!(run.reason, StopReason::StopCycle);
    assert_eq!(run.cycles, 6);
    assert_eq!(barrier.with_shared(|n| *n), 6);
    assert!(machine.cores.iter().all(|c| c.is_halted()));
}
