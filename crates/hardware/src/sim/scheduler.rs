//! Per-thread scheduling of a partition.
//!
//! Each cycle a worker steps every core it owns exactly once. The visiting order is
//! round-robin starting at the core with the largest pending-stall estimate, so the
//! most backed-up core gets the earliest slot in the cycle. After stepping, the worker
//! arrives at the cycle barrier and, once released, closes the cycle on every core.

use crate::common::SimResult;
use crate::core::Core;
use crate::sim::barrier::CycleBarrier;
use crate::sim::halt::{HaltMonitor, StopReason, partition_halted};

/// Index of the first maximum in `stalls`, or `0` when empty.
///
/// # Examples
///
/// ```
/// use mcsim_core::sim::scheduler::issue_offset;
///
/// assert_eq!(issue_offset([2, 5, 1, 5]), 1);
/// assert_eq!(issue_offset([]), 0);
/// ```
pub fn issue_offset(stalls: impl IntoIterator<Item = u64>) -> usize {
    let mut best = 0;
    let mut best_stalls = None;
    for (i, s) in stalls.into_iter().enumerate() {
        if best_stalls.is_none_or(|b| s > b) {
            best = i;
            best_stalls = Some(s);
        }
    }
    best
}

/// Steps every core in `cores` once, round-robin from the most stalled core.
///
/// Returns the offset the round started at.
pub fn step_partition(cores: &mut [Core]) -> usize {
    let offset = issue_offset(cores.iter().map(Core::pending_stalls));
    let (head, tail) = cores.split_at_mut(offset);
    for core in tail.iter_mut().chain(head.iter_mut()) {
        core.step();
    }
    offset
}

/// Closes the current cycle on every core: utilization accumulation and counter increment.
pub fn finish_partition(cores: &mut [Core]) {
    for core in cores {
        core.finish_cycle();
    }
}

/// Result of one worker's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionRun {
    /// Cycle count of the partition's cores when the run ended.
    pub cycles: u64,
    /// Why the run ended.
    pub reason: StopReason,
}

/// Runs one partition in lockstep with the other participants of `barrier`.
///
/// Every participant sees the same barrier episodes and the same core counters, so all
/// of them leave the loop at the same cycle boundary and with the same reason.
/// `step_shared` is applied to the barrier's shared state by the last arriver of each
/// cycle. Cores still running when the stop cycle is reached are marked halted, as the
/// serial executor does.
///
/// # Errors
///
/// Returns `SimError::BarrierAbandoned` if another participant died mid-run.
pub fn run_partition<S>(
    cores: &mut [Core],
    barrier: &CycleBarrier<S>,
    monitor: HaltMonitor,
    step_shared: impl Fn(&mut S),
) -> SimResult<PartitionRun> {
    let mut retired = false;
    loop {
        let cycle = cores.first().map_or(0, Core::cycle_num);
        if monitor.stop_reached(cycle) {
            for core in cores.iter() {
                core.force_halt();
            }
            return Ok(PartitionRun {
                cycles: cycle,
                reason: StopReason::StopCycle,
            });
        }

        let _ = step_partition(cores);
        let retiring = !retired && partition_halted(cores);
        retired |= retiring;

        let episode = barrier.arrive(retiring, &step_shared)?;
        finish_partition(cores);

        if episode.all_halted {
            return Ok(PartitionRun {
                cycles: cores.first().map_or(episode.cycle, Core::cycle_num),
                reason: StopReason::AllHalted,
            });
        }
    }
}
