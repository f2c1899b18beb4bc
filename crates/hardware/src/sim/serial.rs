//! Single-threaded fallback executor.
//!
//! Visits cores in index order with no barrier. A halted core is skipped; a core whose
//! counter has reached the stop cycle is marked halted and skipped. The run ends with
//! the first round in which every core is halted. Shared resources are stepped once per
//! round that stepped at least one core.
//!
//! Final state matches a threaded run only when every core halts at the same cycle or
//! the stop cycle ends the run: the threaded path keeps clocking halted cores until the
//! whole run ends, while this executor stops counting a core once it halts.

use crate::core::Core;
use crate::sim::halt::{HaltMonitor, StopReason};
use crate::sim::scheduler::PartitionRun;
use crate::soc::SharedResourceSet;

/// Runs every core on the calling thread.
#[derive(Debug)]
pub struct SerialExecutor {
    cores: Vec<Core>,
    monitor: HaltMonitor,
}

impl SerialExecutor {
    /// Takes ownership of every core.
    pub const fn new(cores: Vec<Core>, monitor: HaltMonitor) -> Self {
        Self { cores, monitor }
    }

    /// Runs until every core is halted, forcing cores that reach the stop cycle.
    pub fn run(&mut self, shared: &mut SharedResourceSet) -> PartitionRun {
        let mut stopped_by_cycle = false;
        loop {
            let mut stepped = false;
            for core in &mut self.cores {
                if core.is_halted() {
                    continue;
                }
                if self.monitor.stop_reached(core.cycle_num()) {
                    core.force_halt();
                    stopped_by_cycle = true;
                    continue;
                }
                core.step();
                core.finish_cycle();
                stepped = true;
            }
            if !stepped {
                break;
            }
            shared.step();
        }

        PartitionRun {
            cycles: self.cores.iter().map(Core::cycle_num).max().unwrap_or(0),
            reason: if stopped_by_cycle {
                StopReason::StopCycle
            } else {
                StopReason::AllHalted
            },
        }
    }

    /// The cores, in index order.
    pub fn cores(&self) -> &[Core] {
        &self.cores
    }

    /// Resets every core for a fresh frame.
    pub fn reset(&mut self) {
        for core in &mut self.cores {
            core.reset();
        }
    }
}
