//! Frame statistics collection and reporting.
//!
//! This module turns the end-of-frame state of the engine into a report. It provides:
//! 1. **Cycle summary:** Frame index, simulated cycles, stop reason, host time, and derived
//!    simulation speed.
//! 2. **Halt accounting:** How many cores halted on their own or were stopped.
//! 3. **Module utilization:** Per-module utilization, normalized by each core's cycle
//!    count and averaged across every core carrying a module of that name.
//! 4. **Shared resources:** Bank cycles stepped, memory-model ticks, and memory requests
//!    returned to the banks during the frame.

use serde::{Deserialize, Serialize};

use crate::core::CoreSnapshot;
use crate::sim::engine::RunSummary;
use crate::sim::halt::StopReason;
use crate::soc::SharedResourceSet;

/// Average utilization of one module across the cores that carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleUtilization {
    /// Module name.
    pub name: String,
    /// Mean of per-core normalized utilization, in `[0, 1]`.
    pub average: f64,
    /// Number of cores contributing to the mean.
    pub cores: usize,
}

/// Statistics for one simulated frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Frame index reported by the animation (0 without animation).
    pub frame: usize,
    /// Cycles completed by the furthest core.
    pub cycles: u64,
    /// Why the frame's run ended.
    pub reason: StopReason,
    /// Wall-clock seconds spent simulating the frame.
    pub host_seconds: f64,
    /// Number of simulated cores.
    pub num_cores: usize,
    /// Cores halted at the end of the frame.
    pub halted_cores: usize,
    /// Per-module utilization, in order of first appearance.
    pub modules: Vec<ModuleUtilization>,
    /// Core cycles the shared banks were stepped.
    pub bank_cycles: u64,
    /// Memory-model (DRAM) cycles ticked.
    pub memory_ticks: u64,
    /// Memory requests returned to the shared banks.
    pub memory_returns: u64,
}

impl FrameReport {
    /// Builds the report for a finished frame.
    ///
    /// # Arguments
    ///
    /// * `frame` - Frame index.
    /// * `run` - The engine run that produced the frame.
    /// * `cores` - Snapshots of every core, in index order.
    /// * `shared` - The shared resource set, before it is reset.
    pub fn new(
        frame: usize,
        run: &RunSummary,
        cores: &[CoreSnapshot],
        shared: &SharedResourceSet,
    ) -> Self {
        Self {
            frame,
            cycles: run.cycles,
            reason: run.reason,
            host_seconds: run.host_time.as_secs_f64(),
            num_cores: cores.len(),
            halted_cores: cores.iter().filter(|c| c.halted).count(),
            modules: average_utilization(cores),
            bank_cycles: shared.cycles_stepped(),
            memory_ticks: shared.memory().dram_cycles(),
            memory_returns: shared.banks().iter().map(|b| b.completed_requests()).sum(),
        }
    }

    /// Simulated kilocycles per host second.
    pub fn khz(&self) -> f64 {
        if self.host_seconds > 0.0 {
            self.cycles as f64 / self.host_seconds / 1000.0
        } else {
            0.0
        }
    }

    /// Prints selected sections (`summary`, `utilization`, `shared`) to stdout.
    ///
    /// An empty selection prints everything.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        println!("\n==========================================================");
        println!("FRAME {} STATISTICS", self.frame);
        println!("==========================================================");
        if want("summary") {
            println!("host_seconds             {:.4} s", self.host_seconds);
            println!("sim_cycles               {}", self.cycles);
            println!("sim_freq                 {:.2} kHz", self.khz());
            println!("stop_reason              {}", self.reason);
            println!(
                "cores.halted             {} / {}",
                self.halted_cores, self.num_cores
            );
            println!("----------------------------------------------------------");
        }
        if want("utilization") {
            println!("MODULE UTILIZATION");
            for module in self.modules.iter().filter(|m| m.average > 0.0) {
                println!(
                    "  {:<22} {:.2}% ({} cores)",
                    module.name,
                    module.average * 100.0,
                    module.cores
                );
            }
            println!("----------------------------------------------------------");
        }
        if want("shared") {
            println!("SHARED RESOURCES");
            println!("  banks.cycles           {}", self.bank_cycles);
            println!("  memory.ticks           {}", self.memory_ticks);
            println!("  memory.returns         {}", self.memory_returns);
        }
        println!("==========================================================");
    }

    /// Prints every section to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

/// Averages normalized per-module utilization across cores, grouping modules by name.
pub fn average_utilization(cores: &[CoreSnapshot]) -> Vec<ModuleUtilization> {
    let mut modules: Vec<ModuleUtilization> = Vec::new();
    for core in cores {
        for (usage, normalized) in core.modules.iter().zip(core.normalized_utilization()) {
            if let Some(entry) = modules.iter_mut().find(|m| m.name == usage.name) {
                entry.average += normalized;
                entry.cores += 1;
            } else {
                modules.push(ModuleUtilization {
                    name: usage.name.clone(),
                    average: normalized,
                    cores: 1,
                });
            }
        }
    }
    for entry in &mut modules {
        entry.average /= entry.cores as f64;
    }
    modules
}
