//! Engine-owned core model.
//!
//! A `Core` wraps the ordered list of hardware modules that make up one
//! independently-clockable processing core, together with the state the engine
//! owns on its behalf: the cycle counter, per-module utilization accumulators, and
//! the engine's end of the core's halt line.

use std::fmt;

use super::traits::{HardwareModule, ModuleKind};
use crate::common::HaltLine;

/// One simulated core: ordered modules plus engine-owned clock and accounting state.
pub struct Core {
    id: usize,
    modules: Vec<Box<dyn HardwareModule>>,
    utilizations: Vec<f64>,
    cycle_num: u64,
    halt: HaltLine,
}

impl Core {
    /// Creates a core from its modules, in the order they are clocked every cycle.
    ///
    /// # Arguments
    ///
    /// * `id` - Global core index.
    /// * `halt` - The line the core's control module raises when it halts.
    /// * `modules` - Sub-modules; the order is fixed for the core's lifetime.
    pub fn new(id: usize, halt: HaltLine, modules: Vec<Box<dyn HardwareModule>>) -> Self {
        let utilizations = vec![0.0; modules.len()];
        Self {
            id,
            modules,
            utilizations,
            cycle_num: 0,
            halt,
        }
    }

    /// Global index of this core.
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Number of cycles this core has completed in the current frame.
    pub const fn cycle_num(&self) -> u64 {
        self.cycle_num
    }

    /// Returns `true` once the core's control logic (or the serial stop check) halted it.
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halt.is_raised()
    }

    /// Marks the core halted from the engine side.
    pub fn force_halt(&self) {
        self.halt.raise();
    }

    /// Sum of the pending-stall estimates of every module.
    #[inline]
    pub fn pending_stalls(&self) -> u64 {
        self.modules.iter().map(|m| m.pending_stalls()).sum()
    }

    /// Two-phase step: rising edge on every module in order, then falling edge.
    #[inline]
    pub fn step(&mut self) {
        let cycle = self.cycle_num;
        for module in &mut self.modules {
            module.clock_rise(cycle);
        }
        for module in &mut self.modules {
            module.clock_fall(cycle);
        }
    }

    /// Closes the current cycle: accumulates utilization and advances the counter.
    #[inline]
    pub fn finish_cycle(&mut self) {
        for (sum, module) in self.utilizations.iter_mut().zip(&self.modules) {
            *sum += module.utilization();
        }
        self.cycle_num += 1;
    }

    /// Returns the first module whose descriptor matches `kind`.
    pub fn find_module(&self, kind: ModuleKind) -> Option<&dyn HardwareModule> {
        self.modules
            .iter()
            .find(|m| m.descriptor() == kind)
            .map(|m| &**m)
    }

    /// Module names in clocking order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name())
    }

    /// Accumulated (not normalized) utilization per module, in clocking order.
    pub fn utilizations(&self) -> &[f64] {
        &self.utilizations
    }

    /// Restores the post-setup state: counter, accumulators, halt line, and every module.
    pub fn reset(&mut self) {
        self.cycle_num = 0;
        self.utilizations.fill(0.0);
        self.halt.clear();
        for module in &mut self.modules {
            module.reset();
        }
    }

    /// Captures the reporting view of this core.
    pub fn snapshot(&self) -> CoreSnapshot {
        CoreSnapshot {
            id: self.id,
            cycle_num: self.cycle_num,
            halted: self.is_halted(),
            modules: self
                .modules
                .iter()
                .zip(&self.utilizations)
                .map(|(m, &accumulated)| ModuleUsage {
                    name: m.name().to_string(),
                    kind: m.descriptor(),
                    accumulated,
                })
                .collect(),
        }
    }
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Core")
            .field("id", &self.id)
            .field("cycle_num", &self.cycle_num)
            .field("halted", &self.is_halted())
            .field("modules", &self.module_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Accumulated utilization of one module.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleUsage {
    /// Module name.
    pub name: String,
    /// Module role.
    pub kind: ModuleKind,
    /// Sum of per-cycle utilization over the frame.
    pub accumulated: f64,
}

/// Point-in-time view of a core, safe to send across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreSnapshot {
    /// Global core index.
    pub id: usize,
    /// Cycles completed this frame.
    pub cycle_num: u64,
    /// Whether the core is halted.
    pub halted: bool,
    /// Per-module accounting, in clocking order.
    pub modules: Vec<ModuleUsage>,
}

impl CoreSnapshot {
    /// Per-module utilization normalized by this core's cycle count.
    ///
    /// A core that completed no cycles reports zero everywhere.
    pub fn normalized_utilization(&self) -> Vec<f64> {
        let cycles = self.cycle_num.max(1) as f64;
        self.modules.iter().map(|m| m.accumulated / cycles).collect()
    }
}
