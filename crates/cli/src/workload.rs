//! Synthetic workload for exercising the engine from the command line.
//!
//! Every core gets an issue unit that retires a fixed number of instructions with a
//! deterministic, per-core stall pattern and then halts, plus two functional units
//! fed by the issue unit's busy cycles. Each shared bank forwards a periodic miss to
//! the memory model and counts the requests that come back. A frame counter stands in
//! for an animated scene.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use mcsim_core::common::{HaltLine, SimError, SimResult};
use mcsim_core::config::Config;
use mcsim_core::core::{Core, HardwareModule, ModuleKind};
use mcsim_core::sim::{Animation, FrameObserver};
use mcsim_core::soc::memory::{MemoryController, SimpleController};
use mcsim_core::soc::{SharedBank, SharedResourceSet};
use mcsim_core::stats::FrameReport;

/// Cycles a bank waits between misses.
const MISS_INTERVAL: u64 = 8;

/// Busy signal from the issue unit to its functional units, for the current cycle.
#[derive(Clone, Debug, Default)]
struct IssueBus(Arc<AtomicBool>);

impl IssueBus {
    fn set(&self, busy: bool) {
        self.0.store(busy, Ordering::Relaxed);
    }

    fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Issues `budget` instructions, stalling between them, then raises the halt line.
#[derive(Debug)]
struct Issuer {
    seed: u64,
    budget: u64,
    issued: u64,
    stall: u64,
    busy: bool,
    halt: HaltLine,
    bus: IssueBus,
}

impl Issuer {
    /// Stall after the n-th instruction: a short hash of (core, n) folded into `0..4`.
    const fn stall_after(&self) -> u64 {
        let x = self.seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ self.issued;
        (x ^ (x >> 7)) % 4
    }
}

impl HardwareModule for Issuer {
    fn name(&self) -> &str {
        "issuer"
    }

    fn clock_rise(&mut self, _cycle: u64) {
        self.busy = false;
        if self.halt.is_raised() {
            return;
        }
        if self.stall > 0 {
            self.stall -= 1;
            return;
        }
        self.issued += 1;
        self.busy = true;
        self.stall = self.stall_after();
    }

    fn clock_fall(&mut self, _cycle: u64) {
        self.bus.set(self.busy);
        if self.issued >= self.budget {
            self.halt.raise();
        }
    }

    fn utilization(&self) -> f64 {
        if self.busy { 1.0 } else { 0.0 }
    }

    fn pending_stalls(&self) -> u64 {
        self.stall
    }

    fn descriptor(&self) -> ModuleKind {
        ModuleKind::Issue
    }

    fn reset(&mut self) {
        self.issued = 0;
        self.stall = 0;
        self.busy = false;
        self.bus.set(false);
    }
}

/// Functional unit that accepts every `period`-th instruction the issuer sends.
#[derive(Debug)]
struct FunctionalUnit {
    name: &'static str,
    period: u64,
    accepted: u64,
    busy: bool,
    bus: IssueBus,
}

impl HardwareModule for FunctionalUnit {
    fn name(&self) -> &str {
        self.name
    }

    fn clock_rise(&mut self, _cycle: u64) {
        self.busy = false;
        if self.bus.get() {
            self.accepted += 1;
            self.busy = self.accepted % self.period == 0;
        }
    }

    fn clock_fall(&mut self, _cycle: u64) {}

    fn utilization(&self) -> f64 {
        if self.busy { 1.0 } else { 0.0 }
    }

    fn descriptor(&self) -> ModuleKind {
        ModuleKind::FunctionalUnit
    }

    fn reset(&mut self) {
        self.accepted = 0;
        self.busy = false;
    }
}

/// Shared bank that sends a miss to memory every `MISS_INTERVAL` cycles and counts
/// the completions it collects from the memory model. Without a memory model a miss
/// returns immediately.
#[derive(Debug)]
struct CountingBank {
    name: String,
    base: u64,
    cycle: u64,
    requests: u64,
    returned: u64,
}

impl SharedBank for CountingBank {
    fn name(&self) -> &str {
        &self.name
    }

    fn clock_rise(&mut self, memory: Option<&mut dyn MemoryController>) {
        let Some(memory) = memory else {
            if self.cycle % MISS_INTERVAL == 0 {
                self.requests += 1;
                self.returned += 1;
            }
            return;
        };
        // The first bank stepped each cycle drains every completion from the shared model.
        self.returned += memory.take_completed().len() as u64;
        if self.cycle % MISS_INTERVAL == 0 {
            self.requests += 1;
            memory.submit(self.base + self.requests * 64);
        }
    }

    fn clock_fall(&mut self) {
        self.cycle += 1;
    }

    fn reset(&mut self) {
        self.cycle = 0;
        self.requests = 0;
        self.returned = 0;
    }

    fn completed_requests(&self) -> u64 {
        self.returned
    }
}

/// Builds `config.total_cores()` synthetic cores and the shared resource set.
pub fn build(config: &Config, instructions: u64) -> (Vec<Core>, SharedResourceSet) {
    let cores = (0..config.total_cores())
        .map(|id| {
            let halt = HaltLine::new();
            let bus = IssueBus::default();
            let modules: Vec<Box<dyn HardwareModule>> = vec![
                Box::new(Issuer {
                    seed: id as u64 + 1,
                    budget: instructions,
                    issued: 0,
                    stall: 0,
                    busy: false,
                    halt: halt.clone(),
                    bus: bus.clone(),
                }),
                Box::new(FunctionalUnit {
                    name: "int_alu",
                    period: 1,
                    accepted: 0,
                    busy: false,
                    bus: bus.clone(),
                }),
                Box::new(FunctionalUnit {
                    name: "fp_mul",
                    period: 3,
                    accepted: 0,
                    busy: false,
                    bus,
                }),
            ];
            Core::new(id, halt, modules)
        })
        .collect();

    let banks = (0..config.system.num_banks)
        .map(|i| {
            Box::new(CountingBank {
                name: format!("L2#{i}"),
                base: (i as u64) << 32,
                cycle: 0,
                requests: 0,
                returned: 0,
            }) as Box<dyn SharedBank>
        })
        .collect();

    let shared = SharedResourceSet::new(
        banks,
        Box::new(SimpleController::new(config.memory.dram_latency)),
        &config.memory,
    );

    (cores, shared)
}

/// Animation of `frames` frames with nothing moving.
#[derive(Debug)]
pub struct FrameCounter {
    current: usize,
    frames: usize,
    rebuilds: usize,
}

impl FrameCounter {
    pub const fn new(frames: usize) -> Self {
        Self {
            current: 0,
            frames,
            rebuilds: 0,
        }
    }

    pub const fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}

impl Animation for FrameCounter {
    fn current_frame(&self) -> usize {
        self.current
    }

    fn load_next_frame(&mut self) -> bool {
        if self.current + 1 >= self.frames {
            return false;
        }
        self.current += 1;
        true
    }

    fn rebuild_spatial_index(&mut self) {
        self.rebuilds += 1;
    }
}

/// Prints each frame's report, as a table or as JSON.
#[derive(Debug)]
pub struct ReportPrinter {
    pub sections: Vec<String>,
    pub json: bool,
}

impl FrameObserver for ReportPrinter {
    fn frame_complete(
        &mut self,
        report: &FrameReport,
        _shared: &SharedResourceSet,
    ) -> SimResult<()> {
        if self.json {
            let text = serde_json::to_string_pretty(report)
                .map_err(|e| SimError::Observer(e.to_string()))?;
            println!("{text}");
        } else {
            report.print_sections(&self.sections);
        }
        Ok(())
    }
}
