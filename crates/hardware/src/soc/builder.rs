//! Shared resource set construction and per-cycle stepping.
//!
//! This module assembles everything not owned by a single core. It performs:
//! 1. **Bank stepping:** One rise+fall on every shared bank per simulated cycle.
//! 2. **Memory ticking:** A fixed number of memory-model ticks per cycle, skipped entirely
//!    when the model is disabled.
//! 3. **Frame reset:** Clears banks, the memory model, and registered chip-wide state.
//!
//! `step` must run exactly once per cycle and never concurrently with any core's step;
//! the cycle barrier guarantees this by holding the set inside its mutex and handing it
//! only to the elected last arriver.

use std::fmt;

use crate::config::MemoryConfig;
use crate::soc::memory::MemoryController;
use crate::soc::traits::{FrameState, SharedBank};

/// Resources shared by every core: cache banks, the memory-timing model, and chip-wide state.
pub struct SharedResourceSet {
    banks: Vec<Box<dyn SharedBank>>,
    memory: Box<dyn MemoryController>,
    memory_disabled: bool,
    ticks_per_cycle: u32,
    frame_state: Vec<Box<dyn FrameState>>,
    cycles_stepped: u64,
}

impl SharedResourceSet {
    /// Builds a shared resource set.
    ///
    /// # Arguments
    ///
    /// * `banks` - Shared cache banks, stepped in this order every cycle.
    /// * `memory` - Memory-timing model.
    /// * `config` - Memory configuration (disabled flag and DRAM clock multiplier).
    pub fn new(
        banks: Vec<Box<dyn SharedBank>>,
        memory: Box<dyn MemoryController>,
        config: &MemoryConfig,
    ) -> Self {
        Self {
            banks,
            memory,
            memory_disabled: config.disable_dram_model,
            ticks_per_cycle: config.dram_clock_multiplier,
            frame_state: Vec::new(),
            cycles_stepped: 0,
        }
    }

    /// Registers chip-wide state to be reset between frames (e.g. a global register file).
    #[must_use]
    pub fn with_frame_state(mut self, state: Box<dyn FrameState>) -> Self {
        self.frame_state.push(state);
        self
    }

    /// Advances every shared resource by one core cycle.
    pub fn step(&mut self) {
        for bank in &mut self.banks {
            let memory: Option<&mut dyn MemoryController> = if self.memory_disabled {
                None
            } else {
                Some(&mut *self.memory)
            };
            bank.clock_rise(memory);
            bank.clock_fall();
        }

        if !self.memory_disabled {
            for _ in 0..self.ticks_per_cycle {
                self.memory.tick();
            }
        }
        self.cycles_stepped += 1;
    }

    /// Restores banks, the memory model, and registered chip-wide state for a fresh frame.
    pub fn reset(&mut self) {
        for bank in &mut self.banks {
            bank.reset();
        }
        self.memory.reset();
        for state in &mut self.frame_state {
            state.reset();
        }
        self.cycles_stepped = 0;
    }

    /// Number of core cycles stepped since the last reset.
    pub const fn cycles_stepped(&self) -> u64 {
        self.cycles_stepped
    }

    /// Number of shared banks.
    pub fn num_banks(&self) -> usize {
        self.banks.len()
    }

    /// Shared banks, in stepping order.
    pub fn banks(&self) -> &[Box<dyn SharedBank>] {
        &self.banks
    }

    /// The memory-timing model.
    pub fn memory(&self) -> &dyn MemoryController {
        &*self.memory
    }

    /// Whether calls into the memory model are skipped.
    pub const fn memory_disabled(&self) -> bool {
        self.memory_disabled
    }
}

impl fmt::Debug for SharedResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedResourceSet")
            .field("banks", &self.banks.iter().map(|b| b.name()).collect::<Vec<_>>())
            .field("memory_disabled", &self.memory_disabled)
            .field("ticks_per_cycle", &self.ticks_per_cycle)
            .field(
                "frame_state",
                &self.frame_state.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("cycles_stepped", &self.cycles_stepped)
            .finish_non_exhaustive()
    }
}
