//! Shared resource traits.
//!
//! This module defines the interfaces of state not owned by any one core. It provides:
//! 1. **SharedBank:** A cache bank shared by a group of cores, clocked once per cycle.
//! 2. **FrameState:** Chip-wide mutable state (e.g. a global register file) that is only
//!    reset between animated frames.
//!
//! Both are `Send`: they live inside the cycle barrier and are touched by whichever
//! worker thread is elected last arriver for the cycle.

use crate::soc::memory::MemoryController;

/// A shared cache bank (e.g. an L2 slice serving several cores).
pub trait SharedBank: Send {
    /// Returns a short name for this bank (e.g. `"L2#0"`).
    fn name(&self) -> &str;

    /// Rising edge. `memory` is the DRAM model, or `None` when it is disabled and the
    /// bank must apply its own naive miss latency.
    fn clock_rise(&mut self, memory: Option<&mut dyn MemoryController>);

    /// Falling edge: commit this cycle's updates.
    fn clock_fall(&mut self);

    /// Clears contents and counters for a fresh frame.
    fn reset(&mut self);

    /// Memory requests this bank has seen come back since the last reset.
    fn completed_requests(&self) -> u64 {
        0
    }
}

/// Chip-wide state that persists through a frame and is reset between frames.
pub trait FrameState: Send {
    /// Returns a short name for diagnostics.
    fn name(&self) -> &str;

    /// Restores the post-setup state.
    fn reset(&mut self);
}
