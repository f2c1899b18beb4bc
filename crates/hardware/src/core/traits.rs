//! Hardware module interface.
//!
//! This module defines the trait implemented by every clocked sub-module of a core. It provides:
//! 1. **Two-phase clocking:** `clock_rise` propagates values visible this cycle; `clock_fall`
//!    commits latched updates.
//! 2. **Scheduling hints:** `pending_stalls` feeds the stall-biased issue order.
//! 3. **Reporting:** `utilization` accumulation and a `descriptor` naming the module's role,
//!    used instead of run-time type inspection to locate specific units.
//! 4. **Lifecycle:** `reset` restores the post-setup state between animated frames.
//!
//! All implementors must be `Send`: a core and its modules move to the worker thread
//! that owns the core's partition.

/// Role of a hardware module, reported by [`HardwareModule::descriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// Instruction issue / control unit (owns the core's halt condition).
    Issue,
    /// Arithmetic or logic functional unit.
    FunctionalUnit,
    /// Private (per-core) cache.
    Cache,
    /// Load/store or local-store unit.
    Memory,
    /// Anything else (register files, debug taps, ...).
    Other,
}

/// A clocked sub-module of a core.
pub trait HardwareModule: Send {
    /// Returns a short human-readable name (e.g. `"issuer"`, `"fp_add"`).
    fn name(&self) -> &str;

    /// Rising edge: propagate values visible during `cycle`.
    fn clock_rise(&mut self, cycle: u64);

    /// Falling edge: commit updates latched during `cycle`.
    fn clock_fall(&mut self, cycle: u64);

    /// Fraction of this cycle the module was busy, in `[0, 1]`.
    fn utilization(&self) -> f64 {
        0.0
    }

    /// Estimate of cycles this module is currently blocked.
    fn pending_stalls(&self) -> u64 {
        0
    }

    /// Capability descriptor for reporting queries.
    fn descriptor(&self) -> ModuleKind {
        ModuleKind::Other
    }

    /// Restores the post-setup state for a fresh frame.
    fn reset(&mut self) {}
}
