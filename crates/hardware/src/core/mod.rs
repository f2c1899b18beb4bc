//! Core model interface.
//!
//! This module contains the engine's view of a processing core: the
//! `HardwareModule` trait implemented by functional units, caches, and issue
//! logic, and the `Core` wrapper that owns a core's modules along with its cycle
//! counter, utilization accumulators, and halt line.

/// Engine-owned core wrapper and its snapshot types.
pub mod model;

/// Hardware module trait and capability descriptor.
pub mod traits;

pub use self::model::{Core, CoreSnapshot, ModuleUsage};
pub use self::traits::{HardwareModule, ModuleKind};
