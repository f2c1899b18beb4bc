//! Shared (chip-level) components.
//!
//! This module organizes the resources that are not owned by any single core:
//! shared cache banks, the memory-timing model, chip-wide frame state, and the
//! `SharedResourceSet` that the cycle barrier's last arriver steps every cycle.

/// Shared resource set construction and stepping.
pub mod builder;

/// Memory-timing models.
pub mod memory;

/// Shared bank and frame state traits.
pub mod traits;

pub use builder::SharedResourceSet;
pub use traits::{FrameState, SharedBank};
