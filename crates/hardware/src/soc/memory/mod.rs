//! Main memory timing.
//!
//! The DRAM model is a shared resource: it is ticked only by the thread elected at
//! each cycle barrier, several times per core cycle to model its faster clock domain.

/// Memory controller trait and the fixed-latency reference model.
pub mod controller;

pub use self::controller::{MemoryController, SimpleController};
