//! Common types shared throughout the simulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the simulator. It includes:
//! 1. **Error Handling:** The `SimError` taxonomy for setup and engine infrastructure.
//! 2. **Halt Lines:** The shared flag a core's control logic raises when it halts.

/// Error types for configuration, setup, and worker management.
pub mod error;

/// Shared halted flag between a core's control module and the engine.
pub mod halt_line;

pub use error::{SimError, SimResult};
pub use halt_line::HaltLine;
