//! Many-core cycle-synchronization engine.
//!
//! This crate advances a fleet of independently clocked core models through
//! synchronized discrete cycles with the following:
//! 1. **Core:** The `HardwareModule` interface and the engine-owned `Core` wrapper.
//! 2. **SoC:** Shared cache banks, the memory-timing model, and chip-wide frame state.
//! 3. **Simulation:** Partitioning, per-thread scheduling, the cycle barrier, halting,
//!    serial and threaded executors, and the frame loop.
//! 4. **Statistics:** Per-frame reports.
//! 5. **Configuration:** JSON-loadable settings with validated defaults.

/// Common types (errors, halt lines).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Core model (hardware module trait, core wrapper, snapshots).
pub mod core;
/// Cycle-synchronization engine and frame loop.
pub mod sim;
/// Shared resources (banks, memory model, frame state).
pub mod soc;
/// Frame statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or load it from JSON.
pub use crate::config::Config;
/// Engine-owned core wrapper; construct with `Core::new`.
pub use crate::core::Core;
/// Engine facade; construct with `Engine::new`.
pub use crate::sim::Engine;
/// Shared resources stepped once per cycle.
pub use crate::soc::SharedResourceSet;
