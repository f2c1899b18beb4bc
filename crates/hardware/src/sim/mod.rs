//! Cycle-synchronization engine.
//!
//! This module advances a set of cores through synchronized discrete cycles. It provides:
//! 1. **Partitioning:** Contiguous, balanced core ranges per worker thread.
//! 2. **Scheduling:** Stall-biased round-robin stepping of a partition each cycle.
//! 3. **Barrier:** The cycle rendezvous whose last arriver steps the shared resources.
//! 4. **Halting:** Run termination on all-halted or on the stop cycle.
//! 5. **Executors:** A persistent worker pool, and a serial fallback on the calling thread.
//! 6. **Frames:** The animation loop around repeated engine runs.

/// Generation-counted cycle barrier with last-arriver election.
pub mod barrier;
/// Engine facade selecting the serial or threaded executor.
pub mod engine;
/// Frame loop, animation, and observer interfaces.
pub mod frame;
/// Stop reasons and the stop-cycle check.
pub mod halt;
/// Core-to-thread partitioning.
pub mod partition;
/// Persistent worker threads.
pub mod pool;
/// Per-thread stepping order and run loop.
pub mod scheduler;
/// Single-threaded fallback executor.
pub mod serial;

pub use engine::{Engine, RunSummary};
pub use frame::{Animation, FrameLoop, FrameLoopSummary, FrameObserver};
pub use halt::{HaltMonitor, StopReason};
pub use partition::ThreadPartition;
