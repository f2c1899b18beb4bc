//! Error definitions for the simulator.
//!
//! This module defines the errors surfaced by setup and by the engine infrastructure. It provides:
//! 1. **Configuration errors:** Parse, I/O, and validation failures rejected before any cycle runs.
//! 2. **Infrastructure errors:** Worker creation failures and workers lost mid-run.
//! 3. **Collaborator errors:** Failures reported by frame observers (statistics/output).
//!
//! Nothing inside a simulated cycle returns an error. Collaborator contract violations
//! (e.g. a module reporting an impossible state) are assertion failures, not `SimError`s.

use thiserror::Error;

/// Errors produced while configuring, building, or driving a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration was syntactically valid but describes an impossible machine.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The OS refused to create a simulation worker thread.
    #[error("failed to spawn simulation worker {index}: {source}")]
    ThreadSpawn {
        /// Index of the worker (partition) that could not be started.
        index: usize,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// A worker thread exited or disconnected while the engine still needed it.
    #[error("simulation worker {index} was lost")]
    WorkerLost {
        /// Index of the lost worker (partition).
        index: usize,
    },

    /// A sibling worker died while a cycle barrier episode was open.
    #[error("cycle barrier abandoned by a failed worker")]
    BarrierAbandoned,

    /// A frame observer (statistics or output collaborator) failed.
    #[error("frame observer failed: {0}")]
    Observer(String),
}

/// Convenience alias used across the crate.
pub type SimResult<T> = Result<T, SimError>;
