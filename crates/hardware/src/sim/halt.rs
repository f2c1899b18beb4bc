//! Run termination.
//!
//! A run ends for every worker at the same cycle boundary, for one of two reasons:
//! every partition has reported all of its cores halted (observed through the cycle
//! barrier's live count), or the reference cycle reached the configured stop cycle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::Core;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Every core halted on its own.
    AllHalted,
    /// The configured stop cycle was reached first.
    StopCycle,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllHalted => write!(f, "all cores halted"),
            Self::StopCycle => write!(f, "stop cycle reached"),
        }
    }
}

/// Stop-cycle check shared by every executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HaltMonitor {
    stop_cycle: Option<u64>,
}

impl HaltMonitor {
    /// Creates a monitor; `None` means run until every core halts.
    pub const fn new(stop_cycle: Option<u64>) -> Self {
        Self { stop_cycle }
    }

    /// The configured stop cycle.
    pub const fn stop_cycle(&self) -> Option<u64> {
        self.stop_cycle
    }

    /// Returns `true` once `cycle` completed cycles reach the stop cycle.
    #[inline]
    pub const fn stop_reached(&self, cycle: u64) -> bool {
        match self.stop_cycle {
            Some(stop) => cycle >= stop,
            None => false,
        }
    }
}

/// Returns `true` if every core in the slice is halted.
///
/// An empty partition counts as halted.
#[inline]
pub fn partition_halted(cores: &[Core]) -> bool {
    cores.iter().all(Core::is_halted)
}
