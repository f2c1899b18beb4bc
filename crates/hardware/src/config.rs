//! Configuration system for the many-core simulator.
//!
//! This module defines all configuration structures used to parameterize
//! the engine. It provides:
//! 1. **Defaults:** Baseline constants (thread count, chip topology, DRAM clock ratio).
//! 2. **Structures:** Hierarchical config for general, system, memory, and animation settings.
//! 3. **Loading:** JSON parsing from strings or files, plus validation of the machine shape.
//!
//! Configuration is supplied as JSON (see the CLI `--config` flag) or use `Config::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{SimError, SimResult};

/// Default configuration constants for the simulator.
///
/// These values define the baseline machine when not explicitly overridden
/// in the JSON configuration.
mod defaults {
    /// Number of host worker threads driving the simulation.
    pub const SIMULATION_THREADS: usize = 1;

    /// Number of cores attached to each shared cache bank.
    pub const CORES_PER_BANK: usize = 1;

    /// Number of shared cache banks; every per-bank resource is multiplied by this.
    pub const NUM_BANKS: usize = 1;

    /// Memory-model ticks per simulated core cycle.
    ///
    /// The DRAM runs in a faster clock domain than the cores; the last arriver at
    /// each cycle barrier ticks the memory model this many times.
    pub const DRAM_CLOCK_MULTIPLIER: u32 = 4;

    /// Fixed request latency of the reference memory model, in DRAM cycles.
    pub const DRAM_LATENCY: u64 = 20;
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use mcsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.general.simulation_threads, 1);
/// assert_eq!(config.total_cores(), 1);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use mcsim_core::config::Config;
///
/// let json = r#"{
///     "general": { "simulation_threads": 4, "stop_cycle": 1000 },
///     "system": { "cores_per_bank": 8, "num_banks": 2 },
///     "memory": { "dram_clock_multiplier": 2 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.total_cores(), 16);
/// assert_eq!(config.general.stop_cycle, Some(1000));
/// assert_eq!(config.memory.dram_clock_multiplier, 2);
/// assert!(!config.memory.disable_dram_model);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Threading, termination, and verbosity settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Chip topology (cores and shared banks)
    #[serde(default)]
    pub system: SystemConfig,
    /// Memory-timing model settings
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Animation (multi-frame) settings
    #[serde(default)]
    pub animation: AnimationConfig,
}

impl Config {
    /// Parses a configuration from a JSON string and validates it.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ConfigParse` for malformed JSON and
    /// `SimError::InvalidConfig` if the described machine is impossible.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Io` if the file cannot be read, otherwise the errors of
    /// [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Total number of simulated cores (`cores_per_bank * num_banks`).
    ///
    /// Saturates on overflow; [`Config::validate`] rejects such machines.
    pub const fn total_cores(&self) -> usize {
        self.system.cores_per_bank.saturating_mul(self.system.num_banks)
    }

    /// Checks that the configuration describes a machine the engine can run.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> SimResult<()> {
        if self.system.cores_per_bank == 0 {
            return Err(SimError::InvalidConfig(
                "system.cores_per_bank must be at least 1".into(),
            ));
        }
        if self.system.num_banks == 0 {
            return Err(SimError::InvalidConfig(
                "system.num_banks must be at least 1".into(),
            ));
        }
        if self
            .system
            .cores_per_bank
            .checked_mul(self.system.num_banks)
            .is_none()
        {
            return Err(SimError::InvalidConfig(
                "system.cores_per_bank * system.num_banks overflows the core count".into(),
            ));
        }
        if self.general.simulation_threads == 0 {
            return Err(SimError::InvalidConfig(
                "general.simulation_threads must be at least 1".into(),
            ));
        }
        if !self.memory.disable_dram_model && self.memory.dram_clock_multiplier == 0 {
            return Err(SimError::InvalidConfig(
                "memory.dram_clock_multiplier must be at least 1 while the DRAM model is enabled"
                    .into(),
            ));
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Requested number of worker threads (clamped to the core count at run time)
    #[serde(default = "GeneralConfig::default_threads")]
    pub simulation_threads: usize,

    /// Run every core on the calling thread, without the cycle barrier
    #[serde(default)]
    pub serial_execution: bool,

    /// Absolute cycle at which the run is forced to stop; `None` runs until every core halts
    #[serde(default)]
    pub stop_cycle: Option<u64>,

    /// Enable debug-level logging in the CLI
    #[serde(default)]
    pub verbose: bool,
}

impl GeneralConfig {
    /// Returns the default worker thread count.
    fn default_threads() -> usize {
        defaults::SIMULATION_THREADS
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            simulation_threads: defaults::SIMULATION_THREADS,
            serial_execution: false,
            stop_cycle: None,
            verbose: false,
        }
    }
}

/// Chip topology.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SystemConfig {
    /// Cores attached to each shared bank
    #[serde(default = "SystemConfig::default_cores_per_bank")]
    pub cores_per_bank: usize,

    /// Number of shared cache banks
    #[serde(default = "SystemConfig::default_num_banks")]
    pub num_banks: usize,
}

impl SystemConfig {
    /// Returns the default number of cores per bank.
    fn default_cores_per_bank() -> usize {
        defaults::CORES_PER_BANK
    }

    /// Returns the default number of shared banks.
    fn default_num_banks() -> usize {
        defaults::NUM_BANKS
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            cores_per_bank: defaults::CORES_PER_BANK,
            num_banks: defaults::NUM_BANKS,
        }
    }
}

/// Memory-timing model configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemoryConfig {
    /// Skip every call into the memory-timing model; banks fall back to naive DRAM timing
    #[serde(default)]
    pub disable_dram_model: bool,

    /// Memory-model ticks per core cycle
    #[serde(default = "MemoryConfig::default_multiplier")]
    pub dram_clock_multiplier: u32,

    /// Request latency of the reference memory model, in DRAM cycles
    #[serde(default = "MemoryConfig::default_latency")]
    pub dram_latency: u64,
}

impl MemoryConfig {
    /// Returns the default DRAM-to-core clock ratio.
    fn default_multiplier() -> u32 {
        defaults::DRAM_CLOCK_MULTIPLIER
    }

    /// Returns the default reference memory latency.
    fn default_latency() -> u64 {
        defaults::DRAM_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            disable_dram_model: false,
            dram_clock_multiplier: defaults::DRAM_CLOCK_MULTIPLIER,
            dram_latency: defaults::DRAM_LATENCY,
        }
    }
}

/// Animation settings for multi-frame runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnimationConfig {
    /// Number of frames to animate; `0` renders a single still frame
    #[serde(default)]
    pub num_frames: usize,

    /// Rebuild the spatial index every N frames; `0` never rebuilds
    #[serde(default)]
    pub rebuild_frequency: u32,
}
