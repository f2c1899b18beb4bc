//! Engine facade.
//!
//! Owns the cores and the shared resource set for the lifetime of a simulation and
//! drives them with either the serial executor or the persistent worker pool, chosen
//! once from the configuration. Several engines may coexist in one process; none of
//! the synchronization state is global.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::common::{SimError, SimResult};
use crate::config::Config;
use crate::core::{Core, CoreSnapshot};
use crate::sim::halt::{HaltMonitor, StopReason};
use crate::sim::partition::{ThreadPartition, clamp_threads, partition};
use crate::sim::pool::WorkerPool;
use crate::sim::serial::SerialExecutor;
use crate::soc::SharedResourceSet;

#[derive(Debug)]
enum Executor {
    Serial {
        executor: SerialExecutor,
        shared: SharedResourceSet,
    },
    Threaded(WorkerPool),
}

/// Outcome of one run of the engine (one frame).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Cycles completed by the furthest core.
    pub cycles: u64,
    /// Why the run ended.
    pub reason: StopReason,
    /// Wall-clock time spent in the run.
    pub host_time: Duration,
}

/// Cycle-synchronized simulation of a set of cores and their shared resources.
#[derive(Debug)]
pub struct Engine {
    executor: Executor,
    partitions: Vec<ThreadPartition>,
    monitor: HaltMonitor,
}

impl Engine {
    /// Builds an engine and, for threaded execution, spawns its worker pool.
    ///
    /// The requested thread count is clamped to the number of cores.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` if the configuration is invalid or `cores` is
    /// empty, and `SimError::ThreadSpawn` if a worker thread cannot be created.
    pub fn new(cores: Vec<Core>, shared: SharedResourceSet, config: &Config) -> SimResult<Self> {
        config.validate()?;
        if cores.is_empty() {
            return Err(SimError::InvalidConfig("no cores to simulate".to_string()));
        }
        let num_cores = cores.len();
        let monitor = HaltMonitor::new(config.general.stop_cycle);

        if config.general.serial_execution {
            info!(cores = num_cores, "serial execution");
            return Ok(Self {
                executor: Executor::Serial {
                    executor: SerialExecutor::new(cores, monitor),
                    shared,
                },
                partitions: vec![ThreadPartition {
                    start: 0,
                    end: num_cores,
                }],
                monitor,
            });
        }

        let requested = config.general.simulation_threads;
        let threads = clamp_threads(requested, num_cores);
        if threads != requested {
            warn!(requested, threads, cores = num_cores, "clamping simulation threads");
        }
        let partitions = partition(num_cores, threads);
        info!(threads, cores = num_cores, "threaded execution");
        let pool = WorkerPool::new(cores, &partitions, shared, monitor)?;

        Ok(Self {
            executor: Executor::Threaded(pool),
            partitions,
            monitor,
        })
    }

    /// Runs until every core halts or the stop cycle is reached.
    ///
    /// # Errors
    ///
    /// Returns `SimError::WorkerLost` or `SimError::BarrierAbandoned` if a worker
    /// thread died during the run.
    pub fn run(&mut self) -> SimResult<RunSummary> {
        let start = Instant::now();
        let run = match &mut self.executor {
            Executor::Serial { executor, shared } => executor.run(shared),
            Executor::Threaded(pool) => pool.run()?,
        };
        Ok(RunSummary {
            cycles: run.cycles,
            reason: run.reason,
            host_time: start.elapsed(),
        })
    }

    /// Snapshots every core in index order.
    ///
    /// # Errors
    ///
    /// Returns `SimError::WorkerLost` if a worker thread is gone.
    pub fn snapshot(&self) -> SimResult<Vec<CoreSnapshot>> {
        match &self.executor {
            Executor::Serial { executor, .. } => {
                Ok(executor.cores().iter().map(Core::snapshot).collect())
            }
            Executor::Threaded(pool) => pool.snapshot(),
        }
    }

    /// Resets all frame state: cores, shared banks, memory model, and registered
    /// chip-wide state. Partitions and worker threads are kept.
    ///
    /// # Errors
    ///
    /// Returns `SimError::WorkerLost` if a worker thread is gone.
    pub fn reset(&mut self) -> SimResult<()> {
        debug!("resetting frame state");
        match &mut self.executor {
            Executor::Serial { executor, shared } => {
                executor.reset();
                shared.reset();
                Ok(())
            }
            Executor::Threaded(pool) => pool.reset(),
        }
    }

    /// Runs `f` on the shared resource set between runs.
    pub fn with_shared<R>(&mut self, f: impl FnOnce(&mut SharedResourceSet) -> R) -> R {
        match &mut self.executor {
            Executor::Serial { shared, .. } => f(shared),
            Executor::Threaded(pool) => pool.with_shared(f),
        }
    }

    /// Core ranges per worker (a single range in serial mode).
    pub fn partitions(&self) -> &[ThreadPartition] {
        &self.partitions
    }

    /// Number of simulated cores.
    pub fn num_cores(&self) -> usize {
        self.partitions.last().map_or(0, |p| p.end)
    }

    /// Returns `true` when running on the calling thread without a barrier.
    pub const fn is_serial(&self) -> bool {
        matches!(self.executor, Executor::Serial { .. })
    }

    /// The configured stop cycle.
    pub const fn stop_cycle(&self) -> Option<u64> {
        self.monitor.stop_cycle()
    }
}
