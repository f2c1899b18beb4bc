//! Persistent worker pool for threaded execution.
//!
//! One named OS thread per partition is spawned when the pool is built and lives until
//! the pool is dropped. Each worker owns its partition's cores outright; the pool talks
//! to it only through a command channel and a per-worker reply channel:
//!
//! * `Run`: re-armed barrier, run the partition until the stop condition.
//! * `Reset`: restore every owned core for a fresh frame.
//! * `Snapshot`: report the owned cores.
//! * `Shutdown`: leave the command loop.
//!
//! The shared resource set sits inside the cycle barrier, so between runs the pool can
//! reach it through [`WorkerPool::with_shared`] while every worker is parked on its
//! command channel.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, info};

use crate::common::{SimError, SimResult};
use crate::core::{Core, CoreSnapshot};
use crate::sim::barrier::CycleBarrier;
use crate::sim::halt::HaltMonitor;
use crate::sim::partition::ThreadPartition;
use crate::sim::scheduler::{PartitionRun, run_partition};
use crate::soc::SharedResourceSet;

#[derive(Debug, Clone, Copy)]
enum Command {
    Run,
    Reset,
    Snapshot,
    Shutdown,
}

#[derive(Debug)]
enum Reply {
    Ran(SimResult<PartitionRun>),
    Reset,
    Snapshot(Vec<CoreSnapshot>),
}

#[derive(Debug)]
struct Worker {
    index: usize,
    commands: Sender<Command>,
    replies: Receiver<Reply>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    fn send(&self, command: Command) -> SimResult<()> {
        self.commands
            .send(command)
            .map_err(|_| SimError::WorkerLost { index: self.index })
    }

    fn recv(&self) -> SimResult<Reply> {
        self.replies
            .recv()
            .map_err(|_| SimError::WorkerLost { index: self.index })
    }
}

/// Wakes the other participants if this worker unwinds while they may be waiting on it.
struct AbandonOnPanic<'a>(&'a CycleBarrier<SharedResourceSet>);

impl Drop for AbandonOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.abandon();
        }
    }
}

fn worker_main(
    mut cores: Vec<Core>,
    barrier: &CycleBarrier<SharedResourceSet>,
    monitor: HaltMonitor,
    commands: &Receiver<Command>,
    replies: &Sender<Reply>,
) {
    let _guard = AbandonOnPanic(barrier);
    while let Ok(command) = commands.recv() {
        let reply = match command {
            Command::Run => Reply::Ran(run_partition(
                &mut cores,
                barrier,
                monitor,
                SharedResourceSet::step,
            )),
            Command::Reset => {
                for core in &mut cores {
                    core.reset();
                }
                Reply::Reset
            }
            Command::Snapshot => Reply::Snapshot(cores.iter().map(Core::snapshot).collect()),
            Command::Shutdown => break,
        };
        if replies.send(reply).is_err() {
            break;
        }
    }
}

/// Threads that run partitions in lockstep across frames.
#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<Worker>,
    barrier: Arc<CycleBarrier<SharedResourceSet>>,
}

impl WorkerPool {
    /// Spawns one worker per partition and hands each its cores.
    ///
    /// `partitions` must cover `cores` contiguously in index order.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ThreadSpawn` if the OS refuses a thread. Workers spawned
    /// before the failure are shut down.
    pub fn new(
        cores: Vec<Core>,
        partitions: &[ThreadPartition],
        shared: SharedResourceSet,
        monitor: HaltMonitor,
    ) -> SimResult<Self> {
        let barrier = Arc::new(CycleBarrier::new(partitions.len().max(1), shared));
        let mut pool = Self {
            workers: Vec::with_capacity(partitions.len()),
            barrier,
        };

        let mut cores = cores.into_iter();
        for (index, part) in partitions.iter().enumerate() {
            let owned: Vec<Core> = cores.by_ref().take(part.len()).collect();
            let (command_tx, command_rx) = channel::unbounded();
            let (reply_tx, reply_rx) = channel::unbounded();
            let barrier = Arc::clone(&pool.barrier);
            let (start, end) = (part.start, part.end);

            let handle = thread::Builder::new()
                .name(format!("sim-worker-{index}"))
                .spawn(move || {
                    info!(worker = index, start, end, "worker running cores {start}..{end}");
                    worker_main(owned, &barrier, monitor, &command_rx, &reply_tx);
                    debug!(worker = index, "worker exiting");
                })
                .map_err(|source| SimError::ThreadSpawn { index, source })?;

            pool.workers.push(Worker {
                index,
                commands: command_tx,
                replies: reply_rx,
                handle: Some(handle),
            });
        }
        Ok(pool)
    }

    /// Number of worker threads.
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    fn broadcast(&self, command: Command) -> SimResult<()> {
        for worker in &self.workers {
            worker.send(command)?;
        }
        Ok(())
    }

    /// Runs every partition until the stop condition and returns the common outcome.
    ///
    /// # Errors
    ///
    /// Returns `SimError::WorkerLost` if a worker died, or `SimError::BarrierAbandoned`
    /// reported by the survivors of such a failure.
    pub fn run(&self) -> SimResult<PartitionRun> {
        self.barrier.rearm();
        self.broadcast(Command::Run)?;

        // Drain every reply before surfacing an error so no worker is left mid-command.
        // A lost worker is the root cause; the survivors only see the abandoned barrier.
        let mut outcome = None;
        let mut lost = None;
        let mut failed = None;
        for worker in &self.workers {
            match worker.recv() {
                Ok(Reply::Ran(Ok(run))) => {
                    let _ = outcome.get_or_insert(run);
                }
                Ok(Reply::Ran(Err(e))) => {
                    let _ = failed.get_or_insert(e);
                }
                Ok(_) => {
                    let _ = lost.get_or_insert(SimError::WorkerLost {
                        index: worker.index,
                    });
                }
                Err(e) => {
                    let _ = lost.get_or_insert(e);
                }
            }
        }
        if let Some(e) = lost.or(failed) {
            return Err(e);
        }
        outcome.ok_or(SimError::WorkerLost { index: 0 })
    }

    /// Collects a snapshot of every core, in core index order.
    ///
    /// # Errors
    ///
    /// Returns `SimError::WorkerLost` if a worker is gone.
    pub fn snapshot(&self) -> SimResult<Vec<CoreSnapshot>> {
        self.broadcast(Command::Snapshot)?;
        let mut snapshots = Vec::new();
        for worker in &self.workers {
            match worker.recv()? {
                Reply::Snapshot(mut cores) => snapshots.append(&mut cores),
                _ => return Err(SimError::WorkerLost { index: worker.index }),
            }
        }
        Ok(snapshots)
    }

    /// Resets every core and the shared resource set.
    ///
    /// # Errors
    ///
    /// Returns `SimError::WorkerLost` if a worker is gone.
    pub fn reset(&self) -> SimResult<()> {
        self.broadcast(Command::Reset)?;
        for worker in &self.workers {
            match worker.recv()? {
                Reply::Reset => {}
                _ => return Err(SimError::WorkerLost { index: worker.index }),
            }
        }
        self.barrier.with_shared(SharedResourceSet::reset);
        Ok(())
    }

    /// Runs `f` on the shared resource set while every worker is idle.
    pub fn with_shared<R>(&self, f: impl FnOnce(&mut SharedResourceSet) -> R) -> R {
        self.barrier.with_shared(f)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for worker in &self.workers {
            let _ = worker.commands.send(Command::Shutdown);
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                let _ = handle.join();
            }
        }
    }
}
