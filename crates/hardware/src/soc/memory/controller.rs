//! Memory controller implementations for DRAM timing.
//!
//! This module provides:
//! 1. **MemoryController:** The tick-driven interface the cycle barrier's last arriver
//!    advances a fixed number of times per core cycle (the DRAM clock domain is faster).
//! 2. **SimpleController:** Fixed-latency request queue, counted in DRAM cycles.
//!
//! Controllers are `Send` so the shared resource set can live behind the cycle barrier's
//! mutex and be driven by whichever worker thread arrives last.

use std::collections::VecDeque;

/// Trait for tick-driven memory-timing models.
///
/// Requests are submitted by shared cache banks during their rising edge; the model
/// retires them as it is ticked.
pub trait MemoryController: Send {
    /// Queues a line request for the given physical address.
    fn submit(&mut self, addr: u64);

    /// Advances the model by one DRAM cycle.
    fn tick(&mut self);

    /// Returns and clears the addresses whose requests completed since the last call.
    fn take_completed(&mut self) -> Vec<u64>;

    /// Number of DRAM cycles ticked since the last reset.
    fn dram_cycles(&self) -> u64;

    /// Restores the post-setup state for a fresh frame.
    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    addr: u64,
    ready_at: u64,
}

/// Fixed-latency memory controller; every request completes `latency` DRAM cycles after submission.
#[derive(Debug)]
pub struct SimpleController {
    latency: u64,
    dram_cycle: u64,
    in_flight: VecDeque<InFlight>,
    completed: Vec<u64>,
    total_requests: u64,
}

impl SimpleController {
    /// Creates a simple controller with the given fixed latency in DRAM cycles.
    ///
    /// # Arguments
    ///
    /// * `latency` - DRAM cycles per request.
    ///
    /// # Returns
    ///
    /// A new `SimpleController` with nothing in flight.
    pub fn new(latency: u64) -> Self {
        Self {
            latency,
            dram_cycle: 0,
            in_flight: VecDeque::new(),
            completed: Vec::new(),
            total_requests: 0,
        }
    }

    /// Number of requests currently in flight.
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Number of requests submitted since the last reset.
    pub const fn total_requests(&self) -> u64 {
        self.total_requests
    }
}

impl MemoryController for SimpleController {
    fn submit(&mut self, addr: u64) {
        self.total_requests += 1;
        self.in_flight.push_back(InFlight {
            addr,
            ready_at: self.dram_cycle + self.latency,
        });
    }

    fn tick(&mut self) {
        self.dram_cycle += 1;
        // Latency is uniform, so the queue is ordered by ready_at.
        while let Some(front) = self.in_flight.front() {
            if front.ready_at > self.dram_cycle {
                break;
            }
            if let Some(done) = self.in_flight.pop_front() {
                self.completed.push(done.addr);
            }
        }
    }

    fn take_completed(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.completed)
    }

    fn dram_cycles(&self) -> u64 {
        self.dram_cycle
    }

    fn reset(&mut self) {
        self.dram_cycle = 0;
        self.in_flight.clear();
        self.completed.clear();
        self.total_requests = 0;
    }
}
