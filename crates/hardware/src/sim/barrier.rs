//! Cycle barrier with last-arriver election.
//!
//! Every worker thread calls [`CycleBarrier::arrive`] after stepping its partition for
//! a cycle. Arrivals count down under a single mutex; the thread whose arrival brings
//! the count to zero is the *last arriver* for that episode. Before anyone is released,
//! the last arriver:
//!
//! 1. runs the per-cycle shared update on the state held inside the barrier,
//! 2. records the episode outcome (cycle count, whether every partition has halted),
//! 3. re-arms the countdown and advances the generation,
//!
//! and then broadcasts. Waiters sleep until the generation changes, so a wakeup from an
//! older episode (or from a previous frame) can never be mistaken for the current one.
//!
//! The shared state `S` lives inside the mutex. Only the closure passed by the last
//! arriver, or [`CycleBarrier::with_shared`] between runs, can reach it, so the
//! "mutated exactly once per cycle, never concurrently with a core step" rule holds by
//! construction instead of by per-resource locking.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::common::{SimError, SimResult};

/// Outcome of one resolved barrier episode, identical for every participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Episode {
    /// Episodes resolved since the barrier was last armed; equals the number of
    /// cycles every participating core has completed once it closes this cycle.
    pub cycle: u64,
    /// `true` once every participant has reported its partition fully halted.
    pub all_halted: bool,
}

#[derive(Debug)]
struct EpisodeState<S> {
    participants: usize,
    remaining: usize,
    live: usize,
    generation: u64,
    episodes: u64,
    last: Episode,
    abandoned: bool,
    shared: S,
}

/// Re-armable, generation-counted rendezvous for `participants` threads.
#[derive(Debug)]
pub struct CycleBarrier<S> {
    state: Mutex<EpisodeState<S>>,
    released: Condvar,
}

impl<S> CycleBarrier<S> {
    /// Creates a barrier for `participants` threads guarding `shared`.
    ///
    /// # Panics
    ///
    /// Panics if `participants` is zero.
    pub fn new(participants: usize, shared: S) -> Self {
        assert!(participants > 0, "cycle barrier needs at least one participant");
        Self {
            state: Mutex::new(EpisodeState {
                participants,
                remaining: participants,
                live: participants,
                generation: 0,
                episodes: 0,
                last: Episode::default(),
                abandoned: false,
                shared,
            }),
            released: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EpisodeState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of threads that must arrive to resolve an episode.
    pub fn participants(&self) -> usize {
        self.lock().participants
    }

    /// Arrives at the barrier for the current cycle.
    ///
    /// `retiring` must be `true` exactly once per run for each participant: on the first
    /// arrival after all cores in its partition have halted. `on_last` runs only in the
    /// last arriver, while every other participant is blocked.
    ///
    /// # Errors
    ///
    /// Returns `SimError::BarrierAbandoned` if a participant died; the episode can never
    /// resolve in that case.
    pub fn arrive(&self, retiring: bool, on_last: impl FnOnce(&mut S)) -> SimResult<Episode> {
        let mut state = self.lock();
        if state.abandoned {
            return Err(SimError::BarrierAbandoned);
        }
        if retiring {
            debug_assert!(state.live > 0, "partition retired twice in one run");
            state.live -= 1;
        }
        debug_assert!(state.remaining > 0, "more arrivals than participants");
        state.remaining -= 1;

        if state.remaining == 0 {
            on_last(&mut state.shared);
            state.episodes += 1;
            state.last = Episode {
                cycle: state.episodes,
                all_halted: state.live == 0,
            };
            state.remaining = state.participants;
            state.generation = state.generation.wrapping_add(1);
            let episode = state.last;
            self.released.notify_all();
            return Ok(episode);
        }

        let generation = state.generation;
        let state = self
            .released
            .wait_while(state, |s| s.generation == generation && !s.abandoned)
            .unwrap_or_else(PoisonError::into_inner);
        if state.generation == generation {
            return Err(SimError::BarrierAbandoned);
        }
        Ok(state.last)
    }

    /// Re-arms the barrier for a new run.
    ///
    /// Must only be called while no participant is inside [`CycleBarrier::arrive`].
    pub fn rearm(&self) {
        let mut state = self.lock();
        state.remaining = state.participants;
        state.live = state.participants;
        state.episodes = 0;
        state.last = Episode::default();
        state.generation = state.generation.wrapping_add(1);
    }

    /// Marks the barrier unusable and wakes every waiter with an error.
    pub fn abandon(&self) {
        let mut state = self.lock();
        state.abandoned = true;
        self.released.notify_all();
    }

    /// Returns `true` if a participant has abandoned the barrier.
    pub fn is_abandoned(&self) -> bool {
        self.lock().abandoned
    }

    /// Runs `f` on the shared state outside of any episode.
    pub fn with_shared<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock().shared)
    }
}
