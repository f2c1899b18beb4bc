//! # Cycle Barrier Tests
//!
//! Exclusivity of the last-arriver update, lockstep liveness, halt accounting,
//! re-arming, and abandonment.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mcsim_core::common::SimError;
use mcsim_core::sim::barrier::{CycleBarrier, Episode};
use mcsim_core::sim::Engine;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{MachineBuilder, config, init_tracing};
use crate::common::mocks::shared::SharedCounters;

/// Shared state counting last-arriver updates.
#[derive(Debug, Default)]
struct Ticker {
    ticks: u64,
}

#[rstest]
#[case(1, 50)]
#[case(2, 200)]
#[case(8, 200)]
fn test_shared_update_runs_once_per_episode(#[case] threads: usize, #[case] cycles: u64) {
    let barrier = Arc::new(CycleBarrier::new(threads, Ticker::default()));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut seen = Vec::new();
                for _ in 0..cycles {
                    let episode = barrier
                        .arrive(false, |t: &mut Ticker| t.ticks += 1)
                        .expect("arrive");
                    seen.push(episode.cycle);
                }
                seen
            })
        })
        .collect();

    let expected: Vec<u64> = (1..=cycles).collect();
    for handle in handles {
        assert_eq!(handle.join().expect("participant panicked"), expected);
    }
    assert_eq!(barrier.with_shared(|t| t.ticks), cycles);
}

#[test]
fn test_engine_steps_shared_resources_exactly_n_times() {
    init_tracing();
    let cycles = 120;
    let machine = MachineBuilder::new(8).banks(3).build();
    let (mut engine, counters, _log) = machine.into_engine(&config(8, 4, Some(cycles)));

    let run = engine.run().expect("run");
    assert_eq!(run.cycles, cycles);
    assert_eq!(SharedCounters::get(&counters.bank_rises), 3 * cycles);
    assert_eq!(SharedCounters::get(&counters.bank_falls), 3 * cycles);
    assert_eq!(SharedCounters::get(&counters.memory_ticks), 4 * cycles);
    assert_eq!(engine.with_shared(|s| s.cycles_stepped()), cycles);
}

#[test]
fn test_no_core_runs_ahead_of_another() {
    let machine = MachineBuilder::new(6).build();
    let (mut engine, _counters, log) = machine.into_engine(&config(6, 3, Some(40)));
    let _ = engine.run().expect("run");

    // Every edge of cycle N is logged before any edge of cycle N + 1.
    let cycles: Vec<u64> = log.edges().iter().map(|e| e.cycle()).collect();
    assert!(cycles.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(cycles.len(), 6 * 40 * 4);

    let snapshots = engine.snapshot().expect("snapshot");
    assert!(snapshots.iter().all(|s| s.cycle_num == 40));
}

#[test]
fn test_all_halted_once_every_participant_retires() {
    let barrier = Arc::new(CycleBarrier::new(2, ()));
    let other = {
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            let first = barrier.arrive(true, |_| {}).expect("arrive");
            let second = barrier.arrive(false, |_| {}).expect("arrive");
            (first, second)
        })
    };

    let first = barrier.arrive(false, |_| {}).expect("arrive");
    let second = barrier.arrive(true, |_| {}).expect("arrive");
    let (other_first, other_second) = other.join().expect("participant panicked");

    assert_eq!(first, Episode { cycle: 1, all_halted: false });
    assert_eq!(second, Episode { cycle: 2, all_halted: true });
    assert_eq!(first, other_first);
    assert_eq!(second, other_second);
}

#[test]
fn test_rearm_restarts_episode_count() {
    let barrier = CycleBarrier::new(1, ());
    let _ = barrier.arrive(true, |_| {}).expect("arrive");
    let done = barrier.arrive(false, |_| {}).expect("arrive");
    assert_eq!(done, Episode { cycle: 2, all_halted: true });

    barrier.rearm();
    let again = barrier.arrive(false, |_| {}).expect("arrive");
    assert_eq!(again, Episode { cycle: 1, all_halted: false });
    assert_eq!(barrier.participants(), 1);
}

#[test]
fn test_abandon_releases_waiters_with_error() {
    let barrier = Arc::new(CycleBarrier::new(2, ()));
    let waiter = {
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || barrier.arrive(false, |_| {}))
    };

    // Give the waiter time to block; the result is the same if it has not yet.
    thread::sleep(Duration::from_millis(20));
    barrier.abandon();

    let result = waiter.join().expect("waiter panicked");
    assert!(matches!(result, Err(SimError::BarrierAbandoned)));
    assert!(barrier.is_abandoned());
    assert!(matches!(
        barrier.arrive(false, |_| {}),
        Err(SimError::BarrierAbandoned)
    ));
}

#[test]
fn test_engines_are_independent() {
    let handles: Vec<_> = (0..2u64)
        .map(|i| {
            thread::spawn(move || {
                let machine = MachineBuilder::new(4).build();
                let stop = 25 + i * 10;
                let (mut engine, counters, _log): (Engine, _, _) =
                    machine.into_engine(&config(4, 2, Some(stop)));
                let run = engine.run().expect("run");
                (stop, run.cycles, SharedCounters::get(&counters.bank_rises))
            })
        })
        .collect();

    for handle in handles {
        let (stop, cycles, rises) = handle.join().expect("engine thread panicked");
        assert_eq!(cycles, stop);
        assert_eq!(rises, stop);
    }
}
