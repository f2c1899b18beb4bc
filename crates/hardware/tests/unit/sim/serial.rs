//! # Serial Executor Tests
//!
//! Index-order stepping without a barrier, and equivalence with a single worker thread.

use mcsim_core::core::CoreSnapshot;
use mcsim_core::sim::StopReason;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{MachineBuilder, config, serial_config};
use crate::common::mocks::shared::SharedCounters;

fn final_state(snapshots: &[CoreSnapshot]) -> Vec<(u64, bool)> {
    snapshots.iter().map(|s| (s.cycle_num, s.halted)).collect()
}

#[test]
fn test_serial_visits_cores_in_index_order() {
    // Stall estimates are ignored without a scheduler.
    let machine = MachineBuilder::new(3)
        .stalls(vec![0, 0, 9])
        .all_halt_at(2)
        .build();
    let (mut engine, _counters, log) = machine.into_engine(&serial_config(3, None));
    assert!(engine.is_serial());

    let _ = engine.run().expect("run");
    assert_eq!(log.rise_order(0), vec![0, 1, 2]);
    assert_eq!(log.rise_order(1), vec![0, 1, 2]);
}

#[test]
fn test_serial_skips_halted_cores() {
    let machine = MachineBuilder::new(3)
        .halt_at(vec![Some(2), Some(5), Some(3)])
        .build();
    let (mut engine, counters, log) = machine.into_engine(&serial_config(3, None));

    let run = engine.run().expect("run");
    assert_eq!((run.cycles, run.reason), (5, StopReason::AllHalted));
    assert_eq!(
        final_state(&engine.snapshot().expect("snapshot")),
        vec![(2, true), (5, true), (3, true)]
    );
    assert_eq!(log.rise_order(4), vec![1]);
    assert_eq!(SharedCounters::get(&counters.bank_rises), 5);
}

#[test]
fn test_serial_stop_cycle_marks_cores_halted() {
    let machine = MachineBuilder::new(2).halt_at(vec![None, Some(2)]).build();
    let (mut engine, _counters, _log) = machine.into_engine(&serial_config(2, Some(3)));

    let run = engine.run().expect("run");
    assert_eq!((run.cycles, run.reason), (3, StopReason::StopCycle));
    assert_eq!(
        final_state(&engine.snapshot().expect("snapshot")),
        vec![(3, true), (2, true)]
    );
}

#[rstest]
#[case(1, Some(4), None)]
#[case(1, None, Some(10))]
#[case(3, Some(6), None)]
#[case(3, None, Some(5))]
#[case(4, Some(12), Some(7))]
fn test_serial_matches_single_thread(
    #[case] cores: usize,
    #[case] halt_at: Option<u64>,
    #[case] stop_cycle: Option<u64>,
) {
    let build = || {
        MachineBuilder::new(cores)
            .halt_at(vec![halt_at; cores])
            .build()
    };

    let (mut serial, serial_counters, _) = build().into_engine(&serial_config(cores, stop_cycle));
    let (mut threaded, threaded_counters, _) =
        build().into_engine(&config(cores, 1, stop_cycle));

    let serial_run = serial.run().expect("serial run");
    let threaded_run = threaded.run().expect("threaded run");

    assert_eq!(serial_run.cycles, threaded_run.cycles);
    assert_eq!(serial_run.reason, threaded_run.reason);
    assert_eq!(
        serial.snapshot().expect("snapshot"),
        threaded.snapshot().expect("snapshot")
    );
    assert_eq!(
        SharedCounters::get(&serial_counters.bank_rises),
        SharedCounters::get(&threaded_counters.bank_rises)
    );
}

#[test]
fn test_staggered_halts_diverge_from_threaded() {
    let build = || {
        MachineBuilder::new(3)
            .halt_at(vec![Some(2), Some(5), Some(3)])
            .build()
    };
    let (mut serial, _, _) = build().into_engine(&serial_config(3, None));
    let (mut threaded, _, _) = build().into_engine(&config(3, 1, None));

    assert_eq!(serial.run().expect("serial run").cycles, 5);
    assert_eq!(threaded.run().expect("threaded run").cycles, 5);

    // Halted cores stop counting in serial mode but keep being clocked by a worker.
    assert_eq!(
        final_state(&serial.snapshot().expect("snapshot")),
        vec![(2, true), (5, true), (3, true)]
    );
    assert_eq!(
        final_state(&threaded.snapshot().expect("snapshot")),
        vec![(5, true); 3]
    );
}
