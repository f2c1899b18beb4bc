//! # Engine Tests
//!
//! Construction, partitioning, snapshots, and failure handling of the threaded engine.

use mcsim_core::common::{HaltLine, SimError};
use mcsim_core::core::{Core, HardwareModule};
use mcsim_core::sim::Engine;
use mcsim_core::sim::partition::ThreadPartition;
use pretty_assertions::assert_eq;

use crate::common::harness::{MachineBuilder, config, init_tracing};
use crate::common::mocks::hardware::{FixedUnit, PanicAt};

#[test]
fn test_partitions_follow_thread_count() {
    let machine = MachineBuilder::new(10).build();
    let (engine, _, _) = machine.into_engine(&config(10, 4, Some(1)));
    assert!(!engine.is_serial());
    assert_eq!(engine.num_cores(), 10);
    assert_eq!(
        engine.partitions(),
        &[
            ThreadPartition { start: 0, end: 3 },
            ThreadPartition { start: 3, end: 6 },
            ThreadPartition { start: 6, end: 8 },
            ThreadPartition { start: 8, end: 10 },
        ]
    );
}

#[test]
fn test_threads_clamped_to_cores() {
    init_tracing();
    let machine = MachineBuilder::new(3).build();
    let (mut engine, _, _) = machine.into_engine(&config(3, 16, Some(5)));
    assert_eq!(engine.partitions().len(), 3);
    assert_eq!(engine.run().expect("run").cycles, 5);
}

#[test]
fn test_empty_core_list_rejected() {
    let machine = MachineBuilder::new(1).build();
    let err = Engine::new(Vec::new(), machine.shared, &config(1, 1, None)).expect_err("no cores");
    assert!(matches!(err, SimError::InvalidConfig(_)));
}

#[test]
fn test_invalid_config_rejected() {
    let machine = MachineBuilder::new(2).build();
    let err =
        Engine::new(machine.cores, machine.shared, &config(2, 0, None)).expect_err("0 threads");
    assert!(matches!(err, SimError::InvalidConfig(_)));
}

#[test]
fn test_snapshot_in_core_order() {
    let machine = MachineBuilder::new(7).build();
    let (mut engine, _, _) = machine.into_engine(&config(7, 3, Some(12)));
    let _ = engine.run().expect("run");

    let snapshots = engine.snapshot().expect("snapshot");
    assert_eq!(
        snapshots.iter().map(|s| s.id).collect::<Vec<_>>(),
        (0..7).collect::<Vec<_>>()
    );
    assert!(snapshots.iter().all(|s| s.cycle_num == 12));
    assert_eq!(engine.stop_cycle(), Some(12));
}

#[test]
fn test_runs_are_repeatable_after_reset() {
    let machine = MachineBuilder::new(4).all_halt_at(8).build();
    let (mut engine, _, _) = machine.into_engine(&config(4, 2, None));

    let first = engine.run().expect("first run");
    let first_snapshot = engine.snapshot().expect("snapshot");
    engine.reset().expect("reset");
    let second = engine.run().expect("second run");

    assert_eq!(first.cycles, second.cycles);
    assert_eq!(first_snapshot, engine.snapshot().expect("snapshot"));
}

#[test]
fn test_dying_worker_fails_the_run() {
    let machine = MachineBuilder::new(1).build();
    let cores: Vec<Core> = (0..4)
        .map(|id| {
            let mut modules: Vec<Box<dyn HardwareModule>> =
                vec![Box::new(FixedUnit::new("alu", 0.1))];
            if id == 3 {
                modules.push(Box::new(PanicAt { cycle: 5 }));
            }
            Core::new(id, HaltLine::new(), modules)
        })
        .collect();
    let mut engine = Engine::new(cores, machine.shared, &config(4, 2, Some(100))).expect("engine");

    let err = engine.run().expect_err("a worker panicked");
    assert!(
        matches!(err, SimError::WorkerLost { index: 1 } | SimError::BarrierAbandoned),
        "{err:?}"
    );
}
