#![allow(dead_code)]

use bevy_ecs::prelude::{Schedule, World};
use ride_core::model::Coordinate;
use ride_core::runner::{initialize_simulation, ride_schedule, run_until_empty};
use ride_core::scenario::{build_scenario, FlowParams};

/// Upper bound on steps for any single drain of the queue in tests.
pub const MAX_STEPS: usize = 10_000;

/// A world built from `params` with `AppLoad` already processed.
pub fn loaded_world(params: &FlowParams) -> (World, Schedule) {
    let mut world = World::new();
    build_scenario(&mut world, params).expect("valid params");
    initialize_simulation(&mut world);
    let mut schedule = ride_schedule();
    run_until_empty(&mut world, &mut schedule, MAX_STEPS);
    (world, schedule)
}

/// Drains the queue and asserts it converged.
pub fn drain(world: &mut World, schedule: &mut Schedule) -> usize {
    let steps = run_until_empty(world, schedule, MAX_STEPS);
    assert!(steps < MAX_STEPS, "runner did not converge");
    steps
}

pub fn assert_close(actual: Coordinate, expected: Coordinate) {
    assert!(
        (actual.lat - expected.lat).abs() < 1e-9 && (actual.lng - expected.lng).abs() < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}
