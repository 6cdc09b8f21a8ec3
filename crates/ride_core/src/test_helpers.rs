//! Test helpers for common test setup and utilities.
//!
//! This module provides shared test utilities to reduce duplication across test files.

use bevy_ecs::prelude::{Schedule, World};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::RideStateCell;
use crate::scenario::{build_scenario, FlowParams};
use crate::state::RideState;

/// Create a test world with every flow resource and default timings.
///
/// # Panics
///
/// Panics if the default parameters are invalid (should never happen).
pub fn create_test_world() -> World {
    create_test_world_with(&FlowParams::default())
}

/// Create a test world with custom parameters.
///
/// # Panics
///
/// Panics if `params` fail validation.
pub fn create_test_world_with(params: &FlowParams) -> World {
    let mut world = World::new();
    build_scenario(&mut world, params).expect("test params should be valid");
    world
}

/// Short timings that keep the default step structure: 10 ms ticks,
/// 100 ms pickup leg, 120 ms destination leg, 10 ms pauses.
pub fn fast_params() -> FlowParams {
    FlowParams::default()
        .with_update_interval_ms(10)
        .with_leg_durations_ms(100, 120)
        .with_pauses_ms(10, 10, 10)
}

/// Force the state cell, bypassing the transition table.
pub fn set_ride_state(world: &mut World, state: RideState) {
    world.resource_mut::<RideStateCell>().replace(state);
}

/// Schedule `kind` at the current time, pop it, and run `schedule` once with it
/// as the current event. Returns the event's timestamp.
///
/// # Panics
///
/// Panics if an earlier event is already queued.
pub fn run_single_event(world: &mut World, schedule: &mut Schedule, kind: EventKind) -> u64 {
    let event = {
        let mut clock = world.resource_mut::<SimulationClock>();
        let now = clock.now();
        clock.schedule_at(now, kind);
        clock.pop_next().expect("event just scheduled")
    };
    assert_eq!(event.kind, kind, "an earlier event was already queued");
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    event.timestamp
}
