//! Read-only view of the flow for observers (UI, CLI, tests).

use bevy_ecs::prelude::World;

use crate::clock::SimulationClock;
use crate::ecs::{ActiveRoute, CarPosition, RideStateCell, TripContext, TripEarningsCell};
use crate::model::{Coordinate, Driver, Location, Passenger, TripEarnings};
use crate::state::RideState;

/// Borrowed snapshot of everything a screen would render.
#[derive(Debug, Clone, Copy)]
pub struct RideView<'w> {
    pub now_ms: u64,
    pub state: RideState,
    pub car_position: Option<Coordinate>,
    pub route_waypoints: &'w [Coordinate],
    pub pickup: Option<&'w Location>,
    pub destination: Option<&'w Location>,
    pub passengers: &'w [Passenger],
    pub driver: Option<&'w Driver>,
    pub trip_earnings: Option<&'w TripEarnings>,
}

impl<'w> RideView<'w> {
    /// Reads the view from a world built with [`crate::scenario::build_scenario`].
    /// Returns `None` if the flow resources are missing.
    pub fn from_world(world: &'w World) -> Option<Self> {
        let context = world.get_resource::<TripContext>()?;
        Some(Self {
            now_ms: world.get_resource::<SimulationClock>()?.now(),
            state: world.get_resource::<RideStateCell>()?.get(),
            car_position: world.get_resource::<CarPosition>()?.0,
            route_waypoints: world.get_resource::<ActiveRoute>()?.waypoints(),
            pickup: context.pickup.as_ref(),
            destination: context.destination.as_ref(),
            passengers: &context.passengers,
            driver: context.driver.as_ref(),
            trip_earnings: world.get_resource::<TripEarningsCell>()?.0.as_ref(),
        })
    }
}

/// Current state, or `Idle` if the world has no state cell yet.
pub fn ride_state(world: &World) -> RideState {
    world
        .get_resource::<RideStateCell>()
        .map(|cell| cell.get())
        .unwrap_or_default()
}
