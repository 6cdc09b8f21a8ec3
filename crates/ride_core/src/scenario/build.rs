use bevy_ecs::prelude::World;

use crate::clock::SimulationClock;
use crate::ecs::{ActiveLeg, ActiveRoute, CarPosition, RideStateCell, TripContext, TripEarningsCell};
use crate::error::ConfigError;
use crate::repository::{MockRideRepository, RideDataSource, RideDataSourceResource};
use crate::scenario::params::{FlowParams, SimulationEndTimeMs};
use crate::telemetry::{RideTelemetry, TelemetryConfig};

/// Seeds `world` with every resource the ride schedule needs, backed by the
/// static fixture repository.
pub fn build_scenario(world: &mut World, params: &FlowParams) -> Result<(), ConfigError> {
    let source = MockRideRepository::with_segments(
        params.pickup_route_segments,
        params.destination_route_segments,
    );
    build_scenario_with_source(world, params, Box::new(source))
}

/// Like [`build_scenario`] with a custom data source.
pub fn build_scenario_with_source(
    world: &mut World,
    params: &FlowParams,
    source: Box<dyn RideDataSource>,
) -> Result<(), ConfigError> {
    params.validate()?;

    world.insert_resource(SimulationClock::default());
    world.insert_resource(params.timing());
    world.insert_resource(RideDataSourceResource(source));
    world.insert_resource(RideStateCell::default());
    world.insert_resource(ActiveLeg::default());
    world.insert_resource(ActiveRoute::default());
    world.insert_resource(CarPosition::default());
    world.insert_resource(TripContext::default());
    world.insert_resource(TripEarningsCell::default());
    world.insert_resource(TelemetryConfig {
        record_positions: params.record_positions,
    });
    world.insert_resource(RideTelemetry::default());
    match params.simulation_end_time_ms {
        Some(end_ms) => world.insert_resource(SimulationEndTimeMs(end_ms)),
        None => {
            world.remove_resource::<SimulationEndTimeMs>();
        }
    }

    tracing::debug!(?params, "scenario built");
    Ok(())
}
