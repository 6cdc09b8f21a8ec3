use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind};
use crate::ecs::{ActiveLeg, ActiveRoute, CarPosition, RideStateCell, TripEarningsCell};
use crate::repository::RideDataSourceResource;
use crate::state::RideEvent;
use crate::systems::apply_event;
use crate::telemetry::RideTelemetry;

/// Back to the main map from any state so the flow can be replayed.
pub fn reset_system(
    event: Res<CurrentEvent>,
    source: Res<RideDataSourceResource>,
    mut active_leg: ResMut<ActiveLeg>,
    mut state: ResMut<RideStateCell>,
    mut car: ResMut<CarPosition>,
    mut route: ResMut<ActiveRoute>,
    mut earnings: ResMut<TripEarningsCell>,
    mut telemetry: Option<ResMut<RideTelemetry>>,
) {
    if event.0.kind != EventKind::Dispatch(RideEvent::ResetSimulation) {
        return;
    }
    let now = event.0.timestamp;
    let previous = state.get();

    let generation = active_leg.cancel();
    apply_event(
        now,
        &mut state,
        telemetry.as_deref_mut(),
        &RideEvent::ResetSimulation,
    );
    car.0 = Some(source.0.start_location().coordinate);
    route.0 = None;
    earnings.0 = None;

    tracing::info!(at_ms = now, from = previous.name(), generation, "simulation reset");
}
