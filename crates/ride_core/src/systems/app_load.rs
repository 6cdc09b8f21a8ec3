use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind};
use crate::ecs::{ActiveLeg, ActiveRoute, CarPosition, RideStateCell, TripContext, TripEarningsCell};
use crate::repository::RideDataSourceResource;
use crate::state::RideEvent;
use crate::systems::apply_event;
use crate::telemetry::RideTelemetry;

/// Loads the fixtures shown on the main map and puts the flow in `Idle`.
#[allow(clippy::too_many_arguments)]
pub fn app_load_system(
    event: Res<CurrentEvent>,
    source: Res<RideDataSourceResource>,
    mut state: ResMut<RideStateCell>,
    mut active_leg: ResMut<ActiveLeg>,
    mut context: ResMut<TripContext>,
    mut car: ResMut<CarPosition>,
    mut route: ResMut<ActiveRoute>,
    mut earnings: ResMut<TripEarningsCell>,
    mut telemetry: Option<ResMut<RideTelemetry>>,
) {
    if event.0.kind != EventKind::Dispatch(RideEvent::AppLoad) {
        return;
    }
    let now = event.0.timestamp;

    active_leg.cancel();
    apply_event(now, &mut state, telemetry.as_deref_mut(), &RideEvent::AppLoad);

    let source = &source.0;
    *context = TripContext {
        pickup: Some(source.pickup_location()),
        destination: Some(source.destination()),
        passengers: source.passengers(),
        driver: Some(source.driver()),
    };
    car.0 = Some(source.start_location().coordinate);
    route.0 = None;
    earnings.0 = None;

    tracing::debug!(
        at_ms = now,
        passengers = context.passengers.len(),
        "app loaded"
    );
}
