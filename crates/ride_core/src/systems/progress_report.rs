use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind};
use crate::ecs::{ActiveRoute, CarPosition, RideStateCell};
use crate::state::RideEvent;
use crate::systems::{apply_event, car_position_for};
use crate::telemetry::RideTelemetry;

/// Progress reported from outside the timers (`GetToPickup` or
/// `HeadingToDestination` dispatched directly). Progress only moves forward;
/// the car follows the resulting state.
pub fn progress_report_system(
    event: Res<CurrentEvent>,
    route: Res<ActiveRoute>,
    mut state: ResMut<RideStateCell>,
    mut car: ResMut<CarPosition>,
    mut telemetry: Option<ResMut<RideTelemetry>>,
) {
    let EventKind::Dispatch(
        ride_event @ (RideEvent::GetToPickup { .. } | RideEvent::HeadingToDestination { .. }),
    ) = event.0.kind
    else {
        return;
    };

    let Some(next) = apply_event(
        event.0.timestamp,
        &mut state,
        telemetry.as_deref_mut(),
        &ride_event,
    ) else {
        return;
    };
    if let Some(position) = car_position_for(next, route.0.as_ref()) {
        car.0 = Some(position);
    }
}
