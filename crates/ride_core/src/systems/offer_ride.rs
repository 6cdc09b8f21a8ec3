use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, Leg, SimulationClock};
use crate::ecs::{ActiveLeg, RideStateCell};
use crate::scenario::FlowTiming;
use crate::state::RideEvent;
use crate::systems::apply_event;
use crate::telemetry::RideTelemetry;

/// Driver accepted the ride: show the offer sheet and start the pickup leg
/// after the offer delay.
pub fn offer_ride_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    timing: Res<FlowTiming>,
    active_leg: Res<ActiveLeg>,
    mut state: ResMut<RideStateCell>,
    mut telemetry: Option<ResMut<RideTelemetry>>,
) {
    if event.0.kind != EventKind::Dispatch(RideEvent::OfferRideClicked) {
        return;
    }
    let now = event.0.timestamp;

    if apply_event(
        now,
        &mut state,
        telemetry.as_deref_mut(),
        &RideEvent::OfferRideClicked,
    )
    .is_none()
    {
        return;
    }

    clock.schedule_in(
        timing.leg_start_delay_ms(Leg::Pickup),
        EventKind::LegStart {
            leg: Leg::Pickup,
            generation: active_leg.generation(),
        },
    );
}
