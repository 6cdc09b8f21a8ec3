use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, Leg, SimulationClock};
use crate::ecs::{ActiveLeg, RideStateCell};
use crate::scenario::FlowTiming;
use crate::state::RideEvent;
use crate::systems::apply_event;
use crate::telemetry::RideTelemetry;

/// Rider picked up or didn't show. Both actions start the destination leg.
pub fn rider_action_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    timing: Res<FlowTiming>,
    active_leg: Res<ActiveLeg>,
    mut state: ResMut<RideStateCell>,
    mut telemetry: Option<ResMut<RideTelemetry>>,
) {
    let EventKind::Dispatch(ride_event @ RideEvent::RiderAction(action)) = event.0.kind else {
        return;
    };
    let now = event.0.timestamp;

    if apply_event(now, &mut state, telemetry.as_deref_mut(), &ride_event).is_none() {
        return;
    }
    tracing::info!(at_ms = now, ?action, "rider action at pickup");

    clock.schedule_in(
        timing.leg_start_delay_ms(Leg::Destination),
        EventKind::LegStart {
            leg: Leg::Destination,
            generation: active_leg.generation(),
        },
    );
}
