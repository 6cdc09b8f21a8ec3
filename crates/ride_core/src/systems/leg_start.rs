use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, Leg, SimulationClock};
use crate::ecs::{ActiveLeg, ActiveRoute, RideStateCell};
use crate::progress::ProgressStream;
use crate::repository::RideDataSourceResource;
use crate::scenario::FlowTiming;
use crate::state::RideState;

/// Starts the progress stream of a leg: loads the leg's route and schedules the
/// first progress tick immediately.
pub fn leg_start_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    timing: Res<FlowTiming>,
    source: Res<RideDataSourceResource>,
    state: Res<RideStateCell>,
    mut active_leg: ResMut<ActiveLeg>,
    mut route: ResMut<ActiveRoute>,
) {
    let EventKind::LegStart { leg, generation } = event.0.kind else {
        return;
    };
    if !active_leg.is_current(generation) {
        tracing::trace!(leg = leg.as_str(), generation, "stale leg start dropped");
        return;
    }
    let expected = matches!(
        (leg, state.get()),
        (Leg::Pickup, RideState::OfferingRide { .. }) | (Leg::Destination, RideState::InProgress { .. })
    );
    if !expected || active_leg.in_flight().is_some() {
        return;
    }

    let stream = match ProgressStream::new(timing.leg_duration_ms(leg), timing.update_interval_ms) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::warn!(leg = leg.as_str(), %err, "leg not started");
            return;
        }
    };

    route.0 = Some(match leg {
        Leg::Pickup => source.0.route_to_pickup(),
        Leg::Destination => source.0.route_to_destination(),
    });
    tracing::debug!(
        at_ms = event.0.timestamp,
        leg = leg.as_str(),
        steps = stream.steps(),
        waypoints = route.waypoints().len(),
        "leg started"
    );
    active_leg.start(leg, stream);
    clock.schedule_in(0, EventKind::ProgressTick { leg, generation });
}
