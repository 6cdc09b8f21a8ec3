use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, Leg, SimulationClock};
use crate::ecs::{ActiveLeg, RideStateCell};
use crate::state::RideEvent;
use crate::systems::commit_state;
use crate::telemetry::RideTelemetry;

/// End of a leg after the arrival pause: the driver is at the pickup, or the
/// trip ends at the destination.
pub fn leg_settled_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    active_leg: Res<ActiveLeg>,
    mut state: ResMut<RideStateCell>,
    mut telemetry: Option<ResMut<RideTelemetry>>,
) {
    let EventKind::LegSettled { leg, generation } = event.0.kind else {
        return;
    };
    if !active_leg.is_current(generation) {
        tracing::trace!(leg = leg.as_str(), generation, "stale leg end dropped");
        return;
    }
    match leg {
        Leg::Pickup => {
            let next = state.get().on_pickup_reached();
            commit_state(event.0.timestamp, &mut state, telemetry.as_deref_mut(), next);
        }
        Leg::Destination => {
            clock.schedule_in(0, EventKind::Dispatch(RideEvent::TripEnded));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::Schedule;

    use crate::state::RideState;
    use crate::test_helpers::{create_test_world, run_single_event, set_ride_state};

    #[test]
    fn pickup_leg_end_reaches_pickup() {
        let mut world = create_test_world();
        set_ride_state(&mut world, RideState::OfferingRide { progress: 1.0 });
        let mut schedule = Schedule::default();
        schedule.add_systems(leg_settled_system);

        run_single_event(
            &mut world,
            &mut schedule,
            EventKind::LegSettled {
                leg: Leg::Pickup,
                generation: 0,
            },
        );

        assert_eq!(world.resource::<RideStateCell>().get(), RideState::AtPickup);
    }

    #[test]
    fn destination_leg_end_dispatches_trip_ended() {
        let mut world = create_test_world();
        set_ride_state(&mut world, RideState::InProgress { progress: 1.0 });
        let mut schedule = Schedule::default();
        schedule.add_systems(leg_settled_system);

        let at = run_single_event(
            &mut world,
            &mut schedule,
            EventKind::LegSettled {
                leg: Leg::Destination,
                generation: 0,
            },
        );

        let next = world
            .resource_mut::<SimulationClock>()
            .pop_next()
            .expect("trip ended");
        assert_eq!(next.kind, EventKind::Dispatch(RideEvent::TripEnded));
        assert_eq!(next.timestamp, at);
        assert_eq!(
            world.resource::<RideStateCell>().get(),
            RideState::InProgress { progress: 1.0 }
        );
    }
}
