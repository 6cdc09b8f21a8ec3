//! Progress tick: pulls the next value from the active leg's stream, publishes
//! it as a progress event and moves the car along the route.
//!
//! A tick schedules the next tick one update interval later. After the final
//! value (1.0) it schedules [`EventKind::LegSettled`] after the arrival pause.

use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, Leg, SimulationClock};
use crate::ecs::{ActiveLeg, ActiveRoute, CarPosition, RideStateCell};
use crate::scenario::FlowTiming;
use crate::state::RideEvent;
use crate::systems::{apply_event, car_position_for};
use crate::telemetry::{PositionSample, RideTelemetry, TelemetryConfig};

#[allow(clippy::too_many_arguments)]
pub fn progress_tick_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    timing: Res<FlowTiming>,
    route: Res<ActiveRoute>,
    mut active_leg: ResMut<ActiveLeg>,
    mut state: ResMut<RideStateCell>,
    mut car: ResMut<CarPosition>,
    telemetry_config: Option<Res<TelemetryConfig>>,
    mut telemetry: Option<ResMut<RideTelemetry>>,
) {
    let EventKind::ProgressTick { leg, generation } = event.0.kind else {
        return;
    };
    if !active_leg.is_current(generation) {
        tracing::trace!(leg = leg.as_str(), generation, "stale progress tick dropped");
        return;
    }
    let Some(in_flight) = active_leg.in_flight_mut() else {
        return;
    };
    if in_flight.leg != leg {
        return;
    }
    let interval_ms = in_flight.stream.interval_ms();
    let Some(progress) = in_flight.stream.next() else {
        active_leg.finish();
        return;
    };
    let now = event.0.timestamp;

    let ride_event = match leg {
        Leg::Pickup => RideEvent::GetToPickup { progress },
        Leg::Destination => RideEvent::HeadingToDestination { progress },
    };
    apply_event(now, &mut state, telemetry.as_deref_mut(), &ride_event);

    if let Some(position) = car_position_for(state.get(), route.0.as_ref()) {
        car.0 = Some(position);
        let record = telemetry_config.map(|c| c.record_positions).unwrap_or(true);
        if let (true, Some(telemetry)) = (record, telemetry.as_deref_mut()) {
            let progress = state.get().progress().unwrap_or(progress);
            telemetry
                .position_samples
                .push(PositionSample::new(now, leg, progress, position));
        }
    }

    if progress >= 1.0 {
        active_leg.finish();
        clock.schedule_in(
            timing.arrival_pause_ms,
            EventKind::LegSettled { leg, generation },
        );
    } else {
        clock.schedule_in(interval_ms, EventKind::ProgressTick { leg, generation });
    }
}
