use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind};
use crate::ecs::{ActiveLeg, RideStateCell, TripEarningsCell};
use crate::repository::RideDataSourceResource;
use crate::state::RideEvent;
use crate::systems::apply_event;
use crate::telemetry::RideTelemetry;

/// Trip finished: publish the earnings and show the completion overlay.
pub fn trip_ended_system(
    event: Res<CurrentEvent>,
    source: Res<RideDataSourceResource>,
    mut active_leg: ResMut<ActiveLeg>,
    mut state: ResMut<RideStateCell>,
    mut earnings: ResMut<TripEarningsCell>,
    mut telemetry: Option<ResMut<RideTelemetry>>,
) {
    if event.0.kind != EventKind::Dispatch(RideEvent::TripEnded) {
        return;
    }
    let now = event.0.timestamp;

    if !state.get().accepts(&RideEvent::TripEnded) {
        apply_event(now, &mut state, telemetry.as_deref_mut(), &RideEvent::TripEnded);
        return;
    }

    // Invalidates the destination leg's pending timers, including a queued
    // LegSettled after the final tick.
    active_leg.cancel();
    earnings.0 = Some(source.0.trip_earnings());
    apply_event(now, &mut state, telemetry.as_deref_mut(), &RideEvent::TripEnded);

    if let Some(telemetry) = telemetry.as_deref_mut() {
        telemetry.completed_trips += 1;
    }
    tracing::info!(
        at_ms = now,
        net_earnings = earnings.0.as_ref().map(|e| e.net_earnings),
        "trip completed"
    );
}
