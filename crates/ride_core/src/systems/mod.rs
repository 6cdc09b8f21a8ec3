//! Event-reacting systems. Each system handles one [`crate::clock::EventKind`]
//! and is gated by a run condition in [`crate::runner::ride_schedule`].

pub mod app_load;
pub mod leg_settled;
pub mod leg_start;
pub mod offer_ride;
pub mod progress_report;
pub mod progress_tick;
pub mod reset;
pub mod rider_action;
pub mod trip_ended;

use crate::ecs::RideStateCell;
use crate::progress::position_on_route;
use crate::model::{Coordinate, Route};
use crate::state::{RideEvent, RideState};
use crate::telemetry::RideTelemetry;

/// Replaces the state with `next` and records the change. Returns whether the
/// state changed.
pub(crate) fn commit_state(
    now: u64,
    cell: &mut RideStateCell,
    telemetry: Option<&mut RideTelemetry>,
    next: RideState,
) -> bool {
    let Some(previous) = cell.replace(next) else {
        return false;
    };
    if previous.name() == next.name() {
        tracing::trace!(at_ms = now, state = next.name(), progress = ?next.progress(), "progress");
    } else {
        tracing::debug!(at_ms = now, from = previous.name(), to = next.name(), "ride state changed");
    }
    if let Some(telemetry) = telemetry {
        telemetry.record_transition(now, previous, next);
    }
    true
}

/// Runs `event` through the transition table and commits the result. Returns
/// the resulting state, or `None` when the event does not apply to the
/// current state (counted as ignored).
pub(crate) fn apply_event(
    now: u64,
    cell: &mut RideStateCell,
    mut telemetry: Option<&mut RideTelemetry>,
    event: &RideEvent,
) -> Option<RideState> {
    let current = cell.get();
    if !current.accepts(event) {
        tracing::debug!(at_ms = now, state = current.name(), ?event, "event ignored");
        if let Some(telemetry) = telemetry {
            telemetry.ignored_events += 1;
        }
        return None;
    }
    let next = current.on_event(event);
    commit_state(now, cell, telemetry.as_deref_mut(), next);
    Some(next)
}

/// Car position for the progress carried by `state`, if it has any.
pub(crate) fn car_position_for(state: RideState, route: Option<&Route>) -> Option<Coordinate> {
    let progress = state.progress()?;
    position_on_route(route?, progress)
}
