//! ECS resources holding the flow's observable state.
//!
//! Systems are the only writers. Consumers read through [`crate::view::RideView`].

use bevy_ecs::prelude::Resource;

use crate::clock::Leg;
use crate::model::{Coordinate, Driver, Location, Passenger, Route, TripEarnings};
use crate::progress::ProgressStream;
use crate::state::RideState;

/// The single current-state cell. The state is replaced, never edited in place.
#[derive(Debug, Default, Resource)]
pub struct RideStateCell {
    state: RideState,
}

impl RideStateCell {
    pub fn get(&self) -> RideState {
        self.state
    }

    /// Replaces the state and returns the previous one if it changed.
    pub(crate) fn replace(&mut self, next: RideState) -> Option<RideState> {
        if self.state == next {
            return None;
        }
        Some(std::mem::replace(&mut self.state, next))
    }
}

/// Car marker on the map. `None` until the app has loaded.
#[derive(Debug, Clone, Copy, Default, Resource)]
pub struct CarPosition(pub Option<Coordinate>);

/// Route of the leg currently shown; cleared on reset.
#[derive(Debug, Clone, Default, Resource)]
pub struct ActiveRoute(pub Option<Route>);

impl ActiveRoute {
    pub fn waypoints(&self) -> &[Coordinate] {
        self.0.as_ref().map(|r| r.waypoints.as_slice()).unwrap_or(&[])
    }
}

/// The leg whose progress stream is in flight.
#[derive(Debug)]
pub struct LegInFlight {
    pub leg: Leg,
    pub stream: ProgressStream,
}

/// Tracks the single in-flight progress producer. Timer events carry the
/// generation they were scheduled under; cancelling bumps the generation so
/// stale timers are dropped.
#[derive(Debug, Default, Resource)]
pub struct ActiveLeg {
    generation: u64,
    in_flight: Option<LegInFlight>,
}

impl ActiveLeg {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn in_flight(&self) -> Option<&LegInFlight> {
        self.in_flight.as_ref()
    }

    pub fn in_flight_mut(&mut self) -> Option<&mut LegInFlight> {
        self.in_flight.as_mut()
    }

    pub fn start(&mut self, leg: Leg, stream: ProgressStream) {
        self.in_flight = Some(LegInFlight { leg, stream });
    }

    pub fn finish(&mut self) {
        self.in_flight = None;
    }

    /// Drops the in-flight stream and invalidates every pending timer.
    pub fn cancel(&mut self) -> u64 {
        self.in_flight = None;
        self.generation += 1;
        self.generation
    }
}

/// Locations and participants loaded on app start.
#[derive(Debug, Clone, Default, Resource)]
pub struct TripContext {
    pub pickup: Option<Location>,
    pub destination: Option<Location>,
    pub passengers: Vec<Passenger>,
    pub driver: Option<Driver>,
}

/// Earnings of the finished trip; `None` until the trip completes.
#[derive(Debug, Clone, Default, Resource)]
pub struct TripEarningsCell(pub Option<TripEarnings>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_reports_previous_state_only_on_change() {
        let mut cell = RideStateCell::default();
        assert_eq!(cell.replace(RideState::Idle), None);
        assert_eq!(
            cell.replace(RideState::OfferingRide { progress: 0.0 }),
            Some(RideState::Idle)
        );
        assert_eq!(cell.get(), RideState::OfferingRide { progress: 0.0 });
    }

    #[test]
    fn cancel_invalidates_previous_generation() {
        let mut leg = ActiveLeg::default();
        let before = leg.generation();
        leg.start(Leg::Pickup, ProgressStream::new(100, 50).expect("stream"));
        assert!(leg.in_flight().is_some());

        let after = leg.cancel();
        assert_ne!(before, after);
        assert!(!leg.is_current(before));
        assert!(leg.is_current(after));
        assert!(leg.in_flight().is_none());
    }
}
