//! Ride state machine: states, events and the transition table.
//!
//! The table is a pure function ([`RideState::on_event`]); timing of automatic
//! follow-up events lives in the systems and the [`crate::clock::SimulationClock`].

use serde::{Deserialize, Serialize};

/// Where the driver is in the flow. Progress values are fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum RideState {
    /// Main map view, nothing in flight.
    #[default]
    Idle,
    /// Ride accepted, driver heading to the pickup.
    OfferingRide { progress: f32 },
    /// Driver waiting at the pickup for the rider.
    AtPickup,
    /// Rider on board, heading to the destination.
    InProgress { progress: f32 },
    /// Trip finished, earnings available.
    Completed,
}

impl RideState {
    pub fn progress(&self) -> Option<f32> {
        match self {
            RideState::OfferingRide { progress } | RideState::InProgress { progress } => {
                Some(*progress)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RideState::Idle => "Idle",
            RideState::OfferingRide { .. } => "OfferingRide",
            RideState::AtPickup => "AtPickup",
            RideState::InProgress { .. } => "InProgress",
            RideState::Completed => "Completed",
        }
    }

    /// Whether `event` applies to this state. Events that do not apply leave
    /// the state unchanged.
    pub fn accepts(&self, event: &RideEvent) -> bool {
        matches!(
            (self, event),
            (_, RideEvent::AppLoad | RideEvent::ResetSimulation)
                | (RideState::Idle, RideEvent::OfferRideClicked)
                | (RideState::OfferingRide { .. }, RideEvent::GetToPickup { .. })
                | (RideState::AtPickup, RideEvent::RiderAction(_))
                | (
                    RideState::InProgress { .. },
                    RideEvent::HeadingToDestination { .. } | RideEvent::TripEnded
                )
        )
    }

    /// Next state for `event`. Events that do not apply to the current state
    /// leave it unchanged.
    pub fn on_event(&self, event: &RideEvent) -> RideState {
        match (self, event) {
            (_, RideEvent::AppLoad) | (_, RideEvent::ResetSimulation) => RideState::Idle,
            (RideState::Idle, RideEvent::OfferRideClicked) => {
                RideState::OfferingRide { progress: 0.0 }
            }
            (RideState::OfferingRide { progress }, RideEvent::GetToPickup { progress: p }) => {
                RideState::OfferingRide {
                    progress: advance(*progress, *p),
                }
            }
            (RideState::AtPickup, RideEvent::RiderAction(_)) => {
                RideState::InProgress { progress: 0.0 }
            }
            (
                RideState::InProgress { progress },
                RideEvent::HeadingToDestination { progress: p },
            ) => RideState::InProgress {
                progress: advance(*progress, *p),
            },
            (RideState::InProgress { .. }, RideEvent::TripEnded) => RideState::Completed,
            (state, _) => *state,
        }
    }

    /// The internal leg-end transition: pickup leg finished.
    pub fn on_pickup_reached(&self) -> RideState {
        match self {
            RideState::OfferingRide { .. } => RideState::AtPickup,
            state => *state,
        }
    }
}

/// Progress never moves backwards within a leg and stays within `[0, 1]`.
fn advance(current: f32, reported: f32) -> f32 {
    if reported.is_nan() {
        return current;
    }
    reported.clamp(0.0, 1.0).max(current)
}

/// What the rider did at the pickup. Both variants lead to the same next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiderAction {
    DidntShow,
    PickedUp,
}

impl RiderAction {
    /// Maps the pickup swipe gesture to an action.
    pub fn from_pickup_swipe(did_show: bool) -> Self {
        if did_show {
            RiderAction::PickedUp
        } else {
            RiderAction::DidntShow
        }
    }
}

/// Inputs to the dispatcher, from the app surface or from the scripted timers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RideEvent {
    AppLoad,
    OfferRideClicked,
    GetToPickup { progress: f32 },
    RiderAction(RiderAction),
    HeadingToDestination { progress: f32 },
    TripEnded,
    ResetSimulation,
}
