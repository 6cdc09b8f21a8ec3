use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::clock::Leg;
use crate::error::ConfigError;

const DEFAULT_UPDATE_INTERVAL_MS: u64 = 50;
const DEFAULT_PICKUP_LEG_MS: u64 = 5000;
const DEFAULT_DESTINATION_LEG_MS: u64 = 6000;
/// Pause between accepting the ride and the car starting to move.
const DEFAULT_OFFER_DELAY_MS: u64 = 500;
/// Pause between the rider action and the destination leg starting.
const DEFAULT_TRIP_START_DELAY_MS: u64 = 500;
/// Pause at the end of each leg before the next transition.
const DEFAULT_ARRIVAL_PAUSE_MS: u64 = 500;
const DEFAULT_PICKUP_ROUTE_SEGMENTS: usize = 20;
const DEFAULT_DESTINATION_ROUTE_SEGMENTS: usize = 25;

/// Timings of the scripted choreography, in simulation milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource)]
pub struct FlowTiming {
    pub update_interval_ms: u64,
    pub pickup_leg_ms: u64,
    pub destination_leg_ms: u64,
    pub offer_delay_ms: u64,
    pub trip_start_delay_ms: u64,
    pub arrival_pause_ms: u64,
}

impl Default for FlowTiming {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            pickup_leg_ms: DEFAULT_PICKUP_LEG_MS,
            destination_leg_ms: DEFAULT_DESTINATION_LEG_MS,
            offer_delay_ms: DEFAULT_OFFER_DELAY_MS,
            trip_start_delay_ms: DEFAULT_TRIP_START_DELAY_MS,
            arrival_pause_ms: DEFAULT_ARRIVAL_PAUSE_MS,
        }
    }
}

impl FlowTiming {
    pub fn leg_duration_ms(&self, leg: Leg) -> u64 {
        match leg {
            Leg::Pickup => self.pickup_leg_ms,
            Leg::Destination => self.destination_leg_ms,
        }
    }

    /// Delay before the leg's progress stream starts, counted from the transition
    /// that triggers it.
    pub fn leg_start_delay_ms(&self, leg: Leg) -> u64 {
        match leg {
            Leg::Pickup => self.offer_delay_ms,
            Leg::Destination => self.trip_start_delay_ms,
        }
    }

    /// Time from the triggering transition until the leg is finished.
    pub fn leg_total_ms(&self, leg: Leg) -> u64 {
        let steps = self.leg_duration_ms(leg) / self.update_interval_ms.max(1);
        self.leg_start_delay_ms(leg) + steps * self.update_interval_ms + self.arrival_pause_ms
    }
}

/// Optional simulation end time in ms. The runner stops once the next event
/// would be at or after this timestamp.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationEndTimeMs(pub u64);

/// Parameters for building a ride flow simulation. Serializable so the CLI can
/// load them from a JSON file; missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowParams {
    pub update_interval_ms: u64,
    pub pickup_leg_ms: u64,
    pub destination_leg_ms: u64,
    pub offer_delay_ms: u64,
    pub trip_start_delay_ms: u64,
    pub arrival_pause_ms: u64,
    pub pickup_route_segments: usize,
    pub destination_route_segments: usize,
    /// Record every car position sample in telemetry, not only transitions.
    pub record_positions: bool,
    pub simulation_end_time_ms: Option<u64>,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            pickup_leg_ms: DEFAULT_PICKUP_LEG_MS,
            destination_leg_ms: DEFAULT_DESTINATION_LEG_MS,
            offer_delay_ms: DEFAULT_OFFER_DELAY_MS,
            trip_start_delay_ms: DEFAULT_TRIP_START_DELAY_MS,
            arrival_pause_ms: DEFAULT_ARRIVAL_PAUSE_MS,
            pickup_route_segments: DEFAULT_PICKUP_ROUTE_SEGMENTS,
            destination_route_segments: DEFAULT_DESTINATION_ROUTE_SEGMENTS,
            record_positions: true,
            simulation_end_time_ms: None,
        }
    }
}

impl FlowParams {
    pub fn with_update_interval_ms(mut self, interval_ms: u64) -> Self {
        self.update_interval_ms = interval_ms;
        self
    }

    /// Animated duration of the pickup and destination legs.
    pub fn with_leg_durations_ms(mut self, pickup_ms: u64, destination_ms: u64) -> Self {
        self.pickup_leg_ms = pickup_ms;
        self.destination_leg_ms = destination_ms;
        self
    }

    /// Offer delay, trip start delay and arrival pause.
    pub fn with_pauses_ms(mut self, offer_ms: u64, trip_start_ms: u64, arrival_ms: u64) -> Self {
        self.offer_delay_ms = offer_ms;
        self.trip_start_delay_ms = trip_start_ms;
        self.arrival_pause_ms = arrival_ms;
        self
    }

    pub fn with_route_segments(mut self, pickup: usize, destination: usize) -> Self {
        self.pickup_route_segments = pickup;
        self.destination_route_segments = destination;
        self
    }

    pub fn with_record_positions(mut self, record: bool) -> Self {
        self.record_positions = record;
        self
    }

    pub fn with_simulation_end_time_ms(mut self, end_ms: u64) -> Self {
        self.simulation_end_time_ms = Some(end_ms);
        self
    }

    /// Shrinks every timing by `factor` (at least 1), keeping the step count
    /// where possible. Handy for fast previews.
    pub fn scaled_down(mut self, factor: u64) -> Self {
        let factor = factor.max(1);
        self.update_interval_ms = (self.update_interval_ms / factor).max(1);
        self.pickup_leg_ms /= factor;
        self.destination_leg_ms /= factor;
        self.offer_delay_ms /= factor;
        self.trip_start_delay_ms /= factor;
        self.arrival_pause_ms /= factor;
        self
    }

    pub fn timing(&self) -> FlowTiming {
        FlowTiming {
            update_interval_ms: self.update_interval_ms,
            pickup_leg_ms: self.pickup_leg_ms,
            destination_leg_ms: self.destination_leg_ms,
            offer_delay_ms: self.offer_delay_ms,
            trip_start_delay_ms: self.trip_start_delay_ms,
            arrival_pause_ms: self.arrival_pause_ms,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_interval_ms == 0 {
            return Err(ConfigError::ZeroUpdateInterval);
        }
        for duration_ms in [self.pickup_leg_ms, self.destination_leg_ms] {
            if duration_ms < self.update_interval_ms {
                return Err(ConfigError::LegShorterThanInterval {
                    duration_ms,
                    interval_ms: self.update_interval_ms,
                });
            }
        }
        if self.pickup_route_segments == 0 {
            return Err(ConfigError::NoWaypointSegments {
                leg: Leg::Pickup.as_str(),
            });
        }
        if self.destination_route_segments == 0 {
            return Err(ConfigError::NoWaypointSegments {
                leg: Leg::Destination.as_str(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_match_timing() {
        let params = FlowParams::default();
        assert_eq!(params.validate(), Ok(()));
        assert_eq!(params.timing(), FlowTiming::default());
    }

    #[test]
    fn leg_total_covers_delay_stream_and_pause() {
        let timing = FlowTiming::default();
        assert_eq!(timing.leg_total_ms(Leg::Pickup), 500 + 5000 + 500);
        assert_eq!(timing.leg_total_ms(Leg::Destination), 500 + 6000 + 500);
    }

    #[test]
    fn validate_rejects_bad_timings_and_routes() {
        assert_eq!(
            FlowParams::default().with_update_interval_ms(0).validate(),
            Err(ConfigError::ZeroUpdateInterval)
        );
        assert_eq!(
            FlowParams::default().with_leg_durations_ms(40, 6000).validate(),
            Err(ConfigError::LegShorterThanInterval {
                duration_ms: 40,
                interval_ms: 50
            })
        );
        assert_eq!(
            FlowParams::default().with_route_segments(20, 0).validate(),
            Err(ConfigError::NoWaypointSegments { leg: "destination" })
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params: FlowParams =
            serde_json::from_str(r#"{ "update_interval_ms": 100, "pickup_leg_ms": 1000 }"#)
                .expect("params");
        assert_eq!(params.update_interval_ms, 100);
        assert_eq!(params.pickup_leg_ms, 1000);
        assert_eq!(params.destination_leg_ms, DEFAULT_DESTINATION_LEG_MS);
        assert!(params.record_positions);
    }

    #[test]
    fn scaled_down_keeps_params_valid() {
        let params = FlowParams::default().scaled_down(10);
        assert_eq!(params.update_interval_ms, 5);
        assert_eq!(params.pickup_leg_ms, 500);
        assert_eq!(params.offer_delay_ms, 50);
        assert_eq!(params.validate(), Ok(()));
    }
}
