//! Telemetry: records state transitions and car position samples for analysis.

use bevy_ecs::prelude::Resource;
use h3o::Resolution;
use serde::Serialize;

use crate::clock::Leg;
use crate::model::Coordinate;
use crate::state::RideState;

/// Resolution used to bucket car positions into H3 cells.
pub const POSITION_CELL_RESOLUTION: Resolution = Resolution::Nine;

/// One state change, recorded whenever the state cell is replaced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTransitionRecord {
    pub at_ms: u64,
    pub from: RideState,
    pub to: RideState,
}

/// Car position after one progress emission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSample {
    pub at_ms: u64,
    pub leg: Leg,
    pub progress: f32,
    pub coordinate: Coordinate,
    /// H3 cell (resolution 9) as raw index.
    pub cell: Option<u64>,
}

impl PositionSample {
    pub fn new(at_ms: u64, leg: Leg, progress: f32, coordinate: Coordinate) -> Self {
        Self {
            at_ms,
            leg,
            progress,
            coordinate,
            cell: coordinate
                .to_cell(POSITION_CELL_RESOLUTION)
                .map(u64::from),
        }
    }
}

#[derive(Debug, Clone, Copy, Resource)]
pub struct TelemetryConfig {
    pub record_positions: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            record_positions: true,
        }
    }
}

/// Collects flow telemetry. Insert as a resource to record transitions.
#[derive(Debug, Default, Resource)]
pub struct RideTelemetry {
    pub transitions: Vec<StateTransitionRecord>,
    pub position_samples: Vec<PositionSample>,
    pub completed_trips: u32,
    /// Dispatched events that did not apply to the state they arrived in.
    pub ignored_events: u32,
}

impl RideTelemetry {
    pub fn record_transition(&mut self, at_ms: u64, from: RideState, to: RideState) {
        self.transitions.push(StateTransitionRecord { at_ms, from, to });
    }

    /// Time of the first transition into a state named `name`.
    pub fn first_entered(&self, name: &str) -> Option<u64> {
        self.transitions
            .iter()
            .find(|t| t.to.name() == name)
            .map(|t| t.at_ms)
    }

    /// Sequence of distinct state names, collapsing progress updates.
    pub fn state_path(&self) -> Vec<&'static str> {
        let mut path: Vec<&'static str> = Vec::new();
        for record in &self.transitions {
            if path.is_empty() {
                path.push(record.from.name());
            }
            let name = record.to.name();
            if path.last() != Some(&name) {
                path.push(name);
            }
        }
        path
    }
}
