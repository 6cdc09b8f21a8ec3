//! Configuration and export errors.
//!
//! Ride flow operations themselves cannot fail: fixtures are always present
//! and timings are validated once when the scenario is built.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("update interval must be greater than zero")]
    ZeroUpdateInterval,

    #[error("leg duration {duration_ms} ms is shorter than the update interval {interval_ms} ms")]
    LegShorterThanInterval { duration_ms: u64, interval_ms: u64 },

    #[error("route for the {leg} leg needs at least one waypoint segment")]
    NoWaypointSegments { leg: &'static str },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("telemetry resource missing from world")]
    MissingTelemetry,
}
