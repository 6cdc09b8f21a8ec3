//! Progress simulation for one leg of the trip.
//!
//! A [`ProgressStream`] yields `steps + 1` evenly spaced values from 0.0 to
//! exactly 1.0, where `steps = duration_ms / interval_ms`. The stream is lazy
//! and single-use: the driver pulls one value per [`ProgressStream::interval_ms`]
//! of simulation time and starts a new stream for every leg.

use std::iter::FusedIterator;

use crate::error::ConfigError;
use crate::model::{Coordinate, Route};

#[derive(Debug, Clone)]
pub struct ProgressStream {
    steps: u64,
    next_step: u64,
    interval_ms: u64,
}

impl ProgressStream {
    pub fn new(duration_ms: u64, interval_ms: u64) -> Result<Self, ConfigError> {
        if interval_ms == 0 {
            return Err(ConfigError::ZeroUpdateInterval);
        }
        let steps = duration_ms / interval_ms;
        if steps == 0 {
            return Err(ConfigError::LegShorterThanInterval {
                duration_ms,
                interval_ms,
            });
        }
        Ok(Self {
            steps,
            next_step: 0,
            interval_ms,
        })
    }

    /// Delay between two consecutive emissions.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Time from the first emission to the final 1.0.
    pub fn span_ms(&self) -> u64 {
        self.steps * self.interval_ms
    }
}

impl Iterator for ProgressStream {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.next_step > self.steps {
            return None;
        }
        let progress = self.next_step as f32 / self.steps as f32;
        self.next_step += 1;
        Some(progress)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps + 1).saturating_sub(self.next_step) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProgressStream {}

impl FusedIterator for ProgressStream {}

/// Index into a route of `len` waypoints for `progress`:
/// `clamp(round(progress * (len - 1)), 0, len - 1)`.
pub fn waypoint_index(progress: f32, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    let scaled = (f64::from(progress) * last as f64).round();
    if scaled.is_nan() || scaled <= 0.0 {
        return Some(0);
    }
    Some((scaled as usize).min(last))
}

/// Car position on `route` for `progress`.
pub fn position_on_route(route: &Route, progress: f32) -> Option<Coordinate> {
    waypoint_index(progress, route.waypoints.len()).map(|idx| route.waypoints[idx])
}
