//! JSON export of the recorded timeline.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bevy_ecs::prelude::World;
use serde::Serialize;

use crate::error::ExportError;
use crate::telemetry::{PositionSample, RideTelemetry, StateTransitionRecord};

/// Serialized form of [`RideTelemetry`].
#[derive(Debug, Serialize)]
pub struct TimelineExport<'a> {
    pub completed_trips: u32,
    pub ignored_events: u32,
    pub transitions: &'a [StateTransitionRecord],
    pub position_samples: &'a [PositionSample],
}

impl<'a> From<&'a RideTelemetry> for TimelineExport<'a> {
    fn from(telemetry: &'a RideTelemetry) -> Self {
        Self {
            completed_trips: telemetry.completed_trips,
            ignored_events: telemetry.ignored_events,
            transitions: &telemetry.transitions,
            position_samples: &telemetry.position_samples,
        }
    }
}

pub fn write_timeline_json<W: Write>(writer: W, telemetry: &RideTelemetry) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, &TimelineExport::from(telemetry))?;
    Ok(())
}

pub fn write_timeline_json_file<P: AsRef<Path>>(
    path: P,
    telemetry: &RideTelemetry,
) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_timeline_json(&mut writer, telemetry)?;
    writer.flush()?;
    Ok(())
}

/// Exports the telemetry recorded in `world`.
pub fn export_world_timeline<P: AsRef<Path>>(world: &World, path: P) -> Result<(), ExportError> {
    let telemetry = world
        .get_resource::<RideTelemetry>()
        .ok_or(ExportError::MissingTelemetry)?;
    write_timeline_json_file(path, telemetry)
}
