//! Scenario setup: inserts the flow's resources into a world.
//!
//! [`FlowParams`] carries the timings of the scripted choreography and the
//! route resolution; [`build_scenario`] validates them and seeds the world.

mod build;
mod params;

pub use build::{build_scenario, build_scenario_with_source};
pub use params::{FlowParams, FlowTiming, SimulationEndTimeMs};
