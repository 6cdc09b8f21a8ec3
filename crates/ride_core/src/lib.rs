pub mod clock;
pub mod ecs;
pub mod error;
pub mod model;
pub mod progress;
pub mod repository;
pub mod runner;
pub mod scenario;
pub mod state;
pub mod systems;
pub mod telemetry;
pub mod telemetry_export;
pub mod view;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
