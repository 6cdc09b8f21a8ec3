//! Run the scripted driver flow once and print the state timeline.
//!
//! Run with: cargo run -p ride_core --example scenario_run

use bevy_ecs::prelude::World;
use ride_core::clock::ONE_SEC_MS;
use ride_core::runner::{dispatch, initialize_simulation, ride_schedule, run_until_empty};
use ride_core::scenario::{build_scenario, FlowParams};
use ride_core::state::{RideEvent, RiderAction};
use ride_core::telemetry::RideTelemetry;
use ride_core::view::RideView;

fn main() {
    let mut world = World::new();
    if let Err(err) = build_scenario(&mut world, &FlowParams::default()) {
        eprintln!("Invalid parameters: {}", err);
        return;
    }
    initialize_simulation(&mut world);
    let mut schedule = ride_schedule();
    let max_steps = 100_000;

    dispatch(&mut world, RideEvent::OfferRideClicked);
    let mut steps = run_until_empty(&mut world, &mut schedule, max_steps);
    dispatch(&mut world, RideEvent::RiderAction(RiderAction::PickedUp));
    steps += run_until_empty(&mut world, &mut schedule, max_steps);

    let telemetry = world.resource::<RideTelemetry>();
    println!("--- Scripted driver flow ---");
    println!("Steps executed: {}", steps);
    println!("State path: {}", telemetry.state_path().join(" -> "));
    for name in ["OfferingRide", "AtPickup", "InProgress", "Completed"] {
        if let Some(at) = telemetry.first_entered(name) {
            println!("  {:<13} at {:>6} ms ({:.1} s)", name, at, at as f64 / ONE_SEC_MS as f64);
        }
    }
    println!("Position samples: {}", telemetry.position_samples.len());

    if let Some(earnings) = RideView::from_world(&world).and_then(|v| v.trip_earnings) {
        println!(
            "Earnings: net {:.2}, bonus {:.2}, commission {:.2}, {:.2} km, {} riders helped",
            earnings.net_earnings,
            earnings.bonus,
            earnings.commission,
            earnings.distance_km,
            earnings.helped_riders
        );
    }
}
