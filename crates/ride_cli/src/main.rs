use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bevy_ecs::prelude::{Schedule, World};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use ride_core::clock::Event;
use ride_core::runner::{
    dispatch, dispatch_at, initialize_simulation, ride_schedule, run_while_with_hook,
    RealtimePacer,
};
use ride_core::scenario::{build_scenario, FlowParams};
use ride_core::state::{RideEvent, RideState, RiderAction};
use ride_core::telemetry::RideTelemetry;
use ride_core::telemetry_export::export_world_timeline;
use ride_core::view::{ride_state, RideView};

const MAX_STEPS: usize = 1_000_000;

#[derive(Parser)]
#[command(
    name = "ride_cli",
    about = "Play the scripted driver flow: offer, pickup, trip, earnings"
)]
struct Cli {
    /// JSON file with flow parameters; missing fields use the defaults
    #[arg(long, env = "RIDE_FLOW_CONFIG")]
    config: Option<PathBuf>,
    /// Progress update interval in ms
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Duration of the drive to the pickup in ms
    #[arg(long)]
    pickup_ms: Option<u64>,
    /// Duration of the drive to the destination in ms
    #[arg(long)]
    destination_ms: Option<u64>,
    /// Stop once simulation time reaches this many ms
    #[arg(long)]
    end_ms: Option<u64>,
    /// What the driver reports at the pickup
    #[arg(long, value_enum, default_value_t = PickupOutcome::PickedUp)]
    rider_action: PickupOutcome,
    /// Dispatch a reset at this simulation time (ms)
    #[arg(long)]
    reset_after: Option<u64>,
    /// Pace events against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,
    /// Playback speed for --realtime (2.0 = twice as fast)
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
    /// Skip per-tick position samples in telemetry
    #[arg(long)]
    no_positions: bool,
    /// Write the recorded timeline as JSON to this path
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PickupOutcome {
    PickedUp,
    DidntShow,
}

impl From<PickupOutcome> for RiderAction {
    fn from(outcome: PickupOutcome) -> Self {
        match outcome {
            PickupOutcome::PickedUp => RiderAction::PickedUp,
            PickupOutcome::DidntShow => RiderAction::DidntShow,
        }
    }
}

fn load_params(cli: &Cli) -> Result<FlowParams> {
    let mut params = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<FlowParams>(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => FlowParams::default(),
    };

    if let Some(interval) = cli.interval_ms {
        params = params.with_update_interval_ms(interval);
    }
    let pickup_ms = cli.pickup_ms.unwrap_or(params.pickup_leg_ms);
    let destination_ms = cli.destination_ms.unwrap_or(params.destination_leg_ms);
    params = params.with_leg_durations_ms(pickup_ms, destination_ms);
    if let Some(end_ms) = cli.end_ms {
        params = params.with_simulation_end_time_ms(end_ms);
    }
    if cli.no_positions {
        params = params.with_record_positions(false);
    }
    Ok(params)
}

/// Prints a line whenever the state name changes.
fn transition_printer() -> impl FnMut(&World, &Event) {
    let mut last = "";
    move |world: &World, event: &Event| {
        let state = ride_state(world);
        if state.name() != last {
            println!("{:>7} ms  {}", event.timestamp, state.name());
            last = state.name();
        }
    }
}

/// Plays the queued flow: runs until the driver waits at the pickup, reports
/// `action`, then runs until the queue is empty. Events queued past the pickup
/// (a scheduled reset) stay queued until the rider action is in. Returns the
/// number of steps.
fn play<F>(
    world: &mut World,
    schedule: &mut Schedule,
    action: RiderAction,
    pacer: Option<&RealtimePacer>,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = run_while_with_hook(
        world,
        schedule,
        pacer,
        MAX_STEPS,
        |world| ride_state(world) != RideState::AtPickup,
        &mut hook,
    );
    if ride_state(world) == RideState::AtPickup {
        dispatch(world, RideEvent::RiderAction(action));
    } else {
        tracing::warn!(state = ride_state(world).name(), "pickup not reached, no rider action");
    }
    steps += run_while_with_hook(world, schedule, pacer, MAX_STEPS, |_| true, &mut hook);
    steps
}

fn print_summary(world: &World) {
    let Some(view) = RideView::from_world(world) else {
        return;
    };
    println!("--- Summary ---");
    println!("Final state: {} at {} ms", view.state.name(), view.now_ms);
    if let Some(driver) = view.driver {
        println!("Driver: {} ({:.2})", driver.name, driver.rating);
    }
    if let Some(earnings) = view.trip_earnings {
        println!(
            "Earnings: net {:.2}, bonus {:.2}, commission {:.2}, {:.2} km",
            earnings.net_earnings, earnings.bonus, earnings.commission, earnings.distance_km
        );
    }
    if let Some(telemetry) = world.get_resource::<RideTelemetry>() {
        println!(
            "Completed trips: {}, ignored events: {}, position samples: {}",
            telemetry.completed_trips,
            telemetry.ignored_events,
            telemetry.position_samples.len()
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if cli.realtime && !(cli.speed.is_finite() && cli.speed > 0.0) {
        bail!("--speed must be a positive number, got {}", cli.speed);
    }
    let params = load_params(&cli)?;

    let mut world = World::new();
    build_scenario(&mut world, &params).context("invalid flow parameters")?;
    initialize_simulation(&mut world);
    dispatch(&mut world, RideEvent::OfferRideClicked);
    if let Some(at_ms) = cli.reset_after {
        dispatch_at(&mut world, at_ms, RideEvent::ResetSimulation);
    }

    let mut schedule = ride_schedule();
    let pacer = cli.realtime.then(|| RealtimePacer::new(0, cli.speed));

    let steps = play(
        &mut world,
        &mut schedule,
        cli.rider_action.into(),
        pacer.as_ref(),
        transition_printer(),
    );
    tracing::info!(steps, "flow finished");

    print_summary(&world);

    if let Some(path) = &cli.export {
        export_world_timeline(&world, path)
            .with_context(|| format!("exporting timeline to {}", path.display()))?;
        println!("Timeline written to {}", path.display());
    }
    Ok(())
}
