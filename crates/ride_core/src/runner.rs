//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! then runs the schedule. [dispatch] is the entry point for ride events coming
//! from the app surface.

use std::thread;
use std::time::{Duration, Instant};

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::scenario::SimulationEndTimeMs;
use crate::state::RideEvent;
use crate::systems::{
    app_load::app_load_system, leg_settled::leg_settled_system, leg_start::leg_start_system,
    offer_ride::offer_ride_system, progress_report::progress_report_system,
    progress_tick::progress_tick_system, reset::reset_system,
    rider_action::rider_action_system, trip_ended::trip_ended_system,
};

fn current_kind(event: &Option<Res<CurrentEvent>>) -> Option<EventKind> {
    event.as_ref().map(|e| e.0.kind)
}

// Condition functions for each event kind
fn is_app_load(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::Dispatch(RideEvent::AppLoad))
}

fn is_offer_ride_clicked(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::Dispatch(RideEvent::OfferRideClicked))
}

fn is_progress_report(event: Option<Res<CurrentEvent>>) -> bool {
    matches!(
        current_kind(&event),
        Some(EventKind::Dispatch(
            RideEvent::GetToPickup { .. } | RideEvent::HeadingToDestination { .. }
        ))
    )
}

fn is_rider_action(event: Option<Res<CurrentEvent>>) -> bool {
    matches!(
        current_kind(&event),
        Some(EventKind::Dispatch(RideEvent::RiderAction(_)))
    )
}

fn is_trip_ended(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::Dispatch(RideEvent::TripEnded))
}

fn is_reset(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::Dispatch(RideEvent::ResetSimulation))
}

fn is_leg_start(event: Option<Res<CurrentEvent>>) -> bool {
    matches!(current_kind(&event), Some(EventKind::LegStart { .. }))
}

fn is_progress_tick(event: Option<Res<CurrentEvent>>) -> bool {
    matches!(current_kind(&event), Some(EventKind::ProgressTick { .. }))
}

fn is_leg_settled(event: Option<Res<CurrentEvent>>) -> bool {
    matches!(current_kind(&event), Some(EventKind::LegSettled { .. }))
}

/// Builds the ride flow schedule: one system per event kind, each gated by a
/// run condition so only the matching system runs for an event.
pub fn ride_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.add_systems((
        // Dispatched ride events
        app_load_system.run_if(is_app_load),
        offer_ride_system.run_if(is_offer_ride_clicked),
        progress_report_system.run_if(is_progress_report),
        rider_action_system.run_if(is_rider_action),
        trip_ended_system.run_if(is_trip_ended),
        reset_system.run_if(is_reset),
        // Timers
        leg_start_system.run_if(is_leg_start),
        progress_tick_system.run_if(is_progress_tick),
        leg_settled_system.run_if(is_leg_settled),
    ));

    schedule
}

/// Queues `event` at the current simulation time. It is processed by the next
/// [run_next_event] call, after anything already queued for the same instant.
pub fn dispatch(world: &mut World, event: RideEvent) {
    let mut clock = world.resource_mut::<SimulationClock>();
    let now = clock.now();
    clock.schedule_at(now, EventKind::Dispatch(event));
}

/// Queues `event` at an absolute simulation time.
pub fn dispatch_at(world: &mut World, at_ms: u64, event: RideEvent) {
    world
        .resource_mut::<SimulationClock>()
        .schedule_at(at_ms, EventKind::Dispatch(event));
}

/// Schedules `AppLoad` at time 0. Call this after building the scenario and
/// before running events.
pub fn initialize_simulation(world: &mut World) {
    dispatch_at(world, 0, RideEvent::AppLoad);
}

fn should_stop(world: &World) -> bool {
    let stop_at = world.get_resource::<SimulationEndTimeMs>().map(|e| e.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    matches!((stop_at, next_ts), (Some(end_ms), Some(ts)) if ts >= end_ms)
}

/// Runs one simulation step: pops the next event, inserts it as [CurrentEvent], then runs the schedule.
/// Returns `true` if an event was processed, `false` if the clock was empty or if the next event
/// is at or past [SimulationEndTimeMs] (when that resource is present).
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    run_next_event_with_hook(world, schedule, |_, _| {})
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    if should_stop(world) {
        return false;
    }

    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));

    schedule.run(world);
    hook(world, &event);
    true
}

/// Runs simulation steps until the event queue is empty or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    run_until_empty_with_hook(world, schedule, max_steps, |_, _| {})
}

/// Runs simulation steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook) {
        steps += 1;
    }
    steps
}

/// Slowest playback accepted by [RealtimePacer]; smaller speeds are raised to it.
pub const MIN_PACER_SPEED: f64 = 1e-3;

/// Maps simulation time onto wall-clock time. `speed` 2.0 runs twice as fast
/// as real time.
#[derive(Debug, Clone, Copy)]
pub struct RealtimePacer {
    started: Instant,
    origin_ms: u64,
    speed: f64,
}

impl RealtimePacer {
    pub fn new(origin_ms: u64, speed: f64) -> Self {
        Self {
            started: Instant::now(),
            origin_ms,
            speed: if speed.is_finite() && speed > 0.0 {
                speed.max(MIN_PACER_SPEED)
            } else {
                1.0
            },
        }
    }

    /// Wall-clock offset from start at which simulation time `sim_ms` is due.
    pub fn due_after(&self, sim_ms: u64) -> Duration {
        let sim_elapsed = sim_ms.saturating_sub(self.origin_ms) as f64;
        Duration::try_from_secs_f64(sim_elapsed / self.speed / 1000.0).unwrap_or(Duration::MAX)
    }

    /// Sleeps until simulation time `sim_ms` is due.
    pub fn wait_until(&self, sim_ms: u64) {
        let due = self.due_after(sim_ms);
        let elapsed = self.started.elapsed();
        if due > elapsed {
            thread::sleep(due - elapsed);
        }
    }
}

/// Like [run_until_empty_with_hook], but each event is processed no earlier
/// than its simulation time mapped through `pacer`.
pub fn run_paced_until_empty<F>(
    world: &mut World,
    schedule: &mut Schedule,
    pacer: &RealtimePacer,
    max_steps: usize,
    hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    run_while_with_hook(world, schedule, Some(pacer), max_steps, |_| true, hook)
}

/// Runs steps while `keep_going` holds for the world, the queue is non-empty
/// and `max_steps` is not reached. `keep_going` is checked before every step,
/// so events queued behind the stop point stay queued. With a `pacer`, each
/// event waits for its wall-clock due time.
pub fn run_while_with_hook<C, F>(
    world: &mut World,
    schedule: &mut Schedule,
    pacer: Option<&RealtimePacer>,
    max_steps: usize,
    mut keep_going: C,
    mut hook: F,
) -> usize
where
    C: FnMut(&World) -> bool,
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && keep_going(world) {
        let Some(next_ts) = world.resource::<SimulationClock>().next_event_time() else {
            break;
        };
        if let Some(pacer) = pacer {
            pacer.wait_until(next_ts);
        }
        if !run_next_event_with_hook(world, schedule, &mut hook) {
            break;
        }
        steps += 1;
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::state::RideState;
    use crate::test_helpers::{create_test_world_with, fast_params};
    use crate::view::ride_state;

    #[test]
    fn run_while_leaves_later_events_queued() {
        let mut world = create_test_world_with(&fast_params());
        initialize_simulation(&mut world);
        dispatch(&mut world, RideEvent::OfferRideClicked);
        dispatch_at(&mut world, 10_000, RideEvent::ResetSimulation);
        let mut schedule = ride_schedule();

        run_while_with_hook(
            &mut world,
            &mut schedule,
            None,
            10_000,
            |world| ride_state(world) != RideState::AtPickup,
            |_, _| {},
        );

        assert_eq!(ride_state(&world), RideState::AtPickup);
        let clock = world.resource::<SimulationClock>();
        assert_eq!(clock.len(), 1);
        assert_eq!(clock.next_event_time(), Some(10_000));
    }

    #[test]
    fn pacer_scales_simulation_time() {
        let pacer = RealtimePacer::new(1000, 2.0);
        assert_eq!(pacer.due_after(1000), Duration::ZERO);
        assert_eq!(pacer.due_after(3000), Duration::from_secs(1));
        assert_eq!(pacer.due_after(0), Duration::ZERO);
    }

    #[test]
    fn pacer_clamps_tiny_speeds_instead_of_overflowing() {
        let pacer = RealtimePacer::new(0, 1e-300);
        assert!((pacer.due_after(1).as_secs_f64() - 1.0).abs() < 1e-9);
        assert!(pacer.due_after(u64::MAX) > Duration::from_secs(u64::MAX / 1000));
    }

    #[test]
    fn pacer_falls_back_to_real_time_for_bad_speed() {
        let pacer = RealtimePacer::new(0, 0.0);
        assert_eq!(pacer.due_after(500), Duration::from_millis(500));
    }
}
