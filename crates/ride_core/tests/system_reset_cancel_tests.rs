mod support;

use ride_core::clock::SimulationClock;
use ride_core::ecs::{ActiveLeg, ActiveRoute, TripEarningsCell};
use ride_core::model::{Coordinate, Driver, Location, Passenger, Route, TripEarnings};
use ride_core::repository::{generate_waypoints, RideDataSource, MAP_CENTER};
use ride_core::runner::{dispatch, dispatch_at, initialize_simulation, ride_schedule, run_until_empty};
use ride_core::scenario::{build_scenario_with_source, FlowParams};
use ride_core::state::{RideEvent, RideState, RiderAction};
use ride_core::telemetry::RideTelemetry;
use ride_core::test_helpers::fast_params;
use ride_core::view::{ride_state, RideView};

use support::{drain, loaded_world};

#[test]
fn reset_mid_leg_returns_to_idle_and_drops_timers() {
    let (mut world, mut schedule) = loaded_world(&FlowParams::default());
    dispatch(&mut world, RideEvent::OfferRideClicked);
    dispatch_at(&mut world, 3000, RideEvent::ResetSimulation);
    drain(&mut world, &mut schedule);

    assert_eq!(ride_state(&world), RideState::Idle);
    let telemetry = world.resource::<RideTelemetry>();
    assert_eq!(telemetry.first_entered("AtPickup"), None);
    assert!(telemetry.position_samples.iter().all(|s| s.at_ms <= 3000));
    assert_eq!(telemetry.transitions.last().map(|t| t.to), Some(RideState::Idle));
    assert!(world.resource::<ActiveRoute>().0.is_none());
    assert!(world.resource::<ActiveLeg>().in_flight().is_none());
    assert!(world.resource::<SimulationClock>().is_empty());
    assert_eq!(RideView::from_world(&world).and_then(|v| v.car_position), Some(MAP_CENTER));
}

#[test]
fn reset_after_completion_allows_replay() {
    let (mut world, mut schedule) = loaded_world(&fast_params());
    for _ in 0..2 {
        dispatch(&mut world, RideEvent::OfferRideClicked);
        drain(&mut world, &mut schedule);
        assert_eq!(ride_state(&world), RideState::AtPickup);
        dispatch(&mut world, RideEvent::RiderAction(RiderAction::DidntShow));
        drain(&mut world, &mut schedule);
        assert_eq!(ride_state(&world), RideState::Completed);
        assert!(world.resource::<TripEarningsCell>().0.is_some());

        dispatch(&mut world, RideEvent::ResetSimulation);
        drain(&mut world, &mut schedule);
        assert_eq!(ride_state(&world), RideState::Idle);
        assert!(world.resource::<TripEarningsCell>().0.is_none());
    }
    assert_eq!(world.resource::<RideTelemetry>().completed_trips, 2);
}

#[test]
fn reset_then_offer_at_same_instant_starts_a_single_leg() {
    let (mut world, mut schedule) = loaded_world(&fast_params());
    dispatch(&mut world, RideEvent::OfferRideClicked);
    dispatch(&mut world, RideEvent::ResetSimulation);
    dispatch(&mut world, RideEvent::OfferRideClicked);
    drain(&mut world, &mut schedule);

    assert_eq!(ride_state(&world), RideState::AtPickup);
    let telemetry = world.resource::<RideTelemetry>();
    // fast params: 10 ticks of 10 ms -> 11 samples for the one live leg
    assert_eq!(telemetry.position_samples.len(), 11);
}

#[test]
fn trip_ended_early_completes_and_stops_the_leg() {
    let (mut world, mut schedule) = loaded_world(&FlowParams::default());
    dispatch(&mut world, RideEvent::OfferRideClicked);
    drain(&mut world, &mut schedule);
    dispatch(&mut world, RideEvent::RiderAction(RiderAction::PickedUp));
    let now = world.resource::<SimulationClock>().now();
    dispatch_at(&mut world, now + 2000, RideEvent::TripEnded);
    drain(&mut world, &mut schedule);

    assert_eq!(ride_state(&world), RideState::Completed);
    let telemetry = world.resource::<RideTelemetry>();
    assert_eq!(telemetry.completed_trips, 1);
    assert_eq!(telemetry.first_entered("Completed"), Some(now + 2000));
    assert!(telemetry.position_samples.iter().all(|s| s.at_ms <= now + 2000));
    assert!(world.resource::<SimulationClock>().is_empty());
}

#[test]
fn trip_ended_during_arrival_pause_is_not_dispatched_twice() {
    let (mut world, mut schedule) = loaded_world(&FlowParams::default());
    dispatch(&mut world, RideEvent::OfferRideClicked);
    drain(&mut world, &mut schedule);
    dispatch(&mut world, RideEvent::RiderAction(RiderAction::PickedUp));
    let now = world.resource::<SimulationClock>().now();
    // final tick at +6500, leg end due at +7000
    dispatch_at(&mut world, now + 6700, RideEvent::TripEnded);
    drain(&mut world, &mut schedule);

    assert_eq!(ride_state(&world), RideState::Completed);
    let telemetry = world.resource::<RideTelemetry>();
    assert_eq!(telemetry.first_entered("Completed"), Some(now + 6700));
    assert_eq!(telemetry.completed_trips, 1);
    assert_eq!(telemetry.ignored_events, 0);
    assert!(world.resource::<SimulationClock>().is_empty());
}

#[test]
fn app_load_mid_flow_behaves_like_reset() {
    let (mut world, mut schedule) = loaded_world(&fast_params());
    dispatch(&mut world, RideEvent::OfferRideClicked);
    dispatch_at(&mut world, 50, RideEvent::AppLoad);
    drain(&mut world, &mut schedule);

    assert_eq!(ride_state(&world), RideState::Idle);
    assert_eq!(world.resource::<RideTelemetry>().first_entered("AtPickup"), None);
}

#[test]
fn simulation_end_time_stops_the_runner() {
    let params = FlowParams::default().with_simulation_end_time_ms(1000);
    let (mut world, mut schedule) = loaded_world(&params);
    dispatch(&mut world, RideEvent::OfferRideClicked);
    run_until_empty(&mut world, &mut schedule, support::MAX_STEPS);

    let clock = world.resource::<SimulationClock>();
    assert!(clock.now() < 1000);
    assert!(!clock.is_empty());
    assert!(matches!(ride_state(&world), RideState::OfferingRide { .. }));
}

#[test]
fn disabled_position_recording_keeps_transitions_only() {
    let (mut world, mut schedule) = loaded_world(&fast_params().with_record_positions(false));
    dispatch(&mut world, RideEvent::OfferRideClicked);
    drain(&mut world, &mut schedule);

    let telemetry = world.resource::<RideTelemetry>();
    assert!(telemetry.position_samples.is_empty());
    assert!(!telemetry.transitions.is_empty());
}

struct StraightLineSource;

impl StraightLineSource {
    fn location(lat: f64, label: &str) -> Location {
        Location::new(Coordinate::new(lat, 0.0), label)
    }
}

impl RideDataSource for StraightLineSource {
    fn start_location(&self) -> Location {
        Self::location(0.0, "start")
    }
    fn pickup_location(&self) -> Location {
        Self::location(1.0, "pickup")
    }
    fn destination(&self) -> Location {
        Self::location(2.0, "destination")
    }
    fn route_to_pickup(&self) -> Route {
        Route {
            start: self.start_location(),
            end: self.pickup_location(),
            waypoints: generate_waypoints(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0), 2),
            estimated_time: "1 min".to_string(),
        }
    }
    fn route_to_destination(&self) -> Route {
        Route {
            start: self.pickup_location(),
            end: self.destination(),
            waypoints: Vec::new(),
            estimated_time: "1 min".to_string(),
        }
    }
    fn passengers(&self) -> Vec<Passenger> {
        Vec::new()
    }
    fn driver(&self) -> Driver {
        Driver {
            id: "d".to_string(),
            name: "Test Driver".to_string(),
            rating: 5.0,
            image_url: None,
        }
    }
    fn trip_earnings(&self) -> TripEarnings {
        TripEarnings {
            net_earnings: 1.0,
            bonus: 0.0,
            commission: 0.0,
            distance_km: 1.0,
            helped_riders: 1,
        }
    }
}

#[test]
fn custom_source_drives_the_flow_and_empty_routes_are_tolerated() {
    let mut world = bevy_ecs::prelude::World::new();
    build_scenario_with_source(&mut world, &fast_params(), Box::new(StraightLineSource))
        .expect("scenario");
    initialize_simulation(&mut world);
    let mut schedule = ride_schedule();
    drain(&mut world, &mut schedule);

    dispatch(&mut world, RideEvent::OfferRideClicked);
    drain(&mut world, &mut schedule);
    let view = RideView::from_world(&world).expect("view");
    assert_eq!(view.state, RideState::AtPickup);
    assert_eq!(view.car_position, Some(Coordinate::new(1.0, 0.0)));
    assert_eq!(view.driver.map(|d| d.name.as_str()), Some("Test Driver"));

    dispatch(&mut world, RideEvent::RiderAction(RiderAction::PickedUp));
    drain(&mut world, &mut schedule);
    let view = RideView::from_world(&world).expect("view");
    assert_eq!(view.state, RideState::Completed);
    // destination route has no waypoints: the car stays at the pickup
    assert_eq!(view.car_position, Some(Coordinate::new(1.0, 0.0)));
    assert_eq!(view.trip_earnings.map(|e| e.net_earnings), Some(1.0));
}
