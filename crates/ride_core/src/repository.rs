//! Fixture data source for the driver flow.
//!
//! [`RideDataSource`] is the seam between the systems and the data; the default
//! [`MockRideRepository`] returns static San Francisco fixtures. The source is
//! stored as a `Box<dyn RideDataSource>` ECS resource so tests can swap it.

use bevy_ecs::prelude::Resource;

use crate::model::{Coordinate, Driver, Location, Passenger, Route, TripEarnings};

/// Map center; the driver starts here.
pub const MAP_CENTER: Coordinate = Coordinate::new(37.7749, -122.4194);
const PICKUP: Coordinate = Coordinate::new(37.7849, -122.4094);
const DESTINATION: Coordinate = Coordinate::new(37.7649, -122.4294);

const PICKUP_ROUTE_SEGMENTS: usize = 20;
const DESTINATION_ROUTE_SEGMENTS: usize = 25;
const ESTIMATED_TIME_LABEL: &str = "4 mins";

/// Synchronous lookups used by the flow. Implementations must be `Send + Sync`
/// so they can live in a shared ECS resource.
pub trait RideDataSource: Send + Sync {
    /// Where the driver is when the app loads or the simulation resets.
    fn start_location(&self) -> Location;
    fn pickup_location(&self) -> Location;
    fn destination(&self) -> Location;
    fn route_to_pickup(&self) -> Route;
    fn route_to_destination(&self) -> Route;
    fn passengers(&self) -> Vec<Passenger>;
    fn driver(&self) -> Driver;
    fn trip_earnings(&self) -> TripEarnings;
}

/// ECS resource wrapping a boxed data source.
#[derive(Resource)]
pub struct RideDataSourceResource(pub Box<dyn RideDataSource>);

impl Default for RideDataSourceResource {
    fn default() -> Self {
        Self(Box::new(MockRideRepository::default()))
    }
}

/// Static fixtures. Segment counts control route resolution.
#[derive(Debug, Clone, Copy)]
pub struct MockRideRepository {
    pub pickup_segments: usize,
    pub destination_segments: usize,
}

impl Default for MockRideRepository {
    fn default() -> Self {
        Self {
            pickup_segments: PICKUP_ROUTE_SEGMENTS,
            destination_segments: DESTINATION_ROUTE_SEGMENTS,
        }
    }
}

impl MockRideRepository {
    pub fn with_segments(pickup_segments: usize, destination_segments: usize) -> Self {
        Self {
            pickup_segments,
            destination_segments,
        }
    }

    fn route_between(&self, start: Location, end: Location, segments: usize) -> Route {
        let waypoints = generate_waypoints(start.coordinate, end.coordinate, segments);
        Route {
            start,
            end,
            waypoints,
            estimated_time: ESTIMATED_TIME_LABEL.to_string(),
        }
    }
}

impl RideDataSource for MockRideRepository {
    fn start_location(&self) -> Location {
        Location::new(MAP_CENTER, "Current Location")
    }

    fn pickup_location(&self) -> Location {
        Location::new(PICKUP, "Ladipo Oluwole Street")
    }

    fn destination(&self) -> Location {
        Location::new(DESTINATION, "Community Road")
    }

    fn route_to_pickup(&self) -> Route {
        self.route_between(
            self.start_location(),
            self.pickup_location(),
            self.pickup_segments,
        )
    }

    fn route_to_destination(&self) -> Route {
        self.route_between(
            self.pickup_location(),
            self.destination(),
            self.destination_segments,
        )
    }

    fn passengers(&self) -> Vec<Passenger> {
        [("1", "Nneka Chukwu"), ("2", "Wade Warren"), ("3", "Brooklyn Simmons")]
            .into_iter()
            .map(|(id, name)| Passenger {
                id: id.to_string(),
                name: name.to_string(),
                rating: 4.7,
                image_url: None,
            })
            .collect()
    }

    fn driver(&self) -> Driver {
        Driver {
            id: "driver_1".to_string(),
            name: "Daniel Steward".to_string(),
            rating: 4.7,
            image_url: None,
        }
    }

    fn trip_earnings(&self) -> TripEarnings {
        TripEarnings {
            net_earnings: 6600.0,
            bonus: 500.0,
            commission: 500.0,
            distance_km: 0.86,
            helped_riders: 4,
        }
    }
}

/// Evenly spaced points from `start` to `end` inclusive: `segments + 1` points.
/// Zero segments yields just `start`.
pub fn generate_waypoints(start: Coordinate, end: Coordinate, segments: usize) -> Vec<Coordinate> {
    if segments == 0 {
        return vec![start];
    }
    (0..=segments)
        .map(|i| start.lerp(end, i as f64 / segments as f64))
        .collect()
}
