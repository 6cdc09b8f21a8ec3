//! Domain data for the driver flow: locations, routes, participants, earnings.
//!
//! All values are plain data. They are produced by a [`crate::repository::RideDataSource`]
//! and never mutated once handed out.

use h3o::{CellIndex, LatLng, Resolution};
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation towards `other`; `fraction` 0.0 is `self`, 1.0 is `other`.
    pub fn lerp(self, other: Coordinate, fraction: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (other.lat - self.lat) * fraction,
            lng: self.lng + (other.lng - self.lng) * fraction,
        }
    }

    /// H3 cell containing this coordinate, or `None` for non-finite input.
    pub fn to_cell(self, resolution: Resolution) -> Option<CellIndex> {
        LatLng::new(self.lat, self.lng)
            .ok()
            .map(|ll| ll.to_cell(resolution))
    }
}

/// A coordinate with a human-readable address label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinate: Coordinate,
    pub address: String,
}

impl Location {
    pub fn new(coordinate: Coordinate, address: impl Into<String>) -> Self {
        Self {
            coordinate,
            address: address.into(),
        }
    }
}

/// One leg of the trip. Waypoints include both endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub start: Location,
    pub end: Location,
    pub waypoints: Vec<Coordinate>,
    /// Display label such as "4 mins".
    pub estimated_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: String,
    pub name: String,
    pub rating: f32,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub rating: f32,
    pub image_url: Option<String>,
}

/// Earnings breakdown shown when a trip completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEarnings {
    pub net_earnings: f64,
    pub bonus: f64,
    pub commission: f64,
    /// Trip distance in kilometres.
    pub distance_km: f64,
    pub helped_riders: u32,
}
