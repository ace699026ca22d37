//! Great-circle distance between coordinates

use haversine::{Location as HaversineLocation, Units, distance};

use crate::models::Coordinate;

/// Distance in kilometers (earth radius 6371 km)
#[must_use]
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let from_haversine = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to_haversine = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from_haversine, to_haversine, Units::Kilometers)
}
