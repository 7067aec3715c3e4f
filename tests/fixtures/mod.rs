//! Test fixtures for nemt-dispatch.
//!
//! Provides:
//! - Test builders for rides and drivers
//! - Predictable matrix providers
//! - Real Providence-area medical facilities (from OpenStreetMap)

#![allow(dead_code)] // each test binary uses its own subset

pub mod providence_locations;

use nemt_dispatch::domain::{
    Driver, DriverId, Location, Ride, RideId, RideStatus, VehicleCategory,
};
use nemt_dispatch::matrix::{CostMatrix, DistanceError, DistanceProvider};

pub fn hours(h: i64) -> i64 {
    h * 3600
}

pub fn minutes(m: i64) -> i64 {
    m * 60
}

/// Builder for test rides with sensible defaults.
pub struct RideBuilder(Ride);

impl RideBuilder {
    pub fn new(id: &str) -> Self {
        let mut ride = Ride::new(
            RideId::new(id),
            Location::new(41.81, -71.41),
            Location::new(41.84, -71.39),
            hours(9),
            VehicleCategory::Sedan,
        );
        ride.distance_estimate_km = 2.0;
        Self(ride)
    }

    pub fn pickup_time(mut self, t: i64) -> Self {
        self.0.pickup_time = t;
        self
    }

    pub fn pickup(mut self, lat: f64, lng: f64) -> Self {
        self.0.pickup = Location::new(lat, lng);
        self
    }

    pub fn dropoff(mut self, lat: f64, lng: f64) -> Self {
        self.0.dropoff = Location::new(lat, lng);
        self
    }

    pub fn estimate_km(mut self, km: f64) -> Self {
        self.0.distance_estimate_km = km;
        self
    }

    pub fn vehicle(mut self, vehicle: VehicleCategory) -> Self {
        self.0.vehicle = vehicle;
        self
    }

    pub fn requires(mut self, tag: &str) -> Self {
        self.0.required_skills.insert(tag.to_string());
        self
    }

    pub fn wait_tolerance(mut self, minutes: i32) -> Self {
        self.0.wait_tolerance_min = minutes;
        self
    }

    pub fn status(mut self, status: RideStatus) -> Self {
        self.0.status = status;
        self
    }

    pub fn bound_to(mut self, driver_id: &str) -> Self {
        self.0.driver = Some(DriverId::new(driver_id));
        self
    }

    pub fn build(self) -> Ride {
        self.0
    }
}

/// Builder for test drivers with sensible defaults.
pub struct DriverBuilder(Driver);

impl DriverBuilder {
    pub fn new(id: &str) -> Self {
        Self(Driver::new(DriverId::new(id), id, VehicleCategory::Sedan))
    }

    pub fn vehicle(mut self, vehicle: VehicleCategory) -> Self {
        self.0.vehicle = vehicle;
        self
    }

    pub fn skill(mut self, tag: &str) -> Self {
        self.0.skills.grant(tag);
        self
    }

    pub fn shift(mut self, start: i32, end: i32) -> Self {
        self.0.shift_start = Some(start);
        self.0.shift_end = Some(end);
        self
    }

    pub fn max_rides(mut self, cap: u32) -> Self {
        self.0.max_daily_rides = cap;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.0.active = false;
        self
    }

    pub fn build(self) -> Driver {
        self.0
    }
}

/// Manhattan distance matrix (simple, predictable).
///
/// 1 degree of latitude or longitude = 60 seconds of travel.
pub struct ManhattanMatrix;

impl DistanceProvider for ManhattanMatrix {
    fn matrix(&self, locations: &[Location]) -> Result<CostMatrix, DistanceError> {
        let n = locations.len();
        let mut rows = vec![vec![0; n]; n];
        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                let dist = (from.lat - to.lat).abs() + (from.lng - to.lng).abs();
                rows[i][j] = (dist * 60.0) as i32;
            }
        }
        CostMatrix::from_rows(rows)
    }
}

/// Provider that fails on every request, for dependency-failure paths.
pub struct UnresolvableProvider;

impl DistanceProvider for UnresolvableProvider {
    fn matrix(&self, locations: &[Location]) -> Result<CostMatrix, DistanceError> {
        let loc = locations.first().copied().unwrap_or(Location::new(0.0, 0.0));
        Err(DistanceError::UnresolvedLocation {
            lat: loc.lat,
            lng: loc.lng,
        })
    }
}
