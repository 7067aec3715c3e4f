//! Domain model for medical-transport dispatch.
//!
//! Rides and drivers are supplied and persisted by the surrounding service;
//! the engines here only read them and fill in assignment/routing fields
//! that the caller persists afterward.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Seconds in one day, used to derive time-of-day from epoch timestamps.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Per-driver daily ride cap applied when none is configured.
pub const DEFAULT_MAX_DAILY_RIDES: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RideId(String);

impl RideId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DriverId(String);

impl DriverId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Geographic coordinate (latitude, longitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Stable key for dedup and index maps (six decimals ≈ 10 cm).
    pub fn key(&self) -> String {
        format!("{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Vehicle classes a ride can require.
///
/// Matching is exact: a wheelchair van never substitutes for a stretcher
/// vehicle or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleCategory {
    Sedan,
    WheelchairVan,
    Stretcher,
    BariatricVan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RideStatus {
    /// Schedulable: may be handed to the assignment and routing engines.
    Scheduled,
    Assigned,
    Completed,
    Cancelled,
}

/// Validated set of skill tags a driver holds.
///
/// Upstream records model skills as tag → flag maps with occasionally
/// malformed values. [`SkillSet::from_entries`] demotes anything that is not
/// an explicit `true` to "not granted" at the boundary, so the rest of the
/// crate only ever sees tags that are actually held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    /// Builds from raw (tag, flag) entries. A `None` flag marks a malformed
    /// source value (e.g. a string where a boolean belongs): it is logged as
    /// a data-quality warning and treated as not granted, never as an error.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<bool>)>,
    {
        let mut tags = BTreeSet::new();
        for (tag, flag) in entries {
            match flag {
                Some(true) => {
                    tags.insert(tag);
                }
                Some(false) => {}
                None => {
                    warn!(skill = %tag, "malformed skill entry, treating as not granted");
                }
            }
        }
        Self(tags)
    }

    pub fn grant(&mut self, tag: impl Into<String>) {
        self.0.insert(tag.into());
    }

    pub fn has(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A transport request to be assigned and routed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: RideId,
    pub pickup: Location,
    pub dropoff: Location,
    /// Requested pickup time (unix seconds).
    pub pickup_time: i64,
    /// Provisional one-way distance estimate in kilometres.
    pub distance_estimate_km: f64,
    pub vehicle: VehicleCategory,
    pub required_skills: BTreeSet<String>,
    /// How long the passenger tolerates waiting past the requested pickup.
    pub wait_tolerance_min: i32,
    pub status: RideStatus,
    /// Bound driver, once the assignment engine has committed one.
    pub driver: Option<DriverId>,
    /// Visiting order within the optimized route, once routed.
    pub route_position: Option<usize>,
    /// Estimated pickup arrival (unix seconds), once routed.
    pub estimated_arrival: Option<i64>,
}

impl Ride {
    pub fn new(
        id: RideId,
        pickup: Location,
        dropoff: Location,
        pickup_time: i64,
        vehicle: VehicleCategory,
    ) -> Self {
        Self {
            id,
            pickup,
            dropoff,
            pickup_time,
            distance_estimate_km: 0.0,
            vehicle,
            required_skills: BTreeSet::new(),
            wait_tolerance_min: 0,
            status: RideStatus::Scheduled,
            driver: None,
            route_position: None,
            estimated_arrival: None,
        }
    }

    /// Time of day of the requested pickup, in seconds from midnight.
    pub fn pickup_seconds_of_day(&self) -> i32 {
        self.pickup_time.rem_euclid(SECONDS_PER_DAY) as i32
    }

    pub fn is_schedulable(&self) -> bool {
        self.status == RideStatus::Scheduled
    }
}

/// A driver with a vehicle, a skill set, and an optional shift window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub active: bool,
    pub vehicle: VehicleCategory,
    pub skills: SkillSet,
    /// Shift bounds in seconds from midnight. A missing bound leaves that
    /// side unconstrained.
    pub shift_start: Option<i32>,
    pub shift_end: Option<i32>,
    pub max_daily_rides: u32,
}

impl Driver {
    pub fn new(id: DriverId, name: impl Into<String>, vehicle: VehicleCategory) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            vehicle,
            skills: SkillSet::new(),
            shift_start: None,
            shift_end: None,
            max_daily_rides: DEFAULT_MAX_DAILY_RIDES,
        }
    }
}
