//! Providence-area medical facilities for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. These are real, routable
//! locations that work with OSRM Rhode Island data.

use nemt_dispatch::domain::Location;

/// A named facility with coordinates.
#[derive(Debug, Clone)]
pub struct Facility {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Facility {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn location(&self) -> Location {
        Location::new(self.lat, self.lng)
    }
}

// ============================================================================
// Hospitals (good depot / major pickup locations)
// ============================================================================

pub const HOSPITALS: &[Facility] = &[
    Facility::new("Rhode Island Hospital", 41.8072, -71.4104),
    Facility::new("The Miriam Hospital", 41.8387, -71.3901),
    Facility::new("Roger Williams Medical Center", 41.8475, -71.4485),
    Facility::new("Women & Infants Hospital", 41.8054, -71.4109),
    Facility::new("Providence VA Medical Center", 41.8398, -71.4361),
    Facility::new("Our Lady of Fatima Hospital", 41.8617, -71.4470),
];

// ============================================================================
// Outpatient sites (dialysis, rehab, long-term care)
// ============================================================================

pub const CARE_SITES: &[Facility] = &[
    Facility::new("Butler Hospital", 41.8419, -71.3787),
    Facility::new("Hallworth House", 41.8311, -71.4024),
    Facility::new("Tockwotton on the Waterfront", 41.8169, -71.3889),
    Facility::new("Elmhurst Rehabilitation Center", 41.8449, -71.4577),
];

pub fn hospitals() -> Vec<Location> {
    HOSPITALS.iter().map(Facility::location).collect()
}

pub fn all_locations() -> Vec<Location> {
    HOSPITALS
        .iter()
        .chain(CARE_SITES.iter())
        .map(Facility::location)
        .collect()
}
