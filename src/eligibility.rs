//! Driver/ride eligibility predicates.
//!
//! A driver may serve a ride only when all four checks hold: shift window,
//! vehicle category, skill coverage, and remaining daily capacity. The
//! predicates are independent; evaluation order is only a short-circuit
//! detail.

use crate::domain::{Driver, Ride};

/// The pickup time-of-day falls inside the driver's shift.
///
/// A missing bound is unbounded on that side, never a refusal.
pub fn shift_allows(driver: &Driver, ride: &Ride) -> bool {
    let pickup = ride.pickup_seconds_of_day();
    if let Some(start) = driver.shift_start {
        if pickup < start {
            return false;
        }
    }
    if let Some(end) = driver.shift_end {
        if pickup > end {
            return false;
        }
    }
    true
}

/// Exact vehicle category match; no substitution hierarchy.
pub fn vehicle_matches(driver: &Driver, ride: &Ride) -> bool {
    driver.vehicle == ride.vehicle
}

/// Every required tag must be granted. A tag absent from the driver's set is
/// unsatisfied; malformed source entries were already demoted to absent when
/// the [`SkillSet`](crate::domain::SkillSet) was built.
pub fn skills_cover(driver: &Driver, ride: &Ride) -> bool {
    ride.required_skills.iter().all(|tag| driver.skills.has(tag))
}

/// The driver's running assignment count is strictly below the daily cap.
pub fn has_capacity(driver: &Driver, assigned: u32) -> bool {
    assigned < driver.max_daily_rides
}

/// Conjunction of the four predicates.
pub fn is_eligible(driver: &Driver, ride: &Ride, assigned: u32) -> bool {
    shift_allows(driver, ride)
        && vehicle_matches(driver, ride)
        && skills_cover(driver, ride)
        && has_capacity(driver, assigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DriverId, Location, RideId, VehicleCategory};

    fn ride_at(seconds_of_day: i64) -> Ride {
        Ride::new(
            RideId::new("r1"),
            Location::new(41.8, -71.4),
            Location::new(41.9, -71.5),
            seconds_of_day,
            VehicleCategory::Sedan,
        )
    }

    fn driver() -> Driver {
        Driver::new(DriverId::new("d1"), "Ada", VehicleCategory::Sedan)
    }

    #[test]
    fn shift_bounds_are_inclusive() {
        let mut d = driver();
        d.shift_start = Some(8 * 3600);
        d.shift_end = Some(17 * 3600);

        assert!(shift_allows(&d, &ride_at(8 * 3600)));
        assert!(shift_allows(&d, &ride_at(17 * 3600)));
        assert!(!shift_allows(&d, &ride_at(8 * 3600 - 1)));
        assert!(!shift_allows(&d, &ride_at(17 * 3600 + 1)));
    }

    #[test]
    fn missing_shift_bound_is_unconstrained() {
        let mut d = driver();
        d.shift_start = Some(8 * 3600);
        // no end bound: late pickups are fine
        assert!(shift_allows(&d, &ride_at(23 * 3600)));

        d.shift_start = None;
        d.shift_end = None;
        assert!(shift_allows(&d, &ride_at(0)));
    }

    #[test]
    fn capacity_is_strict() {
        let mut d = driver();
        d.max_daily_rides = 2;
        assert!(has_capacity(&d, 0));
        assert!(has_capacity(&d, 1));
        assert!(!has_capacity(&d, 2));
    }
}
