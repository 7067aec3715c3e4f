//! Greedy first-fit assignment of rides to drivers.
//!
//! Rides are processed in caller order and bound to the first eligible
//! driver, with no backtracking: a slot taken early is never revisited even
//! if a later ride could have used it better. The result is valid but not
//! globally optimal. Swapping in a smarter matcher is a matter of
//! implementing [`AssignmentStrategy`]; the eligibility predicates stay
//! untouched.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{Driver, DriverId, Ride, RideId};
use crate::eligibility::is_eligible;

/// Per-driver running assignment counts, scoped to a single run.
///
/// Never shared across runs or threads: each call builds its own tracker, so
/// no load state leaks between batches.
#[derive(Debug, Default)]
pub struct LoadTracker {
    counts: HashMap<DriverId, u32>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds counts from rides that already carry a binding, so a re-run
    /// over a partially bound batch respects load committed earlier.
    pub fn seeded(rides: &[Ride]) -> Self {
        let mut tracker = Self::new();
        for ride in rides {
            if let Some(driver) = &ride.driver {
                tracker.bump(driver);
            }
        }
        tracker
    }

    pub fn count(&self, driver: &DriverId) -> u32 {
        self.counts.get(driver).copied().unwrap_or(0)
    }

    pub fn bump(&mut self, driver: &DriverId) {
        *self.counts.entry(driver.clone()).or_insert(0) += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentOutcome {
    /// Bindings made during this run, in processing order.
    pub assigned: Vec<(RideId, DriverId)>,
    /// Schedulable rides that no driver could take. Expected, not an error.
    pub unassigned: Vec<RideId>,
}

impl AssignmentOutcome {
    pub fn is_fully_assigned(&self) -> bool {
        self.unassigned.is_empty()
    }
}

/// Binds schedulable, unbound rides to drivers.
///
/// Implementations mutate `ride.driver` on success and report rides with no
/// eligible driver; they never fail for ordinary infeasibility.
pub trait AssignmentStrategy {
    fn assign(&self, rides: &mut [Ride], drivers: &[Driver]) -> AssignmentOutcome;
}

/// First-eligible-wins assignment.
pub struct FirstFit;

impl AssignmentStrategy for FirstFit {
    fn assign(&self, rides: &mut [Ride], drivers: &[Driver]) -> AssignmentOutcome {
        let mut tracker = LoadTracker::seeded(rides);
        let mut outcome = AssignmentOutcome::default();

        for ride in rides.iter_mut() {
            // Already-bound rides keep their binding: at most one per run.
            if !ride.is_schedulable() || ride.driver.is_some() {
                continue;
            }

            let chosen = drivers
                .iter()
                .find(|driver| is_eligible(driver, ride, tracker.count(&driver.id)));

            match chosen {
                Some(driver) => {
                    ride.driver = Some(driver.id.clone());
                    tracker.bump(&driver.id);
                    outcome.assigned.push((ride.id.clone(), driver.id.clone()));
                }
                None => {
                    debug!(ride = ride.id.as_str(), "no eligible driver");
                    outcome.unassigned.push(ride.id.clone());
                }
            }
        }

        outcome
    }
}
