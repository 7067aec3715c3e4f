//! Projects a solved route back onto ride records.
//!
//! Pure projection from solver state to domain fields; no decisions are
//! made here.

use crate::domain::{Ride, RideId};
use crate::optimizer::RoutePlan;

/// One decoded stop: which ride, in what order, arriving when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStop {
    pub ride: RideId,
    /// Position in visiting order, numbered from 0.
    pub position: usize,
    /// Estimated arrival at the pickup (unix seconds).
    pub arrival: i64,
}

/// Walks the plan in visiting order and resolves node indices to ride ids.
///
/// Node `k` (k ≥ 1) corresponds to `rides[k - 1]`; the depot never appears
/// in the output. Arrivals are converted from batch-relative offsets to
/// absolute unix seconds.
pub fn decode(plan: &RoutePlan, rides: &[Ride]) -> Vec<RouteStop> {
    plan.stops
        .iter()
        .enumerate()
        .filter_map(|(position, stop)| {
            let ride = rides.get(stop.node.checked_sub(1)?)?;
            Some(RouteStop {
                ride: ride.id.clone(),
                position,
                arrival: plan.epoch + stop.arrival_offset,
            })
        })
        .collect()
}

/// Writes route order and arrival estimates back onto the rides.
pub fn apply(rides: &mut [Ride], stops: &[RouteStop]) {
    for stop in stops {
        if let Some(ride) = rides.iter_mut().find(|ride| ride.id == stop.ride) {
            ride.route_position = Some(stop.position);
            ride.estimated_arrival = Some(stop.arrival);
        }
    }
}
