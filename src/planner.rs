//! One-batch orchestration: assign drivers, fetch a cost matrix, route.
//!
//! Each call is a single synchronous computation over a bounded batch. All
//! mutable working state (load counters, routing nodes) is scoped to the
//! call; concurrent batches need independently built inputs and nothing
//! else.

use tracing::warn;

use crate::assignment::{AssignmentOutcome, AssignmentStrategy};
use crate::decoder::{self, RouteStop};
use crate::domain::{Driver, Location, Ride};
use crate::matrix::{DistanceError, DistanceProvider};
use crate::optimizer::{self, OptimizerConfig, SolveOutcome};

/// Depot plus optimizer tunables for one planning batch.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Route start/end location (the transport base).
    pub depot: Location,
    pub optimizer: OptimizerConfig,
}

/// User-visible shape of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Every schedulable ride got a driver and the route solved.
    FullyAssigned,
    /// Some rides could not be bound; the unassigned set names them.
    PartiallyAssigned,
    /// The route step produced no plan; driver bindings from the greedy
    /// phase stand.
    OptimizationUnavailable,
}

#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub outcome: DispatchOutcome,
    pub assignment: AssignmentOutcome,
    /// Decoded visiting order, present when the optimizer solved the batch.
    pub route: Option<Vec<RouteStop>>,
}

/// Runs the full pipeline over one batch: greedy assignment, one batched
/// matrix request, route optimization, and write-back of positions and
/// arrival estimates.
///
/// Distance-backend failures propagate as [`DistanceError`]; everything
/// else (unassignable rides, infeasible routes, timeouts) is reported in
/// the returned plan, never an `Err`.
pub fn plan_batch<P, S>(
    rides: &mut [Ride],
    drivers: &[Driver],
    provider: &P,
    strategy: &S,
    config: &PlannerConfig,
) -> Result<BatchPlan, DistanceError>
where
    P: DistanceProvider,
    S: AssignmentStrategy,
{
    let active: Vec<Driver> = drivers.iter().filter(|d| d.active).cloned().collect();
    let assignment = strategy.assign(rides, &active);

    // Depot-first node ordering over the schedulable batch.
    let batch: Vec<Ride> = rides.iter().filter(|r| r.is_schedulable()).cloned().collect();
    if batch.is_empty() {
        return Ok(BatchPlan {
            outcome: assignment_outcome(&assignment),
            assignment,
            route: Some(Vec::new()),
        });
    }

    let mut locations = vec![config.depot];
    locations.extend(batch.iter().map(|ride| ride.pickup));
    let matrix = provider.matrix(&locations)?;

    let plan = match optimizer::solve(&batch, &matrix, &config.optimizer) {
        SolveOutcome::Solved(plan) => plan,
        SolveOutcome::Infeasible => {
            warn!("no feasible route for batch, leaving rides unrouted");
            return Ok(BatchPlan {
                outcome: DispatchOutcome::OptimizationUnavailable,
                assignment,
                route: None,
            });
        }
        SolveOutcome::TimedOut => {
            warn!("route search timed out without a feasible plan");
            return Ok(BatchPlan {
                outcome: DispatchOutcome::OptimizationUnavailable,
                assignment,
                route: None,
            });
        }
    };

    let stops = decoder::decode(&plan, &batch);
    decoder::apply(rides, &stops);

    Ok(BatchPlan {
        outcome: assignment_outcome(&assignment),
        assignment,
        route: Some(stops),
    })
}

fn assignment_outcome(assignment: &AssignmentOutcome) -> DispatchOutcome {
    if assignment.is_fully_assigned() {
        DispatchOutcome::FullyAssigned
    } else {
        DispatchOutcome::PartiallyAssigned
    }
}
