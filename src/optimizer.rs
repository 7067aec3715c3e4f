//! Route/time optimization for one batch of schedulable rides.
//!
//! Builds a single-vehicle routing problem over a synthetic depot (node 0)
//! plus one node per ride, with a cumulative time dimension constrained by
//! each ride's pickup window. Construction is cheapest-insertion seeded in
//! earliest-window order; improvement is relocate + segment-reversal local
//! search under a hard wall-clock budget. Infeasibility is an outcome, not
//! an error.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::domain::Ride;
use crate::matrix::CostMatrix;

/// How arc costs are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArcCostModel {
    /// The historical approximation: the cost of travelling i → j is the sum
    /// of the two nodes' own one-way distance estimates. Total route cost is
    /// then independent of visiting order; only the time windows drive the
    /// sequence.
    #[default]
    NodeEstimate,
    /// True origin-destination costs from the distance matrix.
    PairwiseMatrix,
}

#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Allowed early arrival before the requested pickup (seconds).
    pub pre_buffer_secs: i64,
    /// Allowed late arrival past the requested pickup (seconds).
    pub post_buffer_secs: i64,
    /// Extra slack widening the early side of every window (seconds).
    pub window_slack_secs: i64,
    /// Cap on the route's duration beyond the batch's pickup span (seconds).
    pub max_route_span_secs: i64,
    /// Unit conversion from a kilometre estimate to arc-cost seconds.
    pub secs_per_km: f64,
    pub arc_cost_model: ArcCostModel,
    /// Wall-clock budget for the whole solve. A tunable, not a correctness
    /// requirement; the best feasible plan found so far survives expiry.
    pub time_budget: Duration,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            pre_buffer_secs: 600,
            post_buffer_secs: 600,
            window_slack_secs: 1800,
            max_route_span_secs: 4 * 3600,
            secs_per_km: 90.0, // ~40 km/h
            arc_cost_model: ArcCostModel::default(),
            time_budget: Duration::from_secs(10),
        }
    }
}

/// Permitted interval for a node's cumulative-time variable, relative to the
/// batch epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub earliest: i64,
    pub latest: i64,
}

impl TimeWindow {
    pub fn contains(&self, t: i64) -> bool {
        (self.earliest..=self.latest).contains(&t)
    }
}

/// Routing graph for one batch: depot at node 0, one node per ride, windows
/// relative to the batch epoch (the earliest pickup in the batch).
///
/// Owned only for the lifetime of one solve call; nothing here outlives the
/// batch.
pub struct RoutingProblem<'a> {
    matrix: &'a CostMatrix,
    node_costs: Vec<i64>,
    windows: Vec<TimeWindow>,
    epoch: i64,
    horizon: i64,
    model: ArcCostModel,
}

impl<'a> RoutingProblem<'a> {
    /// Builds the graph. `matrix` must be depot-first and sized
    /// `(rides.len() + 1)²`; rides must all be schedulable.
    pub fn build(rides: &[Ride], matrix: &'a CostMatrix, config: &OptimizerConfig) -> Self {
        debug_assert!(rides.iter().all(Ride::is_schedulable));
        debug_assert_eq!(matrix.len(), rides.len() + 1);

        let epoch = rides.iter().map(|r| r.pickup_time).min().unwrap_or(0);
        let latest_pickup = rides.iter().map(|r| r.pickup_time).max().unwrap_or(epoch);
        let horizon = (latest_pickup - epoch) + config.max_route_span_secs;

        let mut node_costs = vec![0_i64];
        let mut windows = vec![TimeWindow {
            earliest: 0,
            latest: horizon,
        }];
        for ride in rides {
            node_costs.push((ride.distance_estimate_km * config.secs_per_km).round() as i64);
            let pickup = ride.pickup_time - epoch;
            let earliest =
                (pickup - config.pre_buffer_secs - config.window_slack_secs).max(0);
            let latest =
                pickup + config.post_buffer_secs + i64::from(ride.wait_tolerance_min) * 60;
            windows.push(TimeWindow { earliest, latest });
        }

        Self {
            matrix,
            node_costs,
            windows,
            epoch,
            horizon,
            model: config.arc_cost_model,
        }
    }

    /// Nodes including the depot.
    pub fn node_count(&self) -> usize {
        self.node_costs.len()
    }

    /// Batch epoch (unix seconds) all windows and arrivals are relative to.
    pub fn epoch(&self) -> i64 {
        self.epoch
    }

    pub fn window(&self, node: usize) -> TimeWindow {
        self.windows[node]
    }

    /// Arc cost, which doubles as the transit time for the time dimension.
    pub fn arc_cost(&self, from: usize, to: usize) -> i64 {
        if from == to {
            return 0;
        }
        match self.model {
            ArcCostModel::NodeEstimate => self.node_costs[from] + self.node_costs[to],
            ArcCostModel::PairwiseMatrix => i64::from(self.matrix.cost(from, to)),
        }
    }
}

/// One visited node with its resolved cumulative-time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStop {
    pub node: usize,
    /// Arrival relative to the batch epoch (seconds).
    pub arrival_offset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePlan {
    pub epoch: i64,
    /// Visiting order, depot excluded.
    pub stops: Vec<PlannedStop>,
    pub total_cost: i64,
}

impl RoutePlan {
    pub fn empty() -> Self {
        Self {
            epoch: 0,
            stops: Vec::new(),
            total_cost: 0,
        }
    }
}

/// Outcome of one solve. Callers branch on the tag; nothing is thrown for
/// ordinary infeasibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(RoutePlan),
    /// No ordering satisfies the time windows.
    Infeasible,
    /// The wall-clock budget expired before any feasible plan was found.
    TimedOut,
}

/// Orders the batch into a cost-minimizing route honoring every ride's
/// pickup window. Empty input is a no-op.
pub fn solve(rides: &[Ride], matrix: &CostMatrix, config: &OptimizerConfig) -> SolveOutcome {
    if rides.is_empty() {
        return SolveOutcome::Solved(RoutePlan::empty());
    }

    let deadline = Instant::now() + config.time_budget;
    let problem = RoutingProblem::build(rides, matrix, config);

    let mut order = match construct(&problem, deadline) {
        Construction::Feasible(order) => order,
        Construction::Infeasible => return SolveOutcome::Infeasible,
        Construction::OutOfTime => return SolveOutcome::TimedOut,
    };

    improve(&problem, &mut order, deadline);

    match simulate(&problem, &order) {
        Some((arrivals, total_cost)) => {
            let stops = order
                .iter()
                .zip(arrivals)
                .map(|(&node, arrival_offset)| PlannedStop {
                    node,
                    arrival_offset,
                })
                .collect();
            debug!(total_cost, stops = order.len(), "route solved");
            SolveOutcome::Solved(RoutePlan {
                epoch: problem.epoch(),
                stops,
                total_cost,
            })
        }
        // The improved order was feasibility-checked at every step.
        None => SolveOutcome::Infeasible,
    }
}

enum Construction {
    Feasible(Vec<usize>),
    Infeasible,
    OutOfTime,
}

/// Cheapest insertion, seeded in earliest-window order so tight morning
/// windows claim their slots before flexible afternoon ones.
fn construct(problem: &RoutingProblem<'_>, deadline: Instant) -> Construction {
    let mut pending: Vec<usize> = (1..problem.node_count()).collect();
    pending.sort_by_key(|&node| problem.window(node).earliest);

    let mut order: Vec<usize> = Vec::with_capacity(pending.len());
    for node in pending {
        if Instant::now() >= deadline {
            debug!("time budget exhausted during construction");
            return Construction::OutOfTime;
        }

        let mut best: Option<(usize, i64)> = None;
        for position in 0..=order.len() {
            let mut candidate = order.clone();
            candidate.insert(position, node);
            if let Some((_, cost)) = simulate(problem, &candidate) {
                if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                    best = Some((position, cost));
                }
            }
        }

        match best {
            Some((position, _)) => order.insert(position, node),
            None => return Construction::Infeasible,
        }
    }

    Construction::Feasible(order)
}

/// Forward time simulation of a candidate order.
///
/// Returns per-stop arrivals and the total arc cost, or `None` when any
/// window or the route-span bound is violated. Waiting for a window to open
/// is allowed and unpenalized.
fn simulate(problem: &RoutingProblem<'_>, order: &[usize]) -> Option<(Vec<i64>, i64)> {
    let mut time = 0_i64;
    let mut cost = 0_i64;
    let mut arrivals = Vec::with_capacity(order.len());
    let mut prev = 0_usize;

    for &node in order {
        let transit = problem.arc_cost(prev, node);
        time += transit;
        cost += transit;

        let window = problem.window(node);
        if time < window.earliest {
            time = window.earliest;
        }
        if time > window.latest {
            return None;
        }

        arrivals.push(time);
        prev = node;
    }

    // Route closes back at the depot.
    let back = problem.arc_cost(prev, 0);
    time += back;
    cost += back;
    if time > problem.horizon {
        return None;
    }

    Some((arrivals, cost))
}

/// Local search: relocate single stops and reverse segments while the
/// wall-clock budget lasts. Every accepted move is feasibility-checked, so
/// the incumbent is always a valid plan.
fn improve(problem: &RoutingProblem<'_>, order: &mut Vec<usize>, deadline: Instant) {
    let Some((_, mut best_cost)) = simulate(problem, order) else {
        return;
    };

    loop {
        if Instant::now() >= deadline {
            debug!("time budget exhausted during improvement");
            return;
        }

        let mut improved = false;

        // Relocate: move one stop to another position.
        'relocate: for from in 0..order.len() {
            for to in 0..order.len() {
                if to == from {
                    continue;
                }
                let mut candidate = order.clone();
                let node = candidate.remove(from);
                candidate.insert(to, node);
                if let Some((_, cost)) = simulate(problem, &candidate) {
                    if cost < best_cost {
                        *order = candidate;
                        best_cost = cost;
                        improved = true;
                        debug!(cost, "relocate improved route");
                        break 'relocate;
                    }
                }
            }
            if Instant::now() >= deadline {
                return;
            }
        }

        // 2-opt: reverse a segment.
        'reverse: for i in 0..order.len() {
            for j in (i + 1)..order.len() {
                let mut candidate = order.clone();
                candidate[i..=j].reverse();
                if let Some((_, cost)) = simulate(problem, &candidate) {
                    if cost < best_cost {
                        *order = candidate;
                        best_cost = cost;
                        improved = true;
                        debug!(cost, "segment reversal improved route");
                        break 'reverse;
                    }
                }
            }
            if Instant::now() >= deadline {
                return;
            }
        }

        if !improved {
            return;
        }
    }
}
