//! nemt-dispatch core
//!
//! Assigns medical-transport rides to qualified drivers and sequences them
//! into time-feasible routes. Eligibility is a four-predicate matcher,
//! assignment is an explicit first-fit heuristic, and routing is a
//! single-vehicle time-window search over a pluggable distance matrix.

pub mod assignment;
pub mod decoder;
pub mod domain;
pub mod eligibility;
pub mod haversine;
pub mod matrix;
pub mod optimizer;
pub mod osrm;
pub mod osrm_data;
pub mod planner;
