//! Travel-cost matrices and the distance provider seam.

use thiserror::Error;

use crate::domain::Location;

/// Failures from a distance backend.
///
/// These always surface to the caller; a row is never silently zero-filled.
/// Retry and backoff belong to the collaborator behind the trait, not here.
#[derive(Debug, Error)]
pub enum DistanceError {
    #[error("location {lat:.6},{lng:.6} could not be resolved")]
    UnresolvedLocation { lat: f64, lng: f64 },
    #[error("distance backend transport failure: {0}")]
    Transport(String),
    #[error("malformed matrix: expected {expected} rows/cols, got {got}")]
    MalformedMatrix { expected: usize, got: usize },
    #[error("negative cost {cost} between nodes {from} and {to}")]
    NegativeCost { from: usize, to: usize, cost: i32 },
}

/// Square matrix of non-negative travel costs in seconds.
///
/// Symmetry is up to the backend and never assumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    costs: Vec<Vec<i32>>,
}

impl CostMatrix {
    /// Validates shape and sign; the only way to construct a matrix.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self, DistanceError> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(DistanceError::MalformedMatrix {
                    expected: n,
                    got: row.len(),
                });
            }
            for (j, &cost) in row.iter().enumerate() {
                if cost < 0 {
                    return Err(DistanceError::NegativeCost {
                        from: i,
                        to: j,
                        cost,
                    });
                }
            }
        }
        Ok(Self { costs: rows })
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn cost(&self, from: usize, to: usize) -> i32 {
        self.costs[from][to]
    }
}

/// Batched travel-cost lookup for a set of locations.
///
/// One call returns the full pairwise matrix so backends can bound their
/// request volume. Implementations must fail explicitly when any location
/// cannot be resolved.
pub trait DistanceProvider {
    fn matrix(&self, locations: &[Location]) -> Result<CostMatrix, DistanceError>;
}
