//! OSRM HTTP adapter for distance matrices.

use serde::Deserialize;

use crate::domain::Location;
use crate::matrix::{CostMatrix, DistanceError, DistanceProvider};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, DistanceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| DistanceError::Transport(err.to_string()))?;

        Ok(Self { config, client })
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    // OSRM emits null for pairs it cannot route.
    durations: Option<Vec<Vec<Option<f64>>>>,
}

/// Converts an OSRM table body into a validated matrix.
///
/// A null duration means OSRM could not snap or route one of the endpoints;
/// that surfaces as [`DistanceError::UnresolvedLocation`] for the
/// destination column rather than a zero-filled cell.
fn decode_table(
    response: OsrmTableResponse,
    locations: &[Location],
) -> Result<CostMatrix, DistanceError> {
    let n = locations.len();

    if response.code != "Ok" {
        return Err(DistanceError::Transport(format!(
            "OSRM status {}",
            response.code
        )));
    }

    let durations = response.durations.ok_or(DistanceError::MalformedMatrix {
        expected: n,
        got: 0,
    })?;
    if durations.len() != n {
        return Err(DistanceError::MalformedMatrix {
            expected: n,
            got: durations.len(),
        });
    }

    let mut rows = Vec::with_capacity(n);
    for row in durations {
        if row.len() != n {
            return Err(DistanceError::MalformedMatrix {
                expected: n,
                got: row.len(),
            });
        }
        let mut costs = Vec::with_capacity(n);
        for (j, value) in row.into_iter().enumerate() {
            match value {
                Some(seconds) => costs.push(seconds.round() as i32),
                None => {
                    return Err(DistanceError::UnresolvedLocation {
                        lat: locations[j].lat,
                        lng: locations[j].lng,
                    });
                }
            }
        }
        rows.push(costs);
    }

    CostMatrix::from_rows(rows)
}

impl DistanceProvider for OsrmClient {
    fn matrix(&self, locations: &[Location]) -> Result<CostMatrix, DistanceError> {
        if locations.is_empty() {
            return CostMatrix::from_rows(Vec::new());
        }

        let coords = locations
            .iter()
            .map(|loc| format!("{:.6},{:.6}", loc.lng, loc.lat))
            .collect::<Vec<_>>()
            .join(";");

        let url = format!(
            "{}/table/v1/{}/{}?annotations=duration",
            self.config.base_url, self.config.profile, coords
        );

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>())
            .map_err(|err| DistanceError::Transport(err.to_string()))?;

        decode_table(response, locations)
    }
}
