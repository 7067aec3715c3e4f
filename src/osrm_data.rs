//! OSRM dataset preparation helpers (download + preprocess).
//!
//! Stands up a routable OpenStreetMap extract for the integration tests:
//! fetch a Geofabrik .pbf, then run the osrm-backend extract/partition/
//! customize pipeline via docker. Requires docker and network access.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OsrmDataError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("extract download failed: {0}")]
    Download(String),
    #[error("preprocessing step failed: {0}")]
    Process(String),
}

/// A Geofabrik region, e.g. "north-america/us/rhode-island".
#[derive(Debug, Clone)]
pub struct GeofabrikRegion {
    pub path: String,
}

impl GeofabrikRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Last path segment, used for local file naming.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("region")
    }

    pub fn url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.path)
    }
}

/// A prepared extract ready for `osrm-routed --algorithm mld`.
#[derive(Debug, Clone)]
pub struct OsrmExtract {
    pub data_dir: PathBuf,
    pub osrm_base: PathBuf,
}

impl OsrmExtract {
    /// Downloads and preprocesses the region under `data_root`, skipping any
    /// step whose outputs already exist.
    pub fn prepare(
        region: &GeofabrikRegion,
        data_root: impl Into<PathBuf>,
    ) -> Result<Self, OsrmDataError> {
        let data_root = data_root.into();
        let data_root = if data_root.is_absolute() {
            data_root
        } else {
            std::env::current_dir()?.join(data_root)
        };
        let data_dir = data_root.join(region.name());
        fs::create_dir_all(&data_dir)?;

        let pbf_path = data_dir.join(format!("{}-latest.osm.pbf", region.name()));
        if !pbf_path.exists() {
            download_pbf(&region.url(), &pbf_path)?;
        }

        let osrm_base = data_dir.join(format!("{}-latest.osrm", region.name()));
        if !osrm_base.exists() {
            run_backend(
                &data_dir,
                &[
                    "osrm-extract",
                    "-p",
                    "/opt/car.lua",
                    &format!("/data/{}", file_name(&pbf_path)),
                ],
            )?;
        }

        if !mld_ready(&osrm_base) {
            for step in ["osrm-partition", "osrm-customize"] {
                run_backend(&data_dir, &[step, &format!("/data/{}", file_name(&osrm_base))])?;
            }
        }

        Ok(Self { data_dir, osrm_base })
    }
}

fn download_pbf(url: &str, dest: &Path) -> Result<(), OsrmDataError> {
    let response = reqwest::blocking::get(url)
        .and_then(|resp| resp.error_for_status())
        .map_err(|err| OsrmDataError::Download(err.to_string()))?;
    let bytes = response
        .bytes()
        .map_err(|err| OsrmDataError::Download(err.to_string()))?;

    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn mld_ready(osrm_base: &Path) -> bool {
    ["osrm.partition", "osrm.mldgr", "osrm.cells"]
        .iter()
        .all(|ext| osrm_base.with_extension(ext).exists())
}

fn run_backend(data_dir: &Path, args: &[&str]) -> Result<(), OsrmDataError> {
    let status = Command::new("docker")
        .arg("run")
        .arg("--rm")
        .arg("-t")
        .arg("-v")
        .arg(format!("{}:/data", data_dir.display()))
        .arg("osrm/osrm-backend")
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(OsrmDataError::Process(format!(
            "docker exited with status {}",
            status
        )))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}
