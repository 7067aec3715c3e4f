//! OSRM adapter integration test.
//!
//! Prepares a Rhode Island extract, starts osrm-routed in a container, and
//! checks the table adapter end to end. Requires docker and network access,
//! so it is ignored by default; run with `cargo test -- --ignored`.

mod fixtures;

use std::env;
use std::time::{Duration, Instant};

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

use nemt_dispatch::matrix::DistanceProvider;
use nemt_dispatch::osrm::{OsrmClient, OsrmConfig};
use nemt_dispatch::osrm_data::{GeofabrikRegion, OsrmExtract};

use fixtures::providence_locations;

fn osrm_container() -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let data_root = env::var("OSRM_DATA_DIR").unwrap_or_else(|_| "osrm-data".to_string());
    let region = GeofabrikRegion::new("north-america/us/rhode-island");
    let extract = OsrmExtract::prepare(&region, data_root)
        .map_err(|err| TestcontainersError::other(format!("OSRM prep failed: {err}")))?;

    let image = GenericImage::new("osrm/osrm-backend", "latest")
        .with_exposed_port(5000.tcp())
        .with_mount(Mount::bind_mount(
            extract.data_dir.to_string_lossy().to_string(),
            "/data",
        ))
        .with_cmd(vec![
            "osrm-routed",
            "--algorithm",
            "mld",
            "/data/rhode-island-latest.osrm",
        ])
        .with_container_name("osrm-rhode-island-mld")
        .with_startup_timeout(Duration::from_secs(30))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(5000.tcp())?;
    Ok((container, format!("http://127.0.0.1:{port}")))
}

#[test]
#[ignore = "requires docker and network access"]
fn osrm_table_round_trip() {
    let (container, base_url) = osrm_container().expect("start OSRM container");

    let client = OsrmClient::new(OsrmConfig {
        base_url,
        profile: "car".to_string(),
        timeout_secs: 30,
    })
    .expect("build OSRM client");

    let locations = providence_locations::hospitals();

    // osrm-routed needs a moment after the container reports healthy.
    let start = Instant::now();
    let matrix = loop {
        match client.matrix(&locations) {
            Ok(matrix) => break matrix,
            Err(err) if start.elapsed() < Duration::from_secs(15) => {
                eprintln!("OSRM not ready yet: {err}");
                std::thread::sleep(Duration::from_millis(500));
            }
            Err(err) => panic!("OSRM table request failed: {err}"),
        }
    };

    assert_eq!(matrix.len(), locations.len());
    for i in 0..locations.len() {
        assert_eq!(matrix.cost(i, i), 0, "diagonal should be zero");
    }
    // Hospitals are spread across the city; off-diagonal legs take real time.
    assert!(
        matrix.cost(0, 1) > 0,
        "RI Hospital to Miriam should take time"
    );

    drop(container);
}
