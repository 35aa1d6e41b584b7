//! Shared fixtures for CLI tests: temporary request files and a stub
//! optimiser builder that keeps every provider in process.

use camino::{Utf8Path, Utf8PathBuf};
use lastmile_core::test_support::{ScriptedMatrixProvider, StubGeocoder};
use lastmile_core::{
    Coordinate, DistanceMatrixProvider, Geocoder, ProviderFailure, RouteOptimizer,
};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::CliError;
use crate::optimize::{DynOptimizer, OptimizeConfig, OptimizerBuilder};

pub(super) const DEPOT: Coordinate = Coordinate {
    lat: 50.0755,
    lng: 14.4378,
};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write file");
}

/// Temporary directory holding a request file.
pub(super) struct RequestDir {
    _dir: TempDir,
    pub(super) root: Utf8PathBuf,
    pub(super) request_path: Utf8PathBuf,
}

impl RequestDir {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        let request_path = root.join("request.json");
        Self {
            _dir: dir,
            root,
            request_path,
        }
    }

    pub(super) fn write_request(&self, request: &Value) {
        let payload = serde_json::to_vec_pretty(request).expect("serialise request");
        write_utf8(&self.request_path, &payload);
    }
}

/// Request JSON with stops at the given `(id, lat)` positions on the depot's
/// meridian.
pub(super) fn request_json(stops: &[(&str, f64)]) -> Value {
    let stops: Vec<Value> = stops
        .iter()
        .map(|(id, lat)| {
            json!({
                "id": id,
                "address": format!("{id} street"),
                "coordinate": { "lat": lat, "lng": DEPOT.lng },
            })
        })
        .collect();
    json!({
        "stops": stops,
        "driver_start": { "lat": DEPOT.lat, "lng": DEPOT.lng },
        "start_time": "2026-03-02T08:00:00Z",
        "zone": { "center": { "lat": DEPOT.lat, "lng": DEPOT.lng }, "radius_km": 50.0 },
    })
}

/// Builder returning an optimiser over in-process test doubles.
#[derive(Debug, Default)]
pub(super) struct StubOptimizerBuilder {
    /// Provider call (1-based) that fails, if any.
    pub(super) failing_call: Option<(usize, ProviderFailure)>,
}

impl OptimizerBuilder for StubOptimizerBuilder {
    fn build(&self, config: &OptimizeConfig) -> Result<DynOptimizer, CliError> {
        let geocoder: Box<dyn Geocoder> = Box::new(StubGeocoder::default());
        let scripted = match &self.failing_call {
            Some((call, failure)) => {
                ScriptedMatrixProvider::default().failing_on_call(*call, failure.clone())
            }
            None => ScriptedMatrixProvider::default(),
        };
        let matrix: Box<dyn DistanceMatrixProvider> = Box::new(scripted);
        Ok(RouteOptimizer::with_config(
            geocoder,
            matrix,
            config.optimizer.clone(),
        ))
    }
}
