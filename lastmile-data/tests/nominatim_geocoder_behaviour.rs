//! Behavioural tests for [`NominatimGeocoder`].

mod support;

use std::cell::RefCell;

use lastmile_core::{Coordinate, GeocodeError, Geocoder};
use lastmile_data::geocoding::NominatimGeocoder;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use support::{CannedResponse, closed_address, runtime, serve_once};

/// World state for geocoder scenarios.
struct GeocoderWorld {
    runtime: Runtime,
    base_url: RefCell<Option<String>>,
    server: RefCell<Option<JoinHandle<String>>>,
    result: RefCell<Option<Result<Vec<Coordinate>, GeocodeError>>>,
    request: RefCell<Option<String>>,
}

#[fixture]
fn world() -> GeocoderWorld {
    GeocoderWorld {
        runtime: runtime(),
        base_url: RefCell::new(None),
        server: RefCell::new(None),
        result: RefCell::new(None),
        request: RefCell::new(None),
    }
}

fn serve(world: &GeocoderWorld, canned: CannedResponse) {
    let (base_url, server) = world.runtime.block_on(serve_once(canned));
    world.base_url.replace(Some(base_url));
    world.server.replace(Some(server));
}

#[given("a geocoding service returning one match")]
fn one_match(world: &GeocoderWorld) {
    serve(
        world,
        CannedResponse::ok(
            r#"[{"place_id":1,"lat":"50.0865","lon":"14.4114","display_name":"Karlova 1, Praha"}]"#,
        ),
    );
}

#[given("a geocoding service returning no matches")]
fn no_matches(world: &GeocoderWorld) {
    serve(world, CannedResponse::ok("[]"));
}

#[given("a geocoding service answering with malformed JSON")]
fn malformed(world: &GeocoderWorld) {
    serve(world, CannedResponse::ok(r#"{"error":"#));
}

#[given("no geocoding service is listening")]
fn nothing_listening(world: &GeocoderWorld) {
    let base_url = world.runtime.block_on(closed_address());
    world.base_url.replace(Some(base_url));
}

#[when("I geocode {address}")]
fn geocode(world: &GeocoderWorld, address: String) {
    let base_url = world
        .base_url
        .borrow()
        .clone()
        .expect("service must be configured");
    let geocoder = NominatimGeocoder::new(base_url).expect("geocoder should build");

    let result = world
        .runtime
        .block_on(geocoder.geocode(address.trim_matches('"')));
    world.result.replace(Some(result));

    if let Some(server) = world.server.borrow_mut().take() {
        let request = world
            .runtime
            .block_on(server)
            .expect("server task should finish");
        world.request.replace(Some(request));
    }
}

#[then("the candidate {lat}, {lng} is returned")]
fn candidate_returned(world: &GeocoderWorld, lat: f64, lng: f64) {
    let borrowed = world.result.borrow();
    let candidates = borrowed
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .expect("expected Ok result");
    assert_eq!(candidates.as_slice(), [Coordinate { lat, lng }]);
}

#[then("the request carried the encoded address")]
fn encoded_address(world: &GeocoderWorld) {
    let captured = world.request.borrow();
    let request = captured.as_deref().expect("request should be captured");
    let request_line = request.lines().next().unwrap_or_default();
    assert!(
        request_line.starts_with("GET /search?q=Karlova+1%2C+Praha&format=jsonv2&limit=1 "),
        "unexpected request line {request_line:?}"
    );
    assert!(
        request
            .lines()
            .any(|line| line.to_ascii_lowercase().starts_with("user-agent: lastmile-geocoding/")),
        "user agent header missing"
    );
}

#[then("no candidates are returned")]
fn no_candidates(world: &GeocoderWorld) {
    let borrowed = world.result.borrow();
    assert!(
        matches!(borrowed.as_ref(), Some(Ok(candidates)) if candidates.is_empty()),
        "expected no candidates, got {borrowed:?}"
    );
}

#[then("a parse error is returned")]
fn parse_error(world: &GeocoderWorld) {
    let borrowed = world.result.borrow();
    assert!(
        matches!(borrowed.as_ref(), Some(Err(GeocodeError::Parse { .. }))),
        "expected Parse error, got {borrowed:?}"
    );
}

#[then("a network error is returned")]
fn network_error(world: &GeocoderWorld) {
    let borrowed = world.result.borrow();
    assert!(
        matches!(borrowed.as_ref(), Some(Err(GeocodeError::Network { .. }))),
        "expected Network error, got {borrowed:?}"
    );
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/nominatim_geocoder.feature", name = $title)]
        fn $fn_name(world: GeocoderWorld) {
            let _ = world;
        }
    };
}

register_scenario!(resolving_known_address, "resolving a known address");
register_scenario!(resolving_unknown_address, "resolving an unknown address");
register_scenario!(handling_malformed_response, "handling a malformed response");
register_scenario!(handling_unreachable_service, "handling an unreachable service");
