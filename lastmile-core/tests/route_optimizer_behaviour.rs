//! Behavioural tests for [`RouteOptimizer`].
//!
//! Providers are the in-memory doubles from `test_support`, so scenarios run
//! without network access on a single-threaded runtime.

use std::cell::RefCell;

use chrono::{TimeZone, Utc};
use lastmile_core::test_support::{ScriptedMatrixProvider, StubGeocoder};
use lastmile_core::{
    Coordinate, DeliveryZone, OptimizationFailure, OptimizeRequest, OptimizerConfig,
    ProviderFailure, Route, RouteOptimizer, Stop,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const DEPOT: Coordinate = Coordinate {
    lat: 50.0755,
    lng: 14.4378,
};

/// One degree of latitude on the haversine sphere.
const KM_PER_DEGREE: f64 = 111.194_926_644_558_73;

/// World state for route optimiser scenarios.
#[derive(Debug, Default)]
struct OptimizerWorld {
    stops: RefCell<Vec<Stop>>,
    failing_call: RefCell<Option<usize>>,
    outcome: RefCell<Option<Result<Route, OptimizationFailure>>>,
}

#[fixture]
fn world() -> OptimizerWorld {
    OptimizerWorld::default()
}

fn unquote(text: &str) -> String {
    text.trim_matches('"').to_owned()
}

fn ids(list: &str) -> Vec<String> {
    unquote(list)
        .split(',')
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect()
}

fn north_of_depot(km: f64) -> Coordinate {
    Coordinate {
        lat: DEPOT.lat + km / KM_PER_DEGREE,
        lng: DEPOT.lng,
    }
}

// --- Given steps ---

#[given("a driver at the depot")]
fn driver_at_depot(world: &OptimizerWorld) {
    world.stops.borrow_mut().clear();
}

#[given("a stop {id} {km} km north of the depot")]
fn stop_north(world: &OptimizerWorld, id: String, km: f64) {
    let stop_id = unquote(&id);
    let stop = Stop::new(stop_id.clone(), format!("{stop_id} street"))
        .with_coordinate(north_of_depot(km));
    world.stops.borrow_mut().push(stop);
}

#[given("a stop {id} with the unknown address {address}")]
fn stop_unknown(world: &OptimizerWorld, id: String, address: String) {
    world
        .stops
        .borrow_mut()
        .push(Stop::new(unquote(&id), unquote(&address)));
}

#[given("a routing service that fails on request {call}")]
fn failing_routing(world: &OptimizerWorld, call: usize) {
    world.failing_call.replace(Some(call));
}

// --- When steps ---

#[when("the route is optimised")]
fn optimise(world: &OptimizerWorld) {
    let mut provider = ScriptedMatrixProvider::default();
    if let Some(call) = *world.failing_call.borrow() {
        provider = provider.failing_on_call(
            call,
            ProviderFailure::Network {
                url: "http://router.test/table/v1/driving".into(),
                message: "connection refused".into(),
            },
        );
    }
    let optimizer = RouteOptimizer::with_config(
        StubGeocoder::default(),
        provider,
        OptimizerConfig::default(),
    );
    let request = OptimizeRequest {
        stops: world.stops.borrow().clone(),
        driver_start: DEPOT,
        start_time: Utc
            .with_ymd_and_hms(2024, 5, 6, 8, 0, 0)
            .single()
            .expect("valid timestamp"),
        zone: DeliveryZone {
            center: DEPOT,
            radius_km: 50.0,
        },
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime should build");
    let outcome = runtime.block_on(optimizer.optimize(&request));
    world.outcome.replace(Some(outcome));
}

// --- Then steps ---

#[then("the route visits {order}")]
fn route_visits(world: &OptimizerWorld, order: String) {
    let outcome = world.outcome.borrow();
    let route = outcome
        .as_ref()
        .expect("optimiser must have run")
        .as_ref()
        .expect("optimisation should succeed");
    let visited: Vec<String> = route.stop_ids().map(str::to_owned).collect();
    assert_eq!(visited, ids(&order));
}

#[then("the route totals equal the sum of its legs")]
fn totals_match(world: &OptimizerWorld) {
    let outcome = world.outcome.borrow();
    let route = outcome
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .expect("successful route");
    let distance: f64 = route.legs.iter().map(|leg| leg.distance_km).sum();
    let minutes: u64 = route.legs.iter().map(|leg| u64::from(leg.duration_min)).sum();
    assert!((route.total_distance_km - distance).abs() < 1e-9);
    assert_eq!(route.total_duration_min, minutes);
}

#[then("the leg for {id} is flagged as estimated")]
fn leg_is_estimated(world: &OptimizerWorld, id: String) {
    let stop_id = unquote(&id);
    let outcome = world.outcome.borrow();
    let route = outcome
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .expect("successful route");
    let leg = route
        .legs
        .iter()
        .find(|leg| leg.stop_id == stop_id)
        .expect("leg should exist");
    assert!(leg.is_estimated());
    assert_eq!(leg.coordinate, DEPOT);
}

#[then("optimisation fails with {kind}")]
fn fails_with(world: &OptimizerWorld, kind: String) {
    let outcome = world.outcome.borrow();
    let failure = outcome
        .as_ref()
        .and_then(|result| result.as_ref().err())
        .expect("optimisation should fail");
    assert_eq!(failure.report().kind, unquote(&kind));
}

#[then("the partial route visits {order}")]
fn partial_visits(world: &OptimizerWorld, order: String) {
    let outcome = world.outcome.borrow();
    let failure = outcome
        .as_ref()
        .and_then(|result| result.as_ref().err())
        .expect("optimisation should fail");
    let visited: Vec<String> = failure.partial.stop_ids().map(str::to_owned).collect();
    assert_eq!(visited, ids(&order));
}

#[then("the stops {list} are reported unvisited")]
fn reported_unvisited(world: &OptimizerWorld, list: String) {
    let outcome = world.outcome.borrow();
    let failure = outcome
        .as_ref()
        .and_then(|result| result.as_ref().err())
        .expect("optimisation should fail");
    assert_eq!(failure.unvisited, ids(&list));
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 0)]
fn nearest_first(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 1)]
fn fallback_for_unknown_address(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 2)]
fn partial_route_on_failure(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 3)]
fn empty_request(world: OptimizerWorld) {
    let _ = world;
}
