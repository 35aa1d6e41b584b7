//! Unit tests for batching and caching in `AddressResolver`.

use std::time::Duration;

use rstest::{fixture, rstest};

use super::*;
use crate::test_support::StubGeocoder;

const KARLOVA: Coordinate = Coordinate {
    lat: 50.0865,
    lng: 14.4114,
};

#[fixture]
fn geocoder() -> StubGeocoder {
    StubGeocoder::default()
        .with_address("Karlova 1", KARLOVA)
        .with_address(
            "Nerudova 2",
            Coordinate {
                lat: 50.0880,
                lng: 14.3990,
            },
        )
        .with_failure(
            "Broken 3",
            GeocodeError::Network {
                url: "http://geocoder.test".into(),
                message: "connection reset".into(),
            },
        )
        .with_address(
            "Atlantis 4",
            Coordinate {
                lat: 95.0,
                lng: 0.0,
            },
        )
}

#[rstest]
#[tokio::test]
async fn results_follow_input_order(geocoder: StubGeocoder) {
    let mut resolver = AddressResolver::with_batching(&geocoder, 5, Duration::ZERO);
    let addresses = ["Nerudova 2", "Unknown 9", "Karlova 1"];

    let results = resolver.resolve_batch(&addresses).await;

    let order: Vec<&str> = results.iter().map(|(address, _)| address.as_str()).collect();
    assert_eq!(order, addresses);
    assert!(matches!(results.get(1), Some((_, Err(ResolutionFailure::NoMatch { .. })))));
    assert_eq!(results.get(2).map(|(_, outcome)| outcome.clone()), Some(Ok(KARLOVA)));
}

#[rstest]
#[tokio::test]
async fn duplicate_addresses_hit_the_provider_once(geocoder: StubGeocoder) {
    let mut resolver = AddressResolver::with_batching(&geocoder, 5, Duration::ZERO);

    let results = resolver
        .resolve_batch(&["Karlova 1", "Karlova 1", "Karlova 1"])
        .await;
    let again = resolver.resolve("Karlova 1").await;

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|(_, outcome)| *outcome == Ok(KARLOVA)));
    assert_eq!(again, Ok(KARLOVA));
    assert_eq!(geocoder.calls_for("Karlova 1"), 1);
    assert_eq!(resolver.cached_len(), 1);
}

#[rstest]
#[tokio::test]
async fn failures_are_isolated_per_address(geocoder: StubGeocoder) {
    let mut resolver = AddressResolver::with_batching(&geocoder, 5, Duration::ZERO);

    let results = resolver
        .resolve_batch(&["Broken 3", "Karlova 1", "Atlantis 4"])
        .await;

    assert!(matches!(
        results.first(),
        Some((_, Err(ResolutionFailure::Provider { source: GeocodeError::Network { .. }, .. })))
    ));
    assert_eq!(results.get(1).map(|(_, outcome)| outcome.clone()), Some(Ok(KARLOVA)));
    assert!(matches!(
        results.get(2),
        Some((_, Err(ResolutionFailure::InvalidCoordinate { .. })))
    ));
}

#[rstest]
#[tokio::test]
async fn failures_are_cached_too(geocoder: StubGeocoder) {
    let mut resolver = AddressResolver::with_batching(&geocoder, 5, Duration::ZERO);

    let first = resolver.resolve("Broken 3").await;
    let second = resolver.resolve("Broken 3").await;

    assert!(first.is_err());
    assert_eq!(first, second);
    assert_eq!(geocoder.calls_for("Broken 3"), 1);
}

#[tokio::test(start_paused = true)]
async fn groups_never_exceed_batch_size() {
    let addresses: Vec<String> = (0..12).map(|index| format!("Street {index}")).collect();
    let geocoder = addresses.iter().fold(StubGeocoder::default(), |stub, address| {
        stub.with_delay(address, Duration::from_millis(50))
    });
    let mut resolver = AddressResolver::with_batching(&geocoder, 5, Duration::ZERO);

    let results = resolver.resolve_batch(&addresses).await;

    assert_eq!(results.len(), 12);
    assert_eq!(geocoder.calls().len(), 12);
    assert_eq!(geocoder.peak_in_flight(), 5);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn slow_lookups_keep_their_position(geocoder: StubGeocoder) {
    let geocoder = geocoder
        .with_delay("Karlova 1", Duration::from_millis(100))
        .with_delay("Nerudova 2", Duration::from_millis(10));
    let mut resolver = AddressResolver::with_batching(&geocoder, 5, Duration::ZERO);
    let addresses = ["Karlova 1", "Nerudova 2", "Broken 3", "Unknown 9"];

    let results = resolver.resolve_batch(&addresses).await;

    let order: Vec<&str> = results.iter().map(|(address, _)| address.as_str()).collect();
    assert_eq!(order, addresses);
    assert_eq!(results.first().map(|(_, outcome)| outcome.clone()), Some(Ok(KARLOVA)));
    assert!(matches!(results.get(1), Some((_, Ok(_)))));
    assert!(matches!(results.get(2), Some((_, Err(ResolutionFailure::Provider { .. })))));
    assert!(matches!(results.get(3), Some((_, Err(ResolutionFailure::NoMatch { .. })))));
}

#[tokio::test(start_paused = true)]
async fn groups_are_separated_by_the_delay() {
    let addresses: Vec<String> = (0..7).map(|index| format!("Street {index}")).collect();
    let geocoder = StubGeocoder::default();
    let mut resolver =
        AddressResolver::with_batching(&geocoder, 5, Duration::from_millis(200));

    resolver.resolve_batch(&addresses).await;

    let starts = geocoder.call_starts();
    let (Some(first), Some(sixth)) = (starts.first(), starts.get(5)) else {
        panic!("expected seven lookups, got {}", starts.len());
    };
    assert!(starts.iter().take(5).all(|at| at == first));
    assert!(sixth.duration_since(*first) >= Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn single_group_does_not_wait() {
    let geocoder = StubGeocoder::default();
    let mut resolver =
        AddressResolver::with_batching(&geocoder, 5, Duration::from_millis(200));
    let before = tokio::time::Instant::now();

    resolver.resolve_batch(&["a", "b", "c"]).await;

    assert_eq!(tokio::time::Instant::now(), before);
}

#[rstest]
#[tokio::test]
async fn empty_batch_makes_no_calls(geocoder: StubGeocoder) {
    let mut resolver = AddressResolver::new(&geocoder, &OptimizerConfig::default());
    let results = resolver.resolve_batch::<&str>(&[]).await;

    assert!(results.is_empty());
    assert!(geocoder.calls().is_empty());
}

#[rstest]
fn zero_batch_size_is_clamped(geocoder: StubGeocoder) {
    let resolver = AddressResolver::with_batching(&geocoder, 0, Duration::ZERO);
    assert_eq!(resolver.batch_size, 1);
}
