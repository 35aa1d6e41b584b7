//! Offline provider estimating travel from great-circle distance.

use async_trait::async_trait;

use crate::Coordinate;
use crate::zone::haversine_km;

use super::error::ProviderFailure;
use super::provider::{DistanceMatrixProvider, ProviderMatrix, TravelEstimate};

/// Default average speed for straight-line estimates, typical of urban
/// delivery traffic.
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 30.0;

/// Estimates distance as the haversine distance and duration from a constant
/// average speed. Every pair is routable and no network is involved, which
/// makes it a deterministic stand-in when no routing service is configured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightLineMatrixProvider {
    average_speed_kmh: f64,
}

impl Default for StraightLineMatrixProvider {
    fn default() -> Self {
        Self {
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}

impl StraightLineMatrixProvider {
    /// Create a provider travelling at `average_speed_kmh`.
    ///
    /// Non-positive or non-finite speeds fall back to
    /// [`DEFAULT_AVERAGE_SPEED_KMH`].
    #[must_use]
    pub fn new(average_speed_kmh: f64) -> Self {
        if average_speed_kmh.is_finite() && average_speed_kmh > 0.0 {
            Self { average_speed_kmh }
        } else {
            Self::default()
        }
    }

    /// Estimate travel from `origin` to `destination`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "duration is derived from distance and speed"
    )]
    pub fn estimate(&self, origin: Coordinate, destination: Coordinate) -> TravelEstimate {
        let distance_km = haversine_km(origin, destination);
        TravelEstimate {
            distance_meters: distance_km * 1000.0,
            duration_secs: distance_km / self.average_speed_kmh * 3600.0,
        }
    }
}

#[async_trait]
impl DistanceMatrixProvider for StraightLineMatrixProvider {
    async fn travel_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<ProviderMatrix, ProviderFailure> {
        if origins.is_empty() || destinations.is_empty() {
            return Err(ProviderFailure::EmptyInput);
        }
        Ok(origins
            .iter()
            .map(|&origin| {
                destinations
                    .iter()
                    .map(|&destination| Some(self.estimate(origin, destination)))
                    .collect()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn estimate_uses_average_speed() {
        let provider = StraightLineMatrixProvider::new(60.0);
        let origin = Coordinate { lat: 0.0, lng: 0.0 };
        let destination = Coordinate { lat: 0.0, lng: 1.0 };

        let estimate = provider.estimate(origin, destination);

        let km = haversine_km(origin, destination);
        assert!((estimate.distance_meters - km * 1000.0).abs() < 1e-6);
        assert!((estimate.duration_secs - km * 60.0).abs() < 1e-6);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    fn invalid_speed_uses_default(#[case] speed: f64) {
        assert_eq!(
            StraightLineMatrixProvider::new(speed),
            StraightLineMatrixProvider::default()
        );
    }

    #[tokio::test]
    async fn matrix_has_requested_shape() {
        let provider = StraightLineMatrixProvider::default();
        let origins = [Coordinate { lat: 50.0, lng: 14.0 }];
        let destinations = [
            Coordinate { lat: 50.1, lng: 14.0 },
            Coordinate { lat: 50.2, lng: 14.0 },
        ];

        let matrix = provider
            .travel_matrix(&origins, &destinations)
            .await
            .expect("matrix should build");

        assert_eq!(matrix.len(), 1);
        assert!(matrix.iter().all(|row| row.len() == 2 && row.iter().all(Option::is_some)));
    }

    #[tokio::test]
    async fn empty_input_returns_error() {
        let provider = StraightLineMatrixProvider::default();
        let err = provider
            .travel_matrix(&[], &[])
            .await
            .expect_err("should fail");
        assert_eq!(err, ProviderFailure::EmptyInput);
    }
}
