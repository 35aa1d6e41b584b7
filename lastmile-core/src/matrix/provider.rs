//! Distance/duration provider contract.

use async_trait::async_trait;

use crate::Coordinate;

use super::error::ProviderFailure;

/// Raw travel estimate for one origin/destination pair, in provider units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelEstimate {
    /// Road distance in metres.
    pub distance_meters: f64,
    /// Travel time in seconds.
    pub duration_secs: f64,
}

/// Rows follow origins, columns follow destinations; `None` marks a pair the
/// provider could not route.
pub type ProviderMatrix = Vec<Vec<Option<TravelEstimate>>>;

/// Fetch travel estimates between two sets of coordinates.
///
/// Implementers should return a `origins.len() × destinations.len()`
/// matrix. [`DistanceMatrixClient`](crate::DistanceMatrixClient) validates the
/// shape and normalises units, so implementations stay thin adapters.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use lastmile_core::{Coordinate, DistanceMatrixProvider, ProviderFailure, ProviderMatrix, TravelEstimate};
///
/// struct OneKilometre;
///
/// #[async_trait]
/// impl DistanceMatrixProvider for OneKilometre {
///     async fn travel_matrix(
///         &self,
///         origins: &[Coordinate],
///         destinations: &[Coordinate],
///     ) -> Result<ProviderMatrix, ProviderFailure> {
///         let cell = TravelEstimate { distance_meters: 1000.0, duration_secs: 120.0 };
///         Ok(vec![vec![Some(cell); destinations.len()]; origins.len()])
///     }
/// }
/// ```
#[async_trait]
pub trait DistanceMatrixProvider: Send + Sync {
    /// Return travel estimates from every origin to every destination.
    async fn travel_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<ProviderMatrix, ProviderFailure>;
}

#[async_trait]
impl<T> DistanceMatrixProvider for Box<T>
where
    T: DistanceMatrixProvider + ?Sized,
{
    async fn travel_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<ProviderMatrix, ProviderFailure> {
        (**self).travel_matrix(origins, destinations).await
    }
}
