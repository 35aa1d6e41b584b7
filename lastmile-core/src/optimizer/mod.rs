//! Greedy nearest-neighbour route construction.
//!
//! [`RouteOptimizer`] first settles a coordinate for every stop, geocoding
//! the ones that lack one and substituting the fallback coordinate where
//! geocoding fails. It then repeatedly asks the distance matrix provider for
//! travel from the current position to every remaining stop, commits the
//! closest reachable one and moves on. The heuristic re-queries the provider
//! each step, which is quadratic in provider work but tolerates per-pair
//! routing failures and suits daily stop counts in the tens.
//!
//! A wholesale provider failure, a step with no reachable stop, a
//! cancellation or an elapsed deadline all end the run with an
//! [`OptimizationFailure`] that carries the legs committed so far.

mod error;
mod request;
mod state;

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    AddressResolver, CoordinateSource, DistanceMatrixClient, DistanceMatrixProvider, Geocoder,
    OptimizerConfig, Resolution, Route,
};

pub use error::{FailureReport, OptimizationError, OptimizationFailure};
pub use request::{OptimizeRequest, RequestValidationError};

use state::{PendingStop, Progress};

/// Plans a single driver's route with the nearest-neighbour heuristic.
///
/// The optimiser is generic over the two provider boundaries. It holds no
/// per-request state, so one instance can serve concurrent requests.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use lastmile_core::test_support::StubGeocoder;
/// use lastmile_core::{
///     Coordinate, DeliveryZone, OptimizeRequest, RouteOptimizer, Stop,
///     StraightLineMatrixProvider,
/// };
///
/// # let runtime = tokio::runtime::Builder::new_current_thread()
/// #     .enable_all()
/// #     .build()
/// #     .expect("runtime");
/// # runtime.block_on(async {
/// let depot = Coordinate { lat: 50.0755, lng: 14.4378 };
/// let optimizer = RouteOptimizer::new(StubGeocoder::default(), StraightLineMatrixProvider::default());
/// let request = OptimizeRequest {
///     stops: vec![
///         Stop::new("far", "Far 1").with_coordinate(Coordinate { lat: 50.20, lng: 14.4378 }),
///         Stop::new("near", "Near 1").with_coordinate(Coordinate { lat: 50.10, lng: 14.4378 }),
///     ],
///     driver_start: depot,
///     start_time: Utc::now(),
///     zone: DeliveryZone { center: depot, radius_km: 50.0 },
/// };
///
/// let route = optimizer.optimize(&request).await.expect("route");
/// assert_eq!(route.stop_ids().collect::<Vec<_>>(), vec!["near", "far"]);
/// # });
/// ```
#[derive(Debug)]
pub struct RouteOptimizer<G, M> {
    geocoder: G,
    matrix_provider: M,
    config: OptimizerConfig,
}

impl<G, M> RouteOptimizer<G, M>
where
    G: Geocoder,
    M: DistanceMatrixProvider,
{
    /// Construct an optimiser using default configuration.
    pub fn new(geocoder: G, matrix_provider: M) -> Self {
        Self::with_config(geocoder, matrix_provider, OptimizerConfig::default())
    }

    /// Construct an optimiser with explicit configuration.
    pub const fn with_config(geocoder: G, matrix_provider: M, config: OptimizerConfig) -> Self {
        Self {
            geocoder,
            matrix_provider,
            config,
        }
    }

    /// Active configuration.
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Plan a route for `request`.
    ///
    /// Empty input yields an empty route. Stops that cannot be geocoded are
    /// placed at the fallback coordinate and flagged on their leg.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizationFailure`] with the committed partial route when
    /// the request is invalid, the provider fails, no remaining stop is
    /// reachable, or the configured timeout elapses.
    pub async fn optimize(&self, request: &OptimizeRequest) -> Result<Route, OptimizationFailure> {
        self.optimize_with_cancellation(request, &CancellationToken::new())
            .await
    }

    /// Plan a route, stopping early when `cancel` is triggered.
    ///
    /// Cancellation is observed at every provider call. A cancelled run
    /// returns [`OptimizationError::Cancelled`] together with the legs
    /// committed so far. Dropping the returned future instead discards all
    /// progress.
    ///
    /// # Errors
    ///
    /// As [`RouteOptimizer::optimize`], plus [`OptimizationError::Cancelled`].
    pub async fn optimize_with_cancellation(
        &self,
        request: &OptimizeRequest,
        cancel: &CancellationToken,
    ) -> Result<Route, OptimizationFailure> {
        let start = request.driver_start;
        let start_time = request.start_time;
        let reject = |error: OptimizationError| {
            let unvisited = request.stops.iter().map(|stop| stop.id.clone()).collect();
            OptimizationFailure::new(error, Route::empty(start, start_time), unvisited)
        };

        self.config
            .validate()
            .map_err(|err| reject(err.into()))?;
        request.validate().map_err(|err| reject(err.into()))?;

        if request.stops.is_empty() {
            debug!("no stops submitted; returning empty route");
            return Ok(Route::empty(start, start_time));
        }

        let interrupt = Interrupt::new(cancel, self.config.timeout);
        let pending = interrupt
            .guard(self.locate_stops(request))
            .await
            .map_err(reject)?;

        let client = DistanceMatrixClient::new(&self.matrix_provider);
        let progress = Progress::start(start, pending, start_time);
        match visit_all(progress, &client, &interrupt).await {
            Ok(done) => {
                let route = done.into_route(start, start_time);
                info!(
                    "optimised route with {} legs, {:.2} km, {} min",
                    route.legs.len(),
                    route.total_distance_km,
                    route.total_duration_min
                );
                Ok(route)
            }
            Err((stopped, error)) => {
                warn!(
                    "route optimisation stopped with {} stops unvisited: {error}",
                    stopped.remaining_len()
                );
                Err(stopped.into_failure(error, start, start_time))
            }
        }
    }

    /// Settle a coordinate for every stop, in input order.
    async fn locate_stops(&self, request: &OptimizeRequest) -> Vec<PendingStop> {
        let fallback = self
            .config
            .fallback_coordinate
            .unwrap_or(request.zone.center);
        let unresolved: Vec<&str> = request
            .stops
            .iter()
            .filter(|stop| stop.coordinate.is_none())
            .map(|stop| stop.address.as_str())
            .collect();

        let mut resolver = AddressResolver::new(&self.geocoder, &self.config);
        let resolved: HashMap<String, Resolution> = resolver
            .resolve_batch(&unresolved)
            .await
            .into_iter()
            .collect();

        request
            .stops
            .iter()
            .map(|stop| {
                let (coordinate, source) = match (stop.coordinate, resolved.get(&stop.address)) {
                    (Some(coordinate), _) => (coordinate, CoordinateSource::Provided),
                    (None, Some(Ok(coordinate))) => (*coordinate, CoordinateSource::Resolved),
                    (None, Some(Err(failure))) => {
                        warn!("stop {:?}: {failure}; using fallback coordinate", stop.id);
                        (fallback, CoordinateSource::Fallback)
                    }
                    (None, None) => (fallback, CoordinateSource::Fallback),
                };
                let within_zone = request.zone.contains(coordinate);
                if !within_zone {
                    warn!("stop {:?} lies outside the delivery zone", stop.id);
                }
                PendingStop {
                    id: stop.id.clone(),
                    address: stop.address.clone(),
                    coordinate,
                    source,
                    within_zone,
                }
            })
            .collect()
    }
}

/// Fold `progress` until every stop is visited or a step fails.
async fn visit_all<P>(
    mut progress: Progress,
    client: &DistanceMatrixClient<'_, P>,
    interrupt: &Interrupt<'_>,
) -> Result<Progress, (Progress, OptimizationError)>
where
    P: DistanceMatrixProvider + ?Sized,
{
    while !progress.is_complete() {
        let origins = [progress.current()];
        let destinations = progress.destinations();
        let matrix = match interrupt.guard(client.matrix(&origins, &destinations)).await {
            Ok(Ok(matrix)) => matrix,
            Ok(Err(failure)) => return Err((progress, failure.into())),
            Err(interrupted) => return Err((progress, interrupted)),
        };

        let row = matrix.row(0).unwrap_or_default();
        let Some((index, cell)) = progress.nearest(row) else {
            let remaining = progress.remaining_len();
            return Err((progress, OptimizationError::NoReachableStop { remaining }));
        };
        progress = progress.commit(index, cell);
        if let Some(leg) = progress.last_leg() {
            debug!(
                "leg to {:?}: {:.2} km, {} min, eta {}",
                leg.stop_id, leg.distance_km, leg.duration_min, leg.estimated_arrival
            );
        }
    }
    Ok(progress)
}

/// Races provider calls against cancellation and the optional deadline.
struct Interrupt<'a> {
    cancel: &'a CancellationToken,
    deadline: Option<(Instant, Duration)>,
}

impl<'a> Interrupt<'a> {
    fn new(cancel: &'a CancellationToken, timeout: Option<Duration>) -> Self {
        Self {
            cancel,
            // A limit past the clock's range never expires.
            deadline: timeout.and_then(|limit| {
                Instant::now().checked_add(limit).map(|at| (at, limit))
            }),
        }
    }

    async fn guard<F>(&self, work: F) -> Result<F::Output, OptimizationError>
    where
        F: Future,
    {
        if self.cancel.is_cancelled() {
            return Err(OptimizationError::Cancelled);
        }
        let expiry = async {
            match self.deadline {
                Some((at, limit)) => {
                    tokio::time::sleep_until(at).await;
                    limit
                }
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(OptimizationError::Cancelled),
            timeout = expiry => Err(OptimizationError::TimedOut { timeout }),
            output = work => Ok(output),
        }
    }
}
