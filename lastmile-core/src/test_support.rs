//! In-memory provider doubles used by unit, behaviour and doc tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

use crate::{
    Coordinate, CoordinateSource, DistanceMatrixProvider, GeocodeError, Geocoder, ProviderFailure,
    ProviderMatrix, Route, RouteEvent, RouteEventSink, RouteLeg, StraightLineMatrixProvider,
};

#[derive(Debug, Clone)]
enum Scripted {
    Found(Coordinate),
    Failed(GeocodeError),
}

/// Geocoder answering from a fixed address table.
///
/// Unknown addresses yield no candidates. Every call is recorded together
/// with the (tokio) instant it started, and the peak number of concurrent
/// calls is tracked so batching behaviour can be asserted.
#[derive(Debug, Default)]
pub struct StubGeocoder {
    answers: HashMap<String, Scripted>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, Instant)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubGeocoder {
    /// Answer `address` with `coordinate`.
    #[must_use]
    pub fn with_address(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.answers
            .insert(address.to_owned(), Scripted::Found(coordinate));
        self
    }

    /// Fail lookups of `address` with `error`.
    #[must_use]
    pub fn with_failure(mut self, address: &str, error: GeocodeError) -> Self {
        self.answers
            .insert(address.to_owned(), Scripted::Failed(error));
        self
    }

    /// Hold lookups of `address` for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, address: &str, delay: Duration) -> Self {
        self.delays.insert(address.to_owned(), delay);
        self
    }

    /// Addresses looked up so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.lock_calls()
            .iter()
            .map(|(address, _)| address.clone())
            .collect()
    }

    /// Instants at which each lookup started, in call order.
    pub fn call_starts(&self) -> Vec<Instant> {
        self.lock_calls().iter().map(|(_, at)| *at).collect()
    }

    /// Number of lookups performed for `address`.
    pub fn calls_for(&self, address: &str) -> usize {
        self.lock_calls()
            .iter()
            .filter(|(called, _)| called == address)
            .count()
    }

    /// Highest number of lookups that were in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<(String, Instant)>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, GeocodeError> {
        self.lock_calls()
            .push((address.to_owned(), Instant::now()));
        let active = self.in_flight.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        self.peak_in_flight.fetch_max(active, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(address) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.answers.get(address) {
            Some(Scripted::Found(coordinate)) => Ok(vec![*coordinate]),
            Some(Scripted::Failed(error)) => Err(error.clone()),
            None => Ok(Vec::new()),
        }
    }
}

/// Straight-line matrix provider with scripted failures.
///
/// Destinations listed as unreachable come back as missing cells, and the
/// provider can be told to fail wholesale on a given call (1-based).
#[derive(Debug, Default)]
pub struct ScriptedMatrixProvider {
    inner: StraightLineMatrixProvider,
    unreachable: Vec<Coordinate>,
    failure: Option<(usize, ProviderFailure)>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedMatrixProvider {
    /// Report every pair ending at `coordinate` as unroutable.
    #[must_use]
    pub fn with_unreachable(mut self, coordinate: Coordinate) -> Self {
        self.unreachable.push(coordinate);
        self
    }

    /// Fail the `call`-th request (1-based) with `failure`.
    #[must_use]
    pub fn failing_on_call(mut self, call: usize, failure: ProviderFailure) -> Self {
        self.failure = Some((call, failure));
        self
    }

    /// Hold every request for `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of matrix requests served or failed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DistanceMatrixProvider for ScriptedMatrixProvider {
    async fn travel_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<ProviderMatrix, ProviderFailure> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((failing_call, failure)) = &self.failure
            && *failing_call == call
        {
            return Err(failure.clone());
        }

        let mut matrix = self.inner.travel_matrix(origins, destinations).await?;
        for row in &mut matrix {
            for (cell, destination) in row.iter_mut().zip(destinations) {
                if self.unreachable.contains(destination) {
                    *cell = None;
                }
            }
        }
        Ok(matrix)
    }
}

/// Event sink collecting every dispatched event.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RouteEvent>>,
}

impl RecordingSink {
    /// Events received so far.
    pub fn events(&self) -> Vec<RouteEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RouteEventSink for RecordingSink {
    fn dispatch(&self, event: RouteEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Route visiting `stop_ids` in order, each leg one kilometre and five
/// minutes long.
pub fn route_through(stop_ids: &[&str], start_time: DateTime<Utc>) -> Route {
    let start = Coordinate { lat: 50.0, lng: 14.0 };
    let mut clock = start_time;
    let legs = stop_ids
        .iter()
        .map(|id| {
            clock = clock
                .checked_add_signed(TimeDelta::minutes(5))
                .unwrap_or(clock);
            RouteLeg {
                stop_id: (*id).to_owned(),
                address: format!("{id} street"),
                coordinate: start,
                distance_km: 1.0,
                duration_min: 5,
                estimated_arrival: clock,
                coordinate_source: CoordinateSource::Provided,
                within_zone: true,
            }
        })
        .collect();
    Route::new(legs, start, start_time)
}
