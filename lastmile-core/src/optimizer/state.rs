//! Accumulator for the nearest-neighbour fold.
//!
//! Each iteration consumes a [`Progress`] and yields the next one, so the
//! termination and failure branches can be exercised without a provider.

use chrono::{DateTime, TimeDelta, Utc};

use crate::{Coordinate, CoordinateSource, MatrixCell, Route, RouteLeg};

use super::error::{OptimizationError, OptimizationFailure};

/// A stop with a settled position, waiting to be visited.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct PendingStop {
    pub(super) id: String,
    pub(super) address: String,
    pub(super) coordinate: Coordinate,
    pub(super) source: CoordinateSource,
    pub(super) within_zone: bool,
}

/// `{current, remaining, legs, clock}` for one point of the fold.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Progress {
    current: Coordinate,
    remaining: Vec<PendingStop>,
    legs: Vec<RouteLeg>,
    clock: DateTime<Utc>,
}

impl Progress {
    pub(super) const fn start(
        current: Coordinate,
        remaining: Vec<PendingStop>,
        clock: DateTime<Utc>,
    ) -> Self {
        Self {
            current,
            remaining,
            legs: Vec::new(),
            clock,
        }
    }

    pub(super) fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }

    pub(super) const fn current(&self) -> Coordinate {
        self.current
    }

    pub(super) fn remaining_len(&self) -> usize {
        self.remaining.len()
    }

    /// Coordinates of the remaining stops in input order.
    pub(super) fn destinations(&self) -> Vec<Coordinate> {
        self.remaining.iter().map(|stop| stop.coordinate).collect()
    }

    /// Pick the reachable stop with the strictly smallest distance.
    ///
    /// Ties keep the earliest remaining stop, which is the earliest in the
    /// original input because commits preserve relative order. Cells beyond
    /// the remaining stops are ignored.
    pub(super) fn nearest(&self, row: &[MatrixCell]) -> Option<(usize, MatrixCell)> {
        row.iter()
            .zip(&self.remaining)
            .enumerate()
            .filter(|(_, (cell, _))| cell.ok)
            .fold(None, |best: Option<(usize, MatrixCell)>, (index, (cell, _))| {
                match best {
                    Some((_, chosen)) if chosen.distance_km <= cell.distance_km => best,
                    _ => Some((index, *cell)),
                }
            })
    }

    /// Travel to `remaining[index]` and record the leg.
    ///
    /// `index` must come from [`Progress::nearest`]; an index past the end
    /// leaves the state untouched.
    pub(super) fn commit(mut self, index: usize, cell: MatrixCell) -> Self {
        if index >= self.remaining.len() {
            return self;
        }
        let stop = self.remaining.remove(index);
        let travel = TimeDelta::minutes(i64::from(cell.duration_min));
        let arrival = self
            .clock
            .checked_add_signed(travel)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.legs.push(RouteLeg {
            stop_id: stop.id,
            address: stop.address,
            coordinate: stop.coordinate,
            distance_km: cell.distance_km,
            duration_min: cell.duration_min,
            estimated_arrival: arrival,
            coordinate_source: stop.source,
            within_zone: stop.within_zone,
        });
        Self {
            current: stop.coordinate,
            remaining: self.remaining,
            legs: self.legs,
            clock: arrival,
        }
    }

    pub(super) fn last_leg(&self) -> Option<&RouteLeg> {
        self.legs.last()
    }

    pub(super) fn into_route(self, start_location: Coordinate, start_time: DateTime<Utc>) -> Route {
        Route::new(self.legs, start_location, start_time)
    }

    pub(super) fn into_failure(
        self,
        error: OptimizationError,
        start_location: Coordinate,
        start_time: DateTime<Utc>,
    ) -> OptimizationFailure {
        let unvisited = self.remaining.iter().map(|stop| stop.id.clone()).collect();
        OptimizationFailure::new(
            error,
            Route::new(self.legs, start_location, start_time),
            unvisited,
        )
    }
}
