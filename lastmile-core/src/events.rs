//! Route lifecycle events for the notification collaborator.
//!
//! The engine decides *when* a driver-facing or customer-facing notification
//! is due and hands the collaborator a plain [`RouteEvent`]. Composing and
//! delivering the message is entirely the sink's business.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::Route;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A lifecycle milestone of a planned route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum RouteEvent {
    /// The driver set off.
    RouteStarted {
        /// Route identifier supplied by the caller.
        route_id: String,
        /// Moment the driver started.
        at: DateTime<Utc>,
        /// Number of stops planned.
        stop_count: usize,
    },
    /// The driver arrived at a stop.
    StopReached {
        /// Route identifier supplied by the caller.
        route_id: String,
        /// Stop the driver reached.
        stop_id: String,
        /// Position of the stop in the route.
        leg_index: usize,
        /// Actual arrival.
        at: DateTime<Utc>,
        /// Planned arrival.
        estimated_arrival: DateTime<Utc>,
    },
    /// The final stop was reached.
    RouteCompleted {
        /// Route identifier supplied by the caller.
        route_id: String,
        /// Moment the route finished.
        at: DateTime<Utc>,
        /// Planned total distance.
        total_distance_km: f64,
        /// Planned total duration.
        total_duration_min: u64,
    },
}

/// Receives route events; implemented by the notification dispatcher.
pub trait RouteEventSink: Send + Sync {
    /// Accept one event. Delivery failures are the sink's concern.
    fn dispatch(&self, event: RouteEvent);
}

/// Errors returned by [`RouteProgress`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    /// [`RouteProgress::start`] was called twice.
    #[error("route {route_id:?} has already started")]
    AlreadyStarted {
        /// Route identifier.
        route_id: String,
    },
    /// A stop was reached before the route started.
    #[error("route {route_id:?} has not started")]
    NotStarted {
        /// Route identifier.
        route_id: String,
    },
    /// The stop is not part of the route.
    #[error("stop {stop_id:?} is not on route {route_id:?}")]
    UnknownStop {
        /// Route identifier.
        route_id: String,
        /// Stop identifier.
        stop_id: String,
    },
    /// The stop was already reported as reached.
    #[error("stop {stop_id:?} was already reached")]
    AlreadyReached {
        /// Stop identifier.
        stop_id: String,
    },
}

/// Tracks a driver along a planned route and emits events exactly once.
///
/// # Examples
///
/// ```
/// use std::sync::Mutex;
/// use chrono::Utc;
/// use lastmile_core::{Coordinate, Route, RouteEvent, RouteEventSink, RouteProgress};
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<RouteEvent>>);
///
/// impl RouteEventSink for Recorder {
///     fn dispatch(&self, event: RouteEvent) {
///         self.0.lock().expect("lock").push(event);
///     }
/// }
///
/// let route = Route::empty(Coordinate { lat: 50.0, lng: 14.0 }, Utc::now());
/// let sink = Recorder::default();
/// let mut progress = RouteProgress::new("shift-1", &route, &sink);
/// progress.start(Utc::now()).expect("first start");
/// assert_eq!(sink.0.lock().expect("lock").len(), 1);
/// ```
pub struct RouteProgress<'a, S: ?Sized> {
    route_id: String,
    route: &'a Route,
    sink: &'a S,
    started: bool,
    reached: HashSet<String>,
}

impl<'a, S> RouteProgress<'a, S>
where
    S: RouteEventSink + ?Sized,
{
    /// Track `route` under `route_id`, reporting to `sink`.
    pub fn new(route_id: impl Into<String>, route: &'a Route, sink: &'a S) -> Self {
        Self {
            route_id: route_id.into(),
            route,
            sink,
            started: false,
            reached: HashSet::new(),
        }
    }

    /// Record departure and emit [`RouteEvent::RouteStarted`].
    ///
    /// A route without legs completes immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::AlreadyStarted`] on a second call.
    pub fn start(&mut self, at: DateTime<Utc>) -> Result<(), ProgressError> {
        if self.started {
            return Err(ProgressError::AlreadyStarted {
                route_id: self.route_id.clone(),
            });
        }
        self.started = true;
        self.sink.dispatch(RouteEvent::RouteStarted {
            route_id: self.route_id.clone(),
            at,
            stop_count: self.route.legs.len(),
        });
        if self.route.legs.is_empty() {
            self.complete(at);
        }
        Ok(())
    }

    /// Record arrival at `stop_id` and emit [`RouteEvent::StopReached`],
    /// followed by [`RouteEvent::RouteCompleted`] once every stop is reached.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError`] for a route that has not started, an unknown
    /// stop, or a stop that was already reached.
    pub fn reach(&mut self, stop_id: &str, at: DateTime<Utc>) -> Result<(), ProgressError> {
        if !self.started {
            return Err(ProgressError::NotStarted {
                route_id: self.route_id.clone(),
            });
        }
        let Some((leg_index, leg)) = self
            .route
            .legs
            .iter()
            .enumerate()
            .find(|(_, leg)| leg.stop_id == stop_id)
        else {
            return Err(ProgressError::UnknownStop {
                route_id: self.route_id.clone(),
                stop_id: stop_id.to_owned(),
            });
        };
        if !self.reached.insert(stop_id.to_owned()) {
            return Err(ProgressError::AlreadyReached {
                stop_id: stop_id.to_owned(),
            });
        }

        self.sink.dispatch(RouteEvent::StopReached {
            route_id: self.route_id.clone(),
            stop_id: stop_id.to_owned(),
            leg_index,
            at,
            estimated_arrival: leg.estimated_arrival,
        });
        if self.is_complete() {
            self.complete(at);
        }
        Ok(())
    }

    /// True once every stop has been reached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.started && self.reached.len() == self.route.legs.len()
    }

    fn complete(&self, at: DateTime<Utc>) {
        self.sink.dispatch(RouteEvent::RouteCompleted {
            route_id: self.route_id.clone(),
            at,
            total_distance_km: self.route.total_distance_km,
            total_duration_min: self.route.total_duration_min,
        });
    }
}
