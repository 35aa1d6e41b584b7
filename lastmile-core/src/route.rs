//! Optimised delivery routes.
//!
//! A [`Route`] aggregates ordered [`RouteLeg`] values. Totals are derived
//! from the legs at construction so they can never drift from the sums.

use chrono::{DateTime, NaiveTime, Utc};

use crate::Coordinate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a leg's coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CoordinateSource {
    /// Supplied by the caller with the stop.
    Provided,
    /// Resolved from the stop's address by the geocoder.
    Resolved,
    /// Geocoding failed; the configured fallback coordinate was used and the
    /// leg's ETA is only an estimate.
    Fallback,
}

/// One visited stop together with the travel needed to reach it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteLeg {
    /// Identifier of the visited stop.
    pub stop_id: String,
    /// Address of the visited stop.
    pub address: String,
    /// Position the leg travels to.
    pub coordinate: Coordinate,
    /// Travel distance from the previous position in kilometres.
    pub distance_km: f64,
    /// Travel time from the previous position in whole minutes.
    pub duration_min: u32,
    /// Estimated arrival at the stop.
    pub estimated_arrival: DateTime<Utc>,
    /// Origin of [`RouteLeg::coordinate`].
    pub coordinate_source: CoordinateSource,
    /// Whether the stop lies inside the delivery zone.
    pub within_zone: bool,
}

impl RouteLeg {
    /// Time of day of the estimated arrival.
    #[must_use]
    pub fn estimated_arrival_time(&self) -> NaiveTime {
        self.estimated_arrival.time()
    }

    /// True when the leg's position is a fallback rather than a real address.
    #[must_use]
    pub fn is_estimated(&self) -> bool {
        self.coordinate_source == CoordinateSource::Fallback
    }
}

/// An ordered sequence of legs starting at the driver's position.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use lastmile_core::{Coordinate, Route};
///
/// let start = Coordinate { lat: 50.0755, lng: 14.4378 };
/// let now = Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap();
/// let route = Route::empty(start, now);
///
/// assert!(route.legs.is_empty());
/// assert_eq!(route.total_duration_min, 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Route {
    /// Legs in visiting order.
    pub legs: Vec<RouteLeg>,
    /// Sum of every leg's distance.
    pub total_distance_km: f64,
    /// Sum of every leg's duration.
    pub total_duration_min: u64,
    /// Driver position the route starts from.
    pub start_location: Coordinate,
    /// Moment the route starts; ETAs accumulate from here.
    pub start_time: DateTime<Utc>,
}

impl Route {
    /// Construct a route from ordered legs, deriving the totals.
    #[expect(
        clippy::float_arithmetic,
        reason = "total distance is the floating-point sum of leg distances"
    )]
    pub fn new(legs: Vec<RouteLeg>, start_location: Coordinate, start_time: DateTime<Utc>) -> Self {
        // Folding from +0.0 keeps an empty route from reporting -0.0.
        let total_distance_km = legs.iter().fold(0.0, |acc, leg| acc + leg.distance_km);
        let total_duration_min = legs.iter().map(|leg| u64::from(leg.duration_min)).sum();
        Self {
            legs,
            total_distance_km,
            total_duration_min,
            start_location,
            start_time,
        }
    }

    /// Construct a route without legs.
    pub fn empty(start_location: Coordinate, start_time: DateTime<Utc>) -> Self {
        Self::new(Vec::new(), start_location, start_time)
    }

    /// Identifiers of the visited stops in order.
    pub fn stop_ids(&self) -> impl Iterator<Item = &str> {
        self.legs.iter().map(|leg| leg.stop_id.as_str())
    }

    /// Estimated arrival at the final stop, or the start time when empty.
    #[must_use]
    pub fn estimated_completion(&self) -> DateTime<Utc> {
        self.legs
            .last()
            .map_or(self.start_time, |leg| leg.estimated_arrival)
    }
}
