//! Core domain types and route optimisation for last-mile delivery.
//!
//! The crate turns a driver's unordered stops into a visiting order using a
//! greedy nearest-neighbour heuristic over provider-supplied travel
//! estimates. Addresses without coordinates are geocoded in rate-limited
//! batches, stops are checked against the delivery zone, and planned routes
//! can be tracked to drive customer notifications.
//!
//! Network-facing providers live in `lastmile-data`; this crate only defines
//! their contracts ([`Geocoder`], [`DistanceMatrixProvider`]) and ships an
//! offline [`StraightLineMatrixProvider`].

#![forbid(unsafe_code)]

mod config;
mod coordinate;
mod directions;
mod events;
mod matrix;
mod optimizer;
mod resolver;
mod route;
mod stop;
mod zone;

#[doc(hidden)]
pub mod test_support;

pub use config::{
    ConfigError, DEFAULT_BATCH_SIZE, DEFAULT_INTER_BATCH_DELAY, DEFAULT_ZONE_RADIUS_KM,
    OptimizerConfig,
};
pub use coordinate::{Coordinate, CoordinateError};
pub use directions::{NavigationProvider, directions_url};
pub use events::{ProgressError, RouteEvent, RouteEventSink, RouteProgress};
pub use matrix::{
    DEFAULT_AVERAGE_SPEED_KMH, DistanceMatrixClient, DistanceMatrixProvider, Matrix, MatrixCell,
    ProviderFailure, ProviderMatrix, StraightLineMatrixProvider, TravelEstimate,
};
pub use optimizer::{
    FailureReport, OptimizationError, OptimizationFailure, OptimizeRequest,
    RequestValidationError, RouteOptimizer,
};
pub use resolver::{AddressResolver, GeocodeError, Geocoder, Resolution, ResolutionFailure};
pub use route::{CoordinateSource, Route, RouteLeg};
pub use stop::Stop;
pub use zone::{
    DeliveryZone, EARTH_RADIUS_KM, POSTAL_REGIONS, PostalCodeCheck, PostalRegion, UNKNOWN_REGION,
    ZoneError, haversine_km, is_within_zone, validate_postal_code,
};
