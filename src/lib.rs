//! Facade crate for the last-mile route optimisation engine.
//!
//! Re-exports the core domain types and, behind the `http-providers`
//! feature, the OSRM and Nominatim adapters.

#![forbid(unsafe_code)]

pub use lastmile_core::{
    AddressResolver, Coordinate, DeliveryZone, DistanceMatrixClient, DistanceMatrixProvider,
    FailureReport, GeocodeError, Geocoder, NavigationProvider, OptimizationError,
    OptimizationFailure, OptimizeRequest, OptimizerConfig, ProviderFailure, Route, RouteEvent,
    RouteEventSink, RouteLeg, RouteOptimizer, RouteProgress, Stop, StraightLineMatrixProvider,
    directions_url, is_within_zone, validate_postal_code,
};

#[cfg(feature = "http-providers")]
pub use lastmile_data::{
    geocoding::{NominatimGeocoder, NominatimGeocoderConfig},
    routing::{OsrmMatrixProvider, OsrmMatrixProviderConfig},
};
