//! Optimisation request and its validation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{Coordinate, CoordinateError, DeliveryZone, Stop, ZoneError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything needed to plan one driver's route.
///
/// # Examples
/// ```rust
/// use chrono::Utc;
/// use lastmile_core::{Coordinate, DeliveryZone, OptimizeRequest, Stop};
///
/// let depot = Coordinate { lat: 50.0755, lng: 14.4378 };
/// let request = OptimizeRequest {
///     stops: vec![Stop::new("a", "Karlova 1, Praha")],
///     driver_start: depot,
///     start_time: Utc::now(),
///     zone: DeliveryZone { center: depot, radius_km: 50.0 },
/// };
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizeRequest {
    /// Stops to visit; ids must be unique.
    pub stops: Vec<Stop>,
    /// Current driver position.
    pub driver_start: Coordinate,
    /// Moment the driver sets off; defaults to now when decoding.
    #[cfg_attr(feature = "serde", serde(default = "Utc::now"))]
    pub start_time: DateTime<Utc>,
    /// Serviceable area; its centre is the default fallback coordinate.
    pub zone: DeliveryZone,
}

/// Reasons an [`OptimizeRequest`] is rejected before any provider call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestValidationError {
    /// Two stops share an identifier.
    #[error("duplicate stop id {id:?}")]
    DuplicateStopId {
        /// Repeated identifier.
        id: String,
    },
    /// The driver start is not a valid coordinate.
    #[error("invalid driver start: {0}")]
    InvalidDriverStart(#[source] CoordinateError),
    /// A stop carries an out-of-range coordinate.
    #[error("stop {id:?} has an invalid coordinate: {source}")]
    InvalidStopCoordinate {
        /// Offending stop.
        id: String,
        /// Range violation.
        #[source]
        source: CoordinateError,
    },
    /// The delivery zone is invalid.
    #[error("invalid delivery zone: {0}")]
    InvalidZone(#[from] ZoneError),
}

impl OptimizeRequest {
    /// Check the request invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`RequestValidationError`] found.
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        self.driver_start
            .validate()
            .map_err(RequestValidationError::InvalidDriverStart)?;
        self.zone.validate()?;

        let mut ids = HashSet::with_capacity(self.stops.len());
        for stop in &self.stops {
            if !ids.insert(stop.id.as_str()) {
                return Err(RequestValidationError::DuplicateStopId {
                    id: stop.id.clone(),
                });
            }
            if let Some(coordinate) = stop.coordinate {
                coordinate
                    .validate()
                    .map_err(|source| RequestValidationError::InvalidStopCoordinate {
                        id: stop.id.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}
