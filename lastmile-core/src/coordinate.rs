//! Geographic coordinates expressed as latitude and longitude.
//!
//! [`Coordinate`] is the shared currency of every component: stops, zones,
//! provider requests and route legs all speak it.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point on the Earth's surface in decimal degrees.
///
/// # Examples
///
/// ```
/// use lastmile_core::Coordinate;
///
/// # fn main() -> Result<(), lastmile_core::CoordinateError> {
/// let prague = Coordinate::new(50.0755, 14.4378)?;
/// assert!(prague.lat > 50.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    /// Latitude in degrees, within `[-90, 90]`.
    pub lat: f64,
    /// Longitude in degrees, within `[-180, 180]`.
    pub lng: f64,
}

/// Errors returned by [`Coordinate::new`] and [`Coordinate::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude was outside `[-90, 90]` or not finite.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude was outside `[-180, 180]` or not finite.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl Coordinate {
    /// Validate and construct a [`Coordinate`].
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either component is out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        let coordinate = Self { lat, lng };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check that both components lie within their valid ranges.
    ///
    /// Struct literals bypass [`Coordinate::new`], so values decoded from
    /// external input should be checked with this method.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] naming the first offending component.
    pub fn validate(&self) -> Result<(), CoordinateError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(CoordinateError::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(CoordinateError::LongitudeOutOfRange(self.lng));
        }
        Ok(())
    }
}
