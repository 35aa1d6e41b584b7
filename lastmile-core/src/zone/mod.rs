//! Serviceability checks for delivery addresses.
//!
//! Everything here is pure: no I/O, no panics and no error paths. A
//! [`DeliveryZone`] is a circle around a depot; points are tested against it
//! with the haversine great-circle distance. Postal codes are checked
//! syntactically and mapped to a region by their two-digit prefix.

mod postal;

use thiserror::Error;

use crate::Coordinate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use postal::{POSTAL_REGIONS, PostalCodeCheck, PostalRegion, UNKNOWN_REGION, validate_postal_code};

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Circular area inside which deliveries are serviceable.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeliveryZone {
    /// Centre of the zone, usually the depot or city centre.
    pub center: Coordinate,
    /// Radius of the zone in kilometres; decodes to
    /// [`DEFAULT_ZONE_RADIUS_KM`](crate::DEFAULT_ZONE_RADIUS_KM) when absent.
    #[cfg_attr(feature = "serde", serde(default = "default_radius_km"))]
    pub radius_km: f64,
}

#[cfg(feature = "serde")]
const fn default_radius_km() -> f64 {
    crate::DEFAULT_ZONE_RADIUS_KM
}

/// Errors returned by [`DeliveryZone::new`] and [`DeliveryZone::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ZoneError {
    /// The radius was zero, negative or not finite.
    #[error("zone radius must be positive, got {0} km")]
    NonPositiveRadius(f64),
    /// The centre was not a valid coordinate.
    #[error("invalid zone centre: {0}")]
    InvalidCenter(#[from] crate::CoordinateError),
}

impl DeliveryZone {
    /// Validate and construct a [`DeliveryZone`].
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError`] for an invalid centre or a non-positive radius.
    pub fn new(center: Coordinate, radius_km: f64) -> Result<Self, ZoneError> {
        let zone = Self { center, radius_km };
        zone.validate()?;
        Ok(zone)
    }

    /// Check the invariants of a zone built from a struct literal or decoded
    /// from external input.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError`] for an invalid centre or a non-positive radius.
    pub fn validate(&self) -> Result<(), ZoneError> {
        self.center.validate()?;
        if !(self.radius_km.is_finite() && self.radius_km > 0.0) {
            return Err(ZoneError::NonPositiveRadius(self.radius_km));
        }
        Ok(())
    }

    /// Shorthand for [`is_within_zone`] with this zone.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        is_within_zone(point, self)
    }
}

/// Great-circle distance between two coordinates in kilometres.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
///
/// # Examples
///
/// ```
/// use lastmile_core::Coordinate;
/// use lastmile_core::haversine_km;
///
/// let a = Coordinate { lat: 0.0, lng: 0.0 };
/// let b = Coordinate { lat: 0.0, lng: 1.0 };
/// let d = haversine_km(a, b);
/// assert!((d - 111.195).abs() < 0.001);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "haversine distance is floating-point trigonometry"
)]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Return whether `point` lies inside `zone`, boundary included.
///
/// # Examples
///
/// ```
/// use lastmile_core::{Coordinate, DeliveryZone};
/// use lastmile_core::is_within_zone;
///
/// let zone = DeliveryZone { center: Coordinate { lat: 50.0755, lng: 14.4378 }, radius_km: 50.0 };
/// assert!(is_within_zone(Coordinate { lat: 50.1, lng: 14.5 }, &zone));
/// assert!(!is_within_zone(Coordinate { lat: 49.2, lng: 16.6 }, &zone));
/// ```
#[must_use]
pub fn is_within_zone(point: Coordinate, zone: &DeliveryZone) -> bool {
    haversine_km(point, zone.center) <= zone.radius_km
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn prague() -> Coordinate {
        Coordinate {
            lat: 50.0755,
            lng: 14.4378,
        }
    }

    #[rstest]
    fn distance_to_self_is_zero(prague: Coordinate) {
        assert_eq!(haversine_km(prague, prague), 0.0);
    }

    #[rstest]
    fn distance_is_symmetric(prague: Coordinate) {
        let brno = Coordinate {
            lat: 49.1951,
            lng: 16.6068,
        };
        let there = haversine_km(prague, brno);
        let back = haversine_km(brno, prague);
        assert!((there - back).abs() < 1e-9);
        assert!((there - 185.0).abs() < 5.0, "Prague to Brno is ~185 km, got {there}");
    }

    #[rstest]
    fn boundary_point_is_inside(prague: Coordinate) {
        let edge = Coordinate {
            lat: prague.lat,
            lng: prague.lng + 0.2,
        };
        let radius_km = haversine_km(edge, prague);
        let zone = DeliveryZone {
            center: prague,
            radius_km,
        };

        assert!(is_within_zone(edge, &zone));
        let shrunk = DeliveryZone {
            center: prague,
            radius_km: radius_km - 1e-9,
        };
        assert!(!is_within_zone(edge, &shrunk));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn rejects_non_positive_radius(prague: Coordinate, #[case] radius_km: f64) {
        let err = DeliveryZone::new(prague, radius_km).expect_err("radius should be rejected");
        assert!(matches!(err, ZoneError::NonPositiveRadius(_)));
    }

    #[rstest]
    fn rejects_invalid_centre() {
        let centre = Coordinate {
            lat: 91.0,
            lng: 0.0,
        };
        let err = DeliveryZone::new(centre, 5.0).expect_err("centre should be rejected");
        assert!(matches!(err, ZoneError::InvalidCenter(_)));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn missing_radius_decodes_to_default(prague: Coordinate) {
        let zone: DeliveryZone =
            serde_json::from_str(r#"{ "center": { "lat": 50.0755, "lng": 14.4378 } }"#)
                .expect("zone should decode");

        assert_eq!(
            zone,
            DeliveryZone {
                center: prague,
                radius_km: crate::DEFAULT_ZONE_RADIUS_KM,
            }
        );
    }
}
