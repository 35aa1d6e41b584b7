//! Pending delivery stops submitted for optimisation.

use crate::Coordinate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A delivery stop awaiting a place in the route.
///
/// `coordinate` is optional; stops without one are geocoded from `address`
/// before the route is built.
///
/// # Examples
///
/// ```
/// use lastmile_core::{Coordinate, Stop};
///
/// let stop = Stop::new("order-17", "Václavské náměstí 1, Praha")
///     .with_coordinate(Coordinate { lat: 50.081, lng: 14.427 });
/// assert_eq!(stop.id, "order-17");
/// assert!(stop.coordinate.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stop {
    /// Identifier unique within one optimisation request.
    pub id: String,
    /// Postal address used for geocoding and display.
    pub address: String,
    /// Pre-resolved position, if the caller already knows it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub coordinate: Option<Coordinate>,
}

impl Stop {
    /// Create a stop that still needs geocoding.
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            coordinate: None,
        }
    }

    /// Attach a pre-resolved coordinate.
    #[must_use]
    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }
}
