//! Turn-by-turn hand-off links for third-party navigation apps.

use std::fmt;

use crate::Coordinate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Navigation app a driver is handed off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NavigationProvider {
    /// Google Maps.
    #[default]
    Primary,
    /// Waze.
    Secondary,
    /// Mapy.cz.
    Tertiary,
}

impl NavigationProvider {
    /// Human-readable app name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Primary => "Google Maps",
            Self::Secondary => "Waze",
            Self::Tertiary => "Mapy.cz",
        }
    }
}

impl fmt::Display for NavigationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build a driving-directions link from `from` to `to`.
///
/// Waze always routes from the device's live position, so `from` is unused
/// for [`NavigationProvider::Secondary`].
///
/// # Examples
///
/// ```
/// use lastmile_core::{Coordinate, NavigationProvider, directions_url};
///
/// let from = Coordinate { lat: 50.0755, lng: 14.4378 };
/// let to = Coordinate { lat: 50.0865, lng: 14.4114 };
/// let url = directions_url(from, to, NavigationProvider::Secondary);
/// assert_eq!(url, "https://waze.com/ul?ll=50.0865,14.4114&navigate=yes");
/// ```
#[must_use]
pub fn directions_url(from: Coordinate, to: Coordinate, provider: NavigationProvider) -> String {
    match provider {
        NavigationProvider::Primary => format!(
            "https://www.google.com/maps/dir/?api=1&origin={},{}&destination={},{}&travelmode=driving",
            from.lat, from.lng, to.lat, to.lng
        ),
        NavigationProvider::Secondary => {
            format!("https://waze.com/ul?ll={},{}&navigate=yes", to.lat, to.lng)
        }
        NavigationProvider::Tertiary => format!(
            "https://mapy.com/fnc/v1/route?start={},{}&end={},{}&routeType=car_fast",
            from.lng, from.lat, to.lng, to.lat
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FROM: Coordinate = Coordinate { lat: 50.1, lng: 14.2 };
    const TO: Coordinate = Coordinate { lat: 49.5, lng: 16.75 };

    #[rstest]
    #[case(
        NavigationProvider::Primary,
        "https://www.google.com/maps/dir/?api=1&origin=50.1,14.2&destination=49.5,16.75&travelmode=driving"
    )]
    #[case(
        NavigationProvider::Secondary,
        "https://waze.com/ul?ll=49.5,16.75&navigate=yes"
    )]
    #[case(
        NavigationProvider::Tertiary,
        "https://mapy.com/fnc/v1/route?start=14.2,50.1&end=16.75,49.5&routeType=car_fast"
    )]
    fn builds_provider_links(#[case] provider: NavigationProvider, #[case] expected: &str) {
        assert_eq!(directions_url(FROM, TO, provider), expected);
    }

    #[rstest]
    fn primary_is_google_maps() {
        assert_eq!(NavigationProvider::default().to_string(), "Google Maps");
    }
}
