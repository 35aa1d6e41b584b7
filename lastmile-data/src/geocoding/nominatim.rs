//! Nominatim search API response types.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use lastmile_core::Coordinate;
use serde::Deserialize;

/// One place returned by `/search?format=jsonv2`.
///
/// Nominatim encodes coordinates as decimal strings.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    /// Latitude as a decimal string.
    pub lat: String,
    /// Longitude as a decimal string.
    pub lon: String,
    /// Full formatted address of the match.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl SearchResult {
    /// Parse the coordinate strings.
    ///
    /// # Errors
    ///
    /// Returns a description of the first field that is not a number.
    pub fn coordinate(&self) -> Result<Coordinate, String> {
        let parse = |field: &str, text: &str| {
            text.trim()
                .parse::<f64>()
                .map_err(|err| format!("invalid {field} {text:?}: {err}"))
        };
        Ok(Coordinate {
            lat: parse("lat", &self.lat)?,
            lng: parse("lon", &self.lon)?,
        })
    }
}
