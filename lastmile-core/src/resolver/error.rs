use thiserror::Error;

use crate::CoordinateError;

use super::geocoder::GeocodeError;

/// Why a single address could not be turned into a coordinate.
///
/// Failures are isolated per address and never abort a batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionFailure {
    /// The provider returned no candidates.
    #[error("no match for address {address:?}")]
    NoMatch {
        /// Address that was looked up.
        address: String,
    },
    /// The provider call failed.
    #[error("geocoding {address:?} failed: {source}")]
    Provider {
        /// Address that was looked up.
        address: String,
        /// Underlying provider error.
        #[source]
        source: GeocodeError,
    },
    /// The provider answered with an out-of-range coordinate.
    #[error("geocoder returned an invalid coordinate for {address:?}: {source}")]
    InvalidCoordinate {
        /// Address that was looked up.
        address: String,
        /// Range violation.
        #[source]
        source: CoordinateError,
    },
}

impl ResolutionFailure {
    /// Address the failure refers to.
    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::NoMatch { address }
            | Self::Provider { address, .. }
            | Self::InvalidCoordinate { address, .. } => address,
        }
    }
}
