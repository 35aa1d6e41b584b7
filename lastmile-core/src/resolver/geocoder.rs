//! Address resolution provider contract.

use async_trait::async_trait;
use thiserror::Error;

use crate::Coordinate;

/// Errors reported by a [`Geocoder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// Network-level failure reaching the service.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The response body could not be understood.
    #[error("failed to parse geocoding response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}

/// Turn free-form address text into candidate coordinates.
///
/// Implementations return candidates best-first; an empty vector means the
/// address is unknown to the provider. Each call must hit the provider at
/// most once; caching is the caller's concern.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use lastmile_core::{Coordinate, GeocodeError, Geocoder};
///
/// struct Depot;
///
/// #[async_trait]
/// impl Geocoder for Depot {
///     async fn geocode(&self, _address: &str) -> Result<Vec<Coordinate>, GeocodeError> {
///         Ok(vec![Coordinate { lat: 50.0755, lng: 14.4378 }])
///     }
/// }
/// ```
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `address` into candidate coordinates.
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, GeocodeError>;
}

#[async_trait]
impl<T> Geocoder for Box<T>
where
    T: Geocoder + ?Sized,
{
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, GeocodeError> {
        (**self).geocode(address).await
    }
}
