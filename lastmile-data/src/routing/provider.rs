//! `DistanceMatrixProvider` backed by OSRM's Table API.

use std::time::Duration;

use async_trait::async_trait;
use lastmile_core::{
    Coordinate, DistanceMatrixProvider, ProviderFailure, ProviderMatrix, TravelEstimate,
};
use log::debug;
use reqwest::Client;

use super::osrm::TableResponse;
use crate::http::{DEFAULT_TIMEOUT, ProviderBuildError, TransportError, build_client, normalise_base_url};

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "lastmile-routing/0.1";

/// Default OSRM routing profile.
pub const DEFAULT_PROFILE: &str = "driving";

/// Configuration for [`OsrmMatrixProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsrmMatrixProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Routing profile segment of the request path.
    pub profile: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OsrmMatrixProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OsrmMatrixProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the routing profile, e.g. `"driving"` or `"cycling"`.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Distance matrix provider using the OSRM Table API.
///
/// Origins and destinations are sent in one coordinate list and selected
/// with the `sources` and `destinations` parameters, so a `1 × n` request
/// costs a single HTTP call.
///
/// # Example
///
/// ```no_run
/// use lastmile_core::{Coordinate, DistanceMatrixProvider};
/// use lastmile_data::routing::OsrmMatrixProvider;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = OsrmMatrixProvider::new("http://localhost:5000")?;
/// let depot = Coordinate { lat: 50.0755, lng: 14.4378 };
/// let stop = Coordinate { lat: 50.0865, lng: 14.4114 };
/// let matrix = provider.travel_matrix(&[depot], &[stop]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OsrmMatrixProvider {
    client: Client,
    config: OsrmMatrixProviderConfig,
}

impl OsrmMatrixProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OsrmMatrixProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(mut config: OsrmMatrixProviderConfig) -> Result<Self, ProviderBuildError> {
        config.base_url = normalise_base_url(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OsrmMatrixProviderConfig {
        &self.config
    }

    /// Build the Table API URL.
    ///
    /// The path carries every coordinate as semicolon-separated `lng,lat`
    /// pairs, origins first.
    fn build_table_url(&self, origins: &[Coordinate], destinations: &[Coordinate]) -> String {
        let coords = origins
            .iter()
            .chain(destinations)
            .map(|coordinate| format!("{},{}", coordinate.lng, coordinate.lat))
            .collect::<Vec<_>>()
            .join(";");
        let sources = index_list(0, origins.len());
        let targets = index_list(origins.len(), destinations.len());

        format!(
            "{}/table/v1/{}/{coords}?sources={sources}&destinations={targets}&annotations=duration,distance",
            self.config.base_url, self.config.profile
        )
    }

    async fn fetch(&self, url: &str) -> Result<TableResponse, ProviderFailure> {
        let classify = |err: reqwest::Error| {
            ProviderFailure::from(TransportError::classify(&err, url, self.config.timeout))
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify)?
            .error_for_status()
            .map_err(classify)?;
        response
            .json()
            .await
            .map_err(|err| ProviderFailure::Parse {
                message: err.to_string(),
            })
    }
}

fn index_list(start: usize, len: usize) -> String {
    (start..start.saturating_add(len))
        .map(|index| index.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

/// Convert an OSRM response into provider cells.
///
/// Cells whose duration or distance is missing, negative or not finite are
/// reported as unroutable.
fn convert_response(response: TableResponse) -> Result<ProviderMatrix, ProviderFailure> {
    if !response.is_ok() {
        return Err(ProviderFailure::Service {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }
    let missing = |field: &str| ProviderFailure::Parse {
        message: format!("OSRM response missing {field} array"),
    };
    let durations = response.durations.ok_or_else(|| missing("durations"))?;
    let distances = response.distances.ok_or_else(|| missing("distances"))?;
    if durations.len() != distances.len()
        || durations
            .iter()
            .zip(&distances)
            .any(|(time_row, distance_row)| time_row.len() != distance_row.len())
    {
        return Err(ProviderFailure::MalformedResponse {
            message: "durations and distances differ in shape".to_owned(),
        });
    }

    let usable = |value: Option<f64>| value.filter(|v| *v >= 0.0 && v.is_finite());
    Ok(durations
        .into_iter()
        .zip(distances)
        .map(|(time_row, distance_row)| {
            time_row
                .into_iter()
                .zip(distance_row)
                .map(|(duration, distance)| {
                    Some(TravelEstimate {
                        distance_meters: usable(distance)?,
                        duration_secs: usable(duration)?,
                    })
                })
                .collect()
        })
        .collect())
}

#[async_trait]
impl DistanceMatrixProvider for OsrmMatrixProvider {
    async fn travel_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<ProviderMatrix, ProviderFailure> {
        if origins.is_empty() || destinations.is_empty() {
            return Err(ProviderFailure::EmptyInput);
        }
        let url = self.build_table_url(origins, destinations);
        debug!(
            "requesting OSRM table for {} origins and {} destinations",
            origins.len(),
            destinations.len()
        );
        convert_response(self.fetch(&url).await?)
    }
}
