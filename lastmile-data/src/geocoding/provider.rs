//! `Geocoder` backed by the Nominatim search API.

use std::time::Duration;

use async_trait::async_trait;
use lastmile_core::{Coordinate, GeocodeError, Geocoder};
use log::debug;
use reqwest::Client;
use url::Url;

use super::nominatim::SearchResult;
use crate::http::{DEFAULT_TIMEOUT, ProviderBuildError, TransportError, build_client, normalise_base_url};

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Default user agent; the public instance rejects anonymous clients.
pub const DEFAULT_USER_AGENT: &str = "lastmile-geocoding/0.1";

/// Default number of candidates requested per address.
const DEFAULT_LIMIT: u8 = 1;

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimGeocoderConfig {
    /// Base URL of the Nominatim service.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Maximum candidates per lookup.
    pub limit: u8,
    /// Comma-separated ISO 3166-1 country codes restricting the search.
    pub country_codes: Option<String>,
}

impl Default for NominatimGeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            limit: DEFAULT_LIMIT,
            country_codes: None,
        }
    }
}

impl NominatimGeocoderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
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

    /// Set the maximum number of candidates; zero is treated as one.
    #[must_use]
    pub fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Restrict results to the given countries, e.g. `"cz"`.
    #[must_use]
    pub fn with_country_codes(mut self, codes: impl Into<String>) -> Self {
        self.country_codes = Some(codes.into());
        self
    }
}

/// Geocoder using the Nominatim `/search` endpoint.
///
/// # Example
///
/// ```no_run
/// use lastmile_core::Geocoder;
/// use lastmile_data::geocoding::{NominatimGeocoder, NominatimGeocoderConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let geocoder = NominatimGeocoder::with_config(
///     NominatimGeocoderConfig::default().with_country_codes("cz"),
/// )?;
/// let candidates = geocoder.geocode("Karlova 1, Praha").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    config: NominatimGeocoderConfig,
}

impl NominatimGeocoder {
    /// Create a geocoder for the given service.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(NominatimGeocoderConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(mut config: NominatimGeocoderConfig) -> Result<Self, ProviderBuildError> {
        config.base_url = normalise_base_url(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &NominatimGeocoderConfig {
        &self.config
    }

    /// Build the search URL with the address form-encoded in `q`.
    fn build_search_url(&self, address: &str) -> Result<Url, GeocodeError> {
        let limit = self.config.limit.to_string();
        let mut params = vec![("q", address), ("format", "jsonv2"), ("limit", limit.as_str())];
        if let Some(codes) = &self.config.country_codes {
            params.push(("countrycodes", codes.as_str()));
        }
        Url::parse_with_params(&format!("{}/search", self.config.base_url), &params).map_err(
            |err| GeocodeError::Parse {
                message: format!("cannot build search URL: {err}"),
            },
        )
    }

    async fn fetch(&self, url: Url) -> Result<Vec<SearchResult>, GeocodeError> {
        let url_text = url.to_string();
        let classify = |err: reqwest::Error| {
            GeocodeError::from(TransportError::classify(&err, &url_text, self.config.timeout))
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify)?
            .error_for_status()
            .map_err(classify)?;
        response.json().await.map_err(|err| GeocodeError::Parse {
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, GeocodeError> {
        let url = self.build_search_url(address)?;
        let results = self.fetch(url).await?;
        debug!("nominatim returned {} candidates for {address:?}", results.len());
        results
            .iter()
            .map(|result| {
                result
                    .coordinate()
                    .map_err(|message| GeocodeError::Parse { message })
            })
            .collect()
    }
}
