//! Shared HTTP client construction and transport error classification.

use std::time::Duration;

use lastmile_core::{GeocodeError, ProviderFailure};
use reqwest::Client;
use thiserror::Error;

/// Default request timeout for every adapter.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error raised while constructing an HTTP-backed provider.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL {url:?}: {source}")]
    BaseUrl {
        /// Rejected URL text.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}

pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, ProviderBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ProviderBuildError::HttpClient)
}

/// Check that `base_url` is absolute and return it without trailing slashes.
pub(crate) fn normalise_base_url(base_url: &str) -> Result<String, ProviderBuildError> {
    let trimmed = base_url.trim_end_matches('/');
    url::Url::parse(trimmed).map_err(|source| ProviderBuildError::BaseUrl {
        url: base_url.to_owned(),
        source,
    })?;
    Ok(trimmed.to_owned())
}

/// Transport-level outcome of a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportError {
    Timeout { url: String, timeout_secs: u64 },
    Http { url: String, status: u16, message: String },
    Network { url: String, message: String },
}

impl TransportError {
    pub(crate) fn classify(error: &reqwest::Error, url: &str, timeout: Duration) -> Self {
        if error.is_timeout() {
            return Self::Timeout {
                url: url.to_owned(),
                timeout_secs: timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return Self::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        Self::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

impl From<TransportError> for ProviderFailure {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout { url, timeout_secs } => Self::Timeout { url, timeout_secs },
            TransportError::Http {
                url,
                status,
                message,
            } => Self::Http {
                url,
                status,
                message,
            },
            TransportError::Network { url, message } => Self::Network { url, message },
        }
    }
}

impl From<TransportError> for GeocodeError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout { url, timeout_secs } => Self::Timeout { url, timeout_secs },
            TransportError::Http {
                url,
                status,
                message,
            } => Self::Http {
                url,
                status,
                message,
            },
            TransportError::Network { url, message } => Self::Network { url, message },
        }
    }
}
