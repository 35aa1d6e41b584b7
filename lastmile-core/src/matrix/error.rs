use thiserror::Error;

/// Wholesale failure of a distance matrix request.
///
/// No partial matrix accompanies a failure; a single unroutable pair is
/// reported as a cell with `ok == false` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderFailure {
    /// No origins or no destinations were provided.
    ///
    /// Callers should pre-filter input to avoid this condition.
    #[error("at least one origin and one destination are required")]
    EmptyInput,

    /// Network-level failure reaching the routing service.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },

    /// The request timed out.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// The service returned a non-success HTTP status, e.g. a quota
    /// rejection.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },

    /// The service answered with a non-success status code of its own.
    #[error("routing service error {code}: {message}")]
    Service {
        /// Provider status code, e.g. `"InvalidQuery"`.
        code: String,
        /// Provider message.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },

    /// The response decoded but does not match the requested shape.
    #[error("malformed routing response: {message}")]
    MalformedResponse {
        /// What was wrong with the shape.
        message: String,
    },
}
