use std::time::Duration;

use thiserror::Error;

use crate::{ConfigError, ProviderFailure, Route};

use super::request::RequestValidationError;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Why an optimisation run stopped before visiting every stop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizationError {
    /// The request was rejected before any provider call.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestValidationError),
    /// The optimiser configuration cannot be honoured.
    #[error("invalid optimiser configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// The distance matrix provider failed wholesale.
    #[error("distance matrix provider failed: {0}")]
    Provider(#[from] ProviderFailure),
    /// Every remaining stop was unroutable from the current position.
    #[error("none of the {remaining} remaining stops is reachable")]
    NoReachableStop {
        /// Stops left unvisited.
        remaining: usize,
    },
    /// The caller cancelled the run.
    #[error("optimisation was cancelled")]
    Cancelled,
    /// The configured deadline elapsed.
    #[error("optimisation timed out after {timeout:?}")]
    TimedOut {
        /// Configured deadline.
        timeout: Duration,
    },
}

impl OptimizationError {
    /// Machine-readable failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) | Self::InvalidConfig(_) => "invalid_request",
            Self::Provider(_) => "provider_failure",
            Self::NoReachableStop { .. } => "no_reachable_stop",
            Self::Cancelled => "cancelled",
            Self::TimedOut { .. } => "timed_out",
        }
    }
}

/// A failed optimisation together with the legs committed before it failed.
///
/// The partial route is never presented as complete: `unvisited` lists the
/// stops that are missing from it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("route optimisation stopped after {} legs", .partial.legs.len())]
pub struct OptimizationFailure {
    /// Cause of the failure.
    #[source]
    pub error: OptimizationError,
    /// Legs committed before the failure; totals cover these legs only.
    pub partial: Box<Route>,
    /// Identifiers of stops not present in `partial`, in input order.
    pub unvisited: Vec<String>,
}

impl OptimizationFailure {
    /// Bundle a failure with its partial route.
    pub fn new(error: OptimizationError, partial: Route, unvisited: Vec<String>) -> Self {
        Self {
            error,
            partial: Box::new(partial),
            unvisited,
        }
    }

    /// Structured, serialisable view for callers outside the crate.
    #[must_use]
    pub fn report(&self) -> FailureReport<'_> {
        FailureReport {
            kind: self.error.kind(),
            message: self.error.to_string(),
            partial_route: &self.partial,
            unvisited_stop_ids: &self.unvisited,
        }
    }
}

/// Serialisable failure payload with a machine-readable kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FailureReport<'a> {
    /// One of `invalid_request`, `provider_failure`, `no_reachable_stop`,
    /// `cancelled` or `timed_out`.
    pub kind: &'static str,
    /// Human-readable description.
    pub message: String,
    /// Legs committed before the failure.
    pub partial_route: &'a Route,
    /// Stops missing from the partial route.
    pub unvisited_stop_ids: &'a [String],
}
