//! Travel distances and durations between coordinates.
//!
//! The [`DistanceMatrixProvider`] trait abstracts an external routing
//! service. [`DistanceMatrixClient`] wraps any provider, validates the
//! response shape and normalises units into [`Matrix`] cells that the
//! optimiser consumes. [`StraightLineMatrixProvider`] is an offline provider
//! for setups without a routing service.

mod client;
mod error;
mod provider;
mod straight_line;

pub use client::{DistanceMatrixClient, Matrix, MatrixCell};
pub use error::ProviderFailure;
pub use provider::{DistanceMatrixProvider, ProviderMatrix, TravelEstimate};
pub use straight_line::{DEFAULT_AVERAGE_SPEED_KMH, StraightLineMatrixProvider};
