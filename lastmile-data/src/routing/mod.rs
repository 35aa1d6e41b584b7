//! HTTP distance matrix providers for routing services.
//!
//! [`OsrmMatrixProvider`] implements [`lastmile_core::DistanceMatrixProvider`]
//! against the OSRM Table API. Each call issues one request covering every
//! origin and destination; per-pair `null` cells become unroutable entries
//! rather than failing the request.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use lastmile_data::routing::{OsrmMatrixProvider, OsrmMatrixProviderConfig};
//!
//! let config = OsrmMatrixProviderConfig::new("http://localhost:5000")
//!     .with_profile("driving")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-dispatch/1.0");
//! let provider = OsrmMatrixProvider::with_config(config)?;
//! # Ok::<(), lastmile_data::ProviderBuildError>(())
//! ```

mod osrm;
mod provider;

pub use provider::{DEFAULT_PROFILE, DEFAULT_USER_AGENT, OsrmMatrixProvider, OsrmMatrixProviderConfig};
