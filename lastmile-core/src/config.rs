//! Tunables for address resolution and route optimisation.

use std::time::Duration;

use thiserror::Error;

use crate::Coordinate;

/// Default number of addresses resolved concurrently per group.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Default pause between successive geocoding groups.
pub const DEFAULT_INTER_BATCH_DELAY: Duration = Duration::from_millis(200);

/// Default delivery zone radius in kilometres.
pub const DEFAULT_ZONE_RADIUS_KM: f64 = 50.0;

/// Configuration for [`RouteOptimizer`](crate::RouteOptimizer) and the
/// [`AddressResolver`](crate::AddressResolver) it drives.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lastmile_core::{Coordinate, OptimizerConfig};
///
/// let config = OptimizerConfig::default()
///     .with_batch_size(10)
///     .with_inter_batch_delay(Duration::from_millis(500))
///     .with_fallback_coordinate(Coordinate { lat: 50.0755, lng: 14.4378 });
/// assert_eq!(config.batch_size, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// Addresses resolved concurrently per group.
    pub batch_size: usize,
    /// Pause inserted between successive groups to respect rate limits.
    pub inter_batch_delay: Duration,
    /// Position substituted for stops that cannot be geocoded. When unset the
    /// delivery zone's centre is used.
    pub fallback_coordinate: Option<Coordinate>,
    /// Radius applied by callers that build a zone from a bare centre.
    pub default_zone_radius_km: f64,
    /// Deadline for a whole optimisation; exceeding it ends the run like a
    /// cancellation.
    pub timeout: Option<Duration>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            inter_batch_delay: DEFAULT_INTER_BATCH_DELAY,
            fallback_coordinate: None,
            default_zone_radius_km: DEFAULT_ZONE_RADIUS_KM,
            timeout: None,
        }
    }
}

/// Errors returned by [`OptimizerConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Batches must hold at least one address.
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
    /// The default zone radius was zero, negative or not finite.
    #[error("default zone radius must be positive, got {0} km")]
    NonPositiveRadius(f64),
    /// The fallback coordinate was out of range.
    #[error("invalid fallback coordinate: {0}")]
    InvalidFallback(#[from] crate::CoordinateError),
}

impl OptimizerConfig {
    /// Set the geocoding group size.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the pause between geocoding groups.
    #[must_use]
    pub const fn with_inter_batch_delay(mut self, delay: Duration) -> Self {
        self.inter_batch_delay = delay;
        self
    }

    /// Set an explicit fallback coordinate instead of the zone centre.
    #[must_use]
    pub const fn with_fallback_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.fallback_coordinate = Some(coordinate);
        self
    }

    /// Set the default zone radius.
    #[must_use]
    pub const fn with_default_zone_radius_km(mut self, radius_km: f64) -> Self {
        self.default_zone_radius_km = radius_km;
        self
    }

    /// Bound the whole optimisation by `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check the configuration for values the optimiser cannot honour.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if !(self.default_zone_radius_km.is_finite() && self.default_zone_radius_km > 0.0) {
            return Err(ConfigError::NonPositiveRadius(self.default_zone_radius_km));
        }
        if let Some(fallback) = self.fallback_coordinate {
            fallback.validate()?;
        }
        Ok(())
    }
}
