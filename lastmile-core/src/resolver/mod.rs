//! Turn stop addresses into coordinates.
//!
//! [`AddressResolver`] wraps a [`Geocoder`] for the duration of one
//! optimisation run. It caches every outcome by exact address string, so
//! duplicate addresses hit the provider once, and resolves batches in
//! fixed-size concurrent groups separated by a pause to respect provider
//! rate limits. Failures are reported per address; choosing a fallback is
//! the optimiser's job.

mod error;
mod geocoder;

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures_util::future::join_all;
use log::debug;

use crate::{Coordinate, OptimizerConfig};

pub use error::ResolutionFailure;
pub use geocoder::{GeocodeError, Geocoder};

/// Outcome of resolving one address.
pub type Resolution = Result<Coordinate, ResolutionFailure>;

/// Per-run address resolver with batching and caching.
///
/// The cache lives as long as the resolver; construct a fresh resolver per
/// optimisation run unless a longer-lived cache is wanted.
///
/// # Examples
///
/// ```
/// use lastmile_core::test_support::StubGeocoder;
/// use lastmile_core::{AddressResolver, Coordinate, OptimizerConfig};
///
/// # let runtime = tokio::runtime::Builder::new_current_thread()
/// #     .enable_all()
/// #     .build()
/// #     .expect("runtime");
/// # runtime.block_on(async {
/// let geocoder = StubGeocoder::default()
///     .with_address("Karlova 1", Coordinate { lat: 50.086, lng: 14.416 });
/// let mut resolver = AddressResolver::new(&geocoder, &OptimizerConfig::default());
///
/// let results = resolver.resolve_batch(&["Karlova 1", "Nowhere 0"]).await;
/// assert_eq!(results.len(), 2);
/// assert!(results[0].1.is_ok());
/// assert!(results[1].1.is_err());
/// # });
/// ```
#[derive(Debug)]
pub struct AddressResolver<'a, G: ?Sized> {
    geocoder: &'a G,
    batch_size: usize,
    inter_batch_delay: Duration,
    cache: HashMap<String, Resolution>,
}

impl<'a, G> AddressResolver<'a, G>
where
    G: Geocoder + ?Sized,
{
    /// Create a resolver using the batching settings from `config`.
    pub fn new(geocoder: &'a G, config: &OptimizerConfig) -> Self {
        Self::with_batching(geocoder, config.batch_size, config.inter_batch_delay)
    }

    /// Create a resolver with explicit batching settings.
    ///
    /// A `batch_size` of zero is treated as one.
    pub fn with_batching(geocoder: &'a G, batch_size: usize, inter_batch_delay: Duration) -> Self {
        Self {
            geocoder,
            batch_size: batch_size.max(1),
            inter_batch_delay,
            cache: HashMap::new(),
        }
    }

    /// Resolve a single address, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionFailure`] when the provider fails, finds nothing,
    /// or answers with an out-of-range coordinate.
    pub async fn resolve(&mut self, address: &str) -> Resolution {
        if let Some(cached) = self.cache.get(address) {
            return cached.clone();
        }
        let outcome = lookup(self.geocoder, address).await;
        self.cache.insert(address.to_owned(), outcome.clone());
        outcome
    }

    /// Resolve many addresses, returning one entry per input in input order.
    ///
    /// Distinct uncached addresses are split into groups of `batch_size`.
    /// Each group is resolved concurrently; groups run one after another with
    /// `inter_batch_delay` between them.
    pub async fn resolve_batch<S>(&mut self, addresses: &[S]) -> Vec<(String, Resolution)>
    where
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let pending: Vec<&str> = addresses
            .iter()
            .map(AsRef::as_ref)
            .filter(|address| !self.cache.contains_key(*address) && seen.insert(*address))
            .collect();

        let geocoder = self.geocoder;
        for (index, group) in pending.chunks(self.batch_size).enumerate() {
            if index > 0 && !self.inter_batch_delay.is_zero() {
                tokio::time::sleep(self.inter_batch_delay).await;
            }
            debug!("geocoding group {} ({} addresses)", index + 1, group.len());
            let outcomes = join_all(group.iter().map(|address| lookup(geocoder, address))).await;
            for (address, outcome) in group.iter().zip(outcomes) {
                self.cache.insert((*address).to_owned(), outcome);
            }
        }

        addresses
            .iter()
            .map(|entry| {
                let address = entry.as_ref();
                let outcome = self.cache.get(address).cloned().unwrap_or_else(|| {
                    Err(ResolutionFailure::NoMatch {
                        address: address.to_owned(),
                    })
                });
                (address.to_owned(), outcome)
            })
            .collect()
    }

    /// Number of distinct addresses resolved so far.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

async fn lookup<G>(geocoder: &G, address: &str) -> Resolution
where
    G: Geocoder + ?Sized,
{
    let candidates =
        geocoder
            .geocode(address)
            .await
            .map_err(|source| ResolutionFailure::Provider {
                address: address.to_owned(),
                source,
            })?;
    let first = candidates
        .into_iter()
        .next()
        .ok_or_else(|| ResolutionFailure::NoMatch {
            address: address.to_owned(),
        })?;
    first
        .validate()
        .map_err(|source| ResolutionFailure::InvalidCoordinate {
            address: address.to_owned(),
            source,
        })?;
    Ok(first)
}

#[cfg(test)]
mod tests;
