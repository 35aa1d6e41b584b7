//! HTTP geocoders.
//!
//! [`NominatimGeocoder`] implements [`lastmile_core::Geocoder`] against the
//! OpenStreetMap Nominatim search API. It performs exactly one request per
//! call; batching, rate limiting and caching are handled by
//! [`lastmile_core::AddressResolver`].

mod nominatim;
mod provider;

pub use provider::{
    DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT, NominatimGeocoder, NominatimGeocoderConfig,
};
