//! HTTP adapters for the last-mile delivery engine.
//!
//! Responsibilities:
//! - Implement `lastmile-core` provider contracts against public services.
//! - Translate wire formats and transport errors into domain values.
//!
//! Boundaries:
//! - Do not encode routing rules (live in `lastmile-core`).
//! - Never retry or cache; callers own both policies.
//!
//! Invariants:
//! - Providers are `Send + Sync` and hold no per-request state.
//! - Every HTTP call is bounded by the configured timeout.

#![forbid(unsafe_code)]

pub mod geocoding;
mod http;
pub mod routing;

pub use http::{DEFAULT_TIMEOUT, ProviderBuildError};
