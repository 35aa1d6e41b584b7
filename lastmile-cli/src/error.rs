//! Error types emitted by the `lastmile` CLI.
//!
//! Keep this error type reasonably small, as most command helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use lastmile_core::{ConfigError, CoordinateError, ZoneError};
use lastmile_data::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the `lastmile` CLI.
///
/// An optimisation that stops early is not a `CliError`: its failure report
/// is written like a route and signalled through the exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// Latitude and longitude must be given together.
    #[error("--{given} requires --{missing}")]
    IncompleteCoordinate {
        /// Flag that was supplied.
        given: &'static str,
        /// Flag that is missing.
        missing: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the optimisation request file failed.
    #[error("failed to open request at {path:?}: {source}")]
    OpenRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The request JSON could not be decoded.
    #[error("failed to parse request JSON at {path:?}: {source}")]
    ParseRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// Merged optimiser settings cannot be honoured.
    #[error("invalid optimiser settings: {0}")]
    InvalidOptimizerConfig(#[from] ConfigError),
    /// A coordinate flag was out of range.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),
    /// The zone flags describe an invalid zone.
    #[error("invalid delivery zone: {0}")]
    InvalidZone(#[from] ZoneError),
    /// Constructing an HTTP provider failed.
    #[error("failed to build {provider} client for {base_url:?}: {source}")]
    BuildProvider {
        /// Provider being built.
        provider: &'static str,
        /// Configured endpoint.
        base_url: String,
        /// Underlying build error.
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
