//! `optimize` command: plan a route for a JSON-encoded request.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use lastmile_core::{
    Coordinate, DEFAULT_AVERAGE_SPEED_KMH, DistanceMatrixProvider, Geocoder, OptimizeRequest,
    OptimizerConfig, RouteOptimizer, StraightLineMatrixProvider,
};
use lastmile_data::geocoding::{NominatimGeocoder, NominatimGeocoderConfig};
use lastmile_data::routing::{OsrmMatrixProvider, OsrmMatrixProviderConfig};
use lastmile_fs::open_utf8_file;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_FALLBACK_LAT, ARG_FALLBACK_LNG, ARG_NOMINATIM_BASE_URL, ARG_OSRM_BASE_URL, ARG_REQUEST,
    CliError, ENV_REQUEST, Outcome, write_json,
};

/// Optimiser wired to runtime-selected providers.
pub(crate) type DynOptimizer =
    RouteOptimizer<Box<dyn Geocoder>, Box<dyn DistanceMatrixProvider>>;

/// CLI arguments for the `optimize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan a delivery route for the stops in a JSON-encoded \
                 OptimizeRequest. Addresses are geocoded through Nominatim; \
                 travel estimates come from OSRM when a base URL is given \
                 and from straight-line distances otherwise. Options can \
                 also come from configuration files or LASTMILE_* \
                 environment variables.",
    about = "Plan a route for a JSON request"
)]
#[ortho_config(prefix = "LASTMILE")]
pub(crate) struct OptimizeArgs {
    /// Path to a JSON file containing an `OptimizeRequest`.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// OSRM base URL; straight-line estimates are used when unset.
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM routing profile.
    #[arg(long, value_name = "profile")]
    #[serde(default)]
    pub(crate) osrm_profile: Option<String>,
    /// Average speed for straight-line estimates, in km/h.
    #[arg(long, value_name = "kmh")]
    #[serde(default)]
    pub(crate) average_speed_kmh: Option<f64>,
    /// Nominatim base URL.
    #[arg(long = ARG_NOMINATIM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_base_url: Option<String>,
    /// Comma-separated country codes restricting geocoding, e.g. `cz`.
    #[arg(long, value_name = "codes")]
    #[serde(default)]
    pub(crate) country_codes: Option<String>,
    /// User agent sent to both providers.
    #[arg(long, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Addresses geocoded concurrently per group.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) batch_size: Option<usize>,
    /// Pause between geocoding groups, in milliseconds.
    #[arg(long, value_name = "ms")]
    #[serde(default)]
    pub(crate) inter_batch_delay_ms: Option<u64>,
    /// Deadline for the whole optimisation, in seconds.
    #[arg(long, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Latitude used for stops that cannot be geocoded.
    #[arg(long = ARG_FALLBACK_LAT, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) fallback_lat: Option<f64>,
    /// Longitude used for stops that cannot be geocoded.
    #[arg(long = ARG_FALLBACK_LNG, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) fallback_lng: Option<f64>,
}

impl OptimizeArgs {
    pub(crate) fn into_config(self) -> Result<OptimizeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        OptimizeConfig::try_from(merged)
    }
}

/// Source of travel estimates.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MatrixSource {
    /// OSRM Table API.
    Osrm(OsrmMatrixProviderConfig),
    /// Haversine distance at a constant speed.
    StraightLine {
        /// Assumed average speed.
        average_speed_kmh: f64,
    },
}

/// Resolved `optimize` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OptimizeConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Travel estimate provider settings.
    pub(crate) matrix: MatrixSource,
    /// Geocoder settings.
    pub(crate) geocoder: NominatimGeocoderConfig,
    /// Optimiser tunables.
    pub(crate) optimizer: OptimizerConfig,
}

impl OptimizeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        match lastmile_fs::file_is_file(&self.request_path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field: ARG_REQUEST,
                path: self.request_path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_REQUEST,
                    path: self.request_path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_REQUEST,
                path: self.request_path.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<OptimizeArgs> for OptimizeConfig {
    type Error = CliError;

    fn try_from(args: OptimizeArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_REQUEST,
        })?;

        let matrix = match args.osrm_base_url {
            Some(base_url) => {
                let mut osrm = OsrmMatrixProviderConfig::new(base_url);
                if let Some(profile) = args.osrm_profile {
                    osrm = osrm.with_profile(profile);
                }
                if let Some(agent) = &args.user_agent {
                    osrm = osrm.with_user_agent(agent.clone());
                }
                MatrixSource::Osrm(osrm)
            }
            None => MatrixSource::StraightLine {
                average_speed_kmh: args.average_speed_kmh.unwrap_or(DEFAULT_AVERAGE_SPEED_KMH),
            },
        };

        let mut geocoder = args
            .nominatim_base_url
            .map_or_else(NominatimGeocoderConfig::default, NominatimGeocoderConfig::new);
        if let Some(codes) = args.country_codes {
            geocoder = geocoder.with_country_codes(codes);
        }
        if let Some(agent) = args.user_agent {
            geocoder = geocoder.with_user_agent(agent);
        }

        let mut optimizer = OptimizerConfig::default();
        if let Some(size) = args.batch_size {
            optimizer = optimizer.with_batch_size(size);
        }
        if let Some(ms) = args.inter_batch_delay_ms {
            optimizer = optimizer.with_inter_batch_delay(Duration::from_millis(ms));
        }
        if let Some(secs) = args.timeout_secs {
            optimizer = optimizer.with_timeout(Duration::from_secs(secs));
        }
        match (args.fallback_lat, args.fallback_lng) {
            (Some(lat), Some(lng)) => {
                optimizer = optimizer.with_fallback_coordinate(Coordinate::new(lat, lng)?);
            }
            (Some(_), None) => {
                return Err(CliError::IncompleteCoordinate {
                    given: ARG_FALLBACK_LAT,
                    missing: ARG_FALLBACK_LNG,
                });
            }
            (None, Some(_)) => {
                return Err(CliError::IncompleteCoordinate {
                    given: ARG_FALLBACK_LNG,
                    missing: ARG_FALLBACK_LAT,
                });
            }
            (None, None) => {}
        }
        optimizer.validate()?;

        Ok(Self {
            request_path,
            matrix,
            geocoder,
            optimizer,
        })
    }
}

/// Builds the optimiser for one `optimize` invocation.
pub(crate) trait OptimizerBuilder {
    fn build(&self, config: &OptimizeConfig) -> Result<DynOptimizer, CliError>;
}

/// Builder wiring the HTTP adapters from `lastmile-data`.
pub(crate) struct DefaultOptimizerBuilder;

impl OptimizerBuilder for DefaultOptimizerBuilder {
    fn build(&self, config: &OptimizeConfig) -> Result<DynOptimizer, CliError> {
        let geocoder: Box<dyn Geocoder> = Box::new(
            NominatimGeocoder::with_config(config.geocoder.clone()).map_err(|source| {
                CliError::BuildProvider {
                    provider: "Nominatim",
                    base_url: config.geocoder.base_url.clone(),
                    source,
                }
            })?,
        );
        let matrix: Box<dyn DistanceMatrixProvider> = match &config.matrix {
            MatrixSource::Osrm(osrm) => Box::new(
                OsrmMatrixProvider::with_config(osrm.clone()).map_err(|source| {
                    CliError::BuildProvider {
                        provider: "OSRM",
                        base_url: osrm.base_url.clone(),
                        source,
                    }
                })?,
            ),
            MatrixSource::StraightLine { average_speed_kmh } => {
                Box::new(StraightLineMatrixProvider::new(*average_speed_kmh))
            }
        };
        Ok(RouteOptimizer::with_config(
            geocoder,
            matrix,
            config.optimizer.clone(),
        ))
    }
}

/// Run `optimize`, writing the route or failure report to `writer`.
pub(crate) fn run_optimize_with(
    args: OptimizeArgs,
    builder: &dyn OptimizerBuilder,
    writer: &mut dyn Write,
) -> Result<Outcome, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let request = load_request(&config.request_path)?;
    let optimizer = builder.build(&config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    match runtime.block_on(optimizer.optimize(&request)) {
        Ok(route) => {
            info!(
                "planned {} stops from {}",
                route.legs.len(),
                config.request_path
            );
            write_json(writer, &route)?;
            Ok(Outcome::Completed)
        }
        Err(failure) => {
            warn!("optimisation of {} failed: {}", config.request_path, failure.error);
            write_json(writer, &failure.report())?;
            Ok(Outcome::OptimizationFailed)
        }
    }
}

/// Load a JSON-encoded [`OptimizeRequest`] from disk.
pub(crate) fn load_request(path: &Utf8Path) -> Result<OptimizeRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenRequest {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<OptimizeConfig, CliError> {
    let merged = OptimizeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    OptimizeConfig::try_from(merged)
}
