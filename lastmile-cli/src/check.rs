//! `zone` and `postal` commands.

use std::io::Write;

use clap::Parser;
use lastmile_core::{
    Coordinate, DeliveryZone, OptimizerConfig, haversine_km, is_within_zone, validate_postal_code,
};
use serde::Serialize;

use crate::{CliError, write_json};

/// CLI arguments for the `zone` subcommand.
#[derive(Debug, Clone, Parser)]
#[command(about = "Check whether a point lies inside a delivery zone")]
pub(crate) struct ZoneArgs {
    /// Latitude of the point to check.
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) lat: f64,
    /// Longitude of the point to check.
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) lng: f64,
    /// Latitude of the zone centre.
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) center_lat: f64,
    /// Longitude of the zone centre.
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) center_lng: f64,
    /// Zone radius in kilometres; defaults to the optimiser's zone radius.
    #[arg(long)]
    pub(crate) radius_km: Option<f64>,
}

/// CLI arguments for the `postal` subcommand.
#[derive(Debug, Clone, Parser)]
#[command(about = "Validate a postal code and report its region")]
pub(crate) struct PostalArgs {
    /// Postal code, with or without the separating space.
    pub(crate) code: String,
}

/// Result of the `zone` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ZoneReport {
    pub(crate) within_zone: bool,
    pub(crate) distance_km: f64,
    pub(crate) radius_km: f64,
}

pub(crate) fn zone_report(args: &ZoneArgs) -> Result<ZoneReport, CliError> {
    let point = Coordinate::new(args.lat, args.lng)?;
    let center = Coordinate::new(args.center_lat, args.center_lng)?;
    let radius_km = args
        .radius_km
        .unwrap_or_else(|| OptimizerConfig::default().default_zone_radius_km);
    let zone = DeliveryZone::new(center, radius_km)?;
    Ok(ZoneReport {
        within_zone: is_within_zone(point, &zone),
        distance_km: haversine_km(point, center),
        radius_km,
    })
}

pub(crate) fn run_zone(args: &ZoneArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    write_json(writer, &zone_report(args)?)
}

pub(crate) fn run_postal(args: &PostalArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    write_json(writer, &validate_postal_code(&args.code))
}
