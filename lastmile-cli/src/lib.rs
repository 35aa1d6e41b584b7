//! Command-line interface for the last-mile route optimiser.
//!
//! The `lastmile` binary plans a driver's route from a JSON request and
//! exposes the delivery zone and postal code checks as standalone commands.
//! Command output is JSON written to an injected writer so each command can
//! be exercised without touching the process's stdout.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod check;
mod error;
mod optimize;

pub use error::CliError;

use check::{PostalArgs, ZoneArgs, run_postal, run_zone};
use optimize::{DefaultOptimizerBuilder, OptimizeArgs, run_optimize_with};

const ARG_REQUEST: &str = "request";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_NOMINATIM_BASE_URL: &str = "nominatim-base-url";
const ARG_FALLBACK_LAT: &str = "fallback-lat";
const ARG_FALLBACK_LNG: &str = "fallback-lng";
const ENV_REQUEST: &str = "LASTMILE_CMDS_OPTIMIZE_REQUEST_PATH";

/// How a successfully executed command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command produced its normal result.
    Completed,
    /// Optimisation stopped early; a failure report was written instead of a
    /// route.
    OptimizationFailed,
}

/// Run the CLI with the current process arguments, writing to stdout.
///
/// # Errors
///
/// Returns [`CliError`] when arguments, configuration or input files are
/// invalid, or output cannot be written.
pub fn run() -> Result<Outcome, CliError> {
    let cli = Cli::try_parse()?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<Outcome, CliError> {
    match command {
        Command::Optimize(args) => run_optimize_with(args, &DefaultOptimizerBuilder, writer),
        Command::Zone(args) => run_zone(&args, writer).map(|()| Outcome::Completed),
        Command::Postal(args) => run_postal(&args, writer).map(|()| Outcome::Completed),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "lastmile",
    about = "Plan last-mile delivery routes and check delivery areas",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a route for the stops in a JSON request.
    Optimize(OptimizeArgs),
    /// Check whether a point lies inside a delivery zone.
    Zone(ZoneArgs),
    /// Validate a postal code and report its region.
    Postal(PostalArgs),
}

/// Write `value` as pretty JSON followed by a newline.
fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
