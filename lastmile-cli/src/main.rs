//! Entry point for the `lastmile` binary.
#![forbid(unsafe_code)]

use std::io::Write;
use std::process::ExitCode;

use lastmile_cli::Outcome;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match lastmile_cli::run() {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,
        Ok(Outcome::OptimizationFailed) => ExitCode::FAILURE,
        Err(lastmile_cli::CliError::ArgumentParsing(err)) => {
            // Clap renders help and version requests through this path too.
            let code = err.exit_code();
            if err.print().is_err() {
                return ExitCode::FAILURE;
            }
            u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
        }
        Err(err) => {
            let mut stderr = std::io::stderr().lock();
            if writeln!(stderr, "lastmile: {err}").is_err() {
                log::error!("{err}");
            }
            ExitCode::FAILURE
        }
    }
}
