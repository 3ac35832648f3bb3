use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod domain;
mod services;

use cli::Cli;
use commands::convert::ConvertError;

/// Exit code for a missing or unreadable workouts directory.
const EXIT_INVALID_DIR: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match commands::convert::run(&cli) {
        Ok(report) if report.failed.is_empty() => ExitCode::SUCCESS,
        // partial success under --keep-going still signals failure to callers
        Ok(_) => ExitCode::FAILURE,
        Err(err) => report_fatal(err),
    }
}

fn report_fatal(err: anyhow::Error) -> ExitCode {
    if let Some(ConvertError::InvalidWorkoutsDir(_)) = err.downcast_ref::<ConvertError>() {
        // a bad workouts dir is reported on stdout, not stderr
        println!("ERROR: {err}");
        return ExitCode::from(EXIT_INVALID_DIR);
    }
    eprintln!("ERROR: {err:#}");
    ExitCode::FAILURE
}
