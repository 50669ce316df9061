//! `sealer` command-line entry point.
//!
//! Arguments are parsed first; clap exits on usage errors. Then:
//! 1. Load configuration from `SEALER_*` environment variables.
//! 2. Initialise structured logging on stderr.
//! 3. Run the subcommand; stdout gets its output, stderr gets an error report.

mod cli;
mod config;
mod telemetry;

use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::Parser;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = cli::Args::parse();

    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = match config::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: invalid configuration: {e:#}");
            return ExitCode::from(cli::GENERIC_EXIT_CODE);
        }
    };

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    if let Err(e) = telemetry::init(&cfg.log_level, cfg.log_json) {
        eprintln!("ERROR: {e:#}");
        return ExitCode::from(cli::GENERIC_EXIT_CODE);
    }

    let command = args.command.name();
    info!(version = env!("CARGO_PKG_VERSION"), command, "sealer starting");

    // -----------------------------------------------------------------------
    // 3. Command
    // -----------------------------------------------------------------------
    match cli::run(args.command, &cfg, io::stdin().lock()) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(output.as_bytes()).and_then(|()| stdout.flush()) {
                error!(error = %e, "failed to write output");
                return ExitCode::from(cli::GENERIC_EXIT_CODE);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let (report, code) = cli::error_report(&e);
            error!(command, code, "command failed");
            eprintln!("{report}");
            ExitCode::from(code)
        }
    }
}
