//! OPCVM CLI - Issuer concentration control for mutual fund portfolios.
//!
//! # Usage
//!
//! ```bash
//! # Check a portfolio workbook against the default ceilings
//! opcvm check portefeuilles.xlsx
//!
//! # Custom issuer table, stricter standard ceiling, export the results
//! opcvm check portefeuilles.xlsx --issuers issuers.csv --ceiling-standard 0.08 --export report.xlsx
//!
//! # Show the issuer keyword table
//! opcvm issuers
//!
//! # Write a default configuration file
//! opcvm config init opcvm.toml
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

/// Exit status when the run succeeded but found breaches.
const EXIT_BREACH: u8 = 2;

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let format = cli.format;
    let quiet = cli.quiet;

    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args, format, quiet),
        Commands::Issuers(args) => commands::issuers::execute(args, format).map(|()| true),
        Commands::Config(args) => commands::config::execute(args, format, quiet).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_BREACH),
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
