//! Binary crate for the `bgo` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Human-friendly output formatting

use std::{io, process::ExitCode};

use bgo_core::{Config, provider_from_config};
use tracing_subscriber::EnvFilter;

mod art;
mod cli;
mod configure;
mod prompt;
mod runner;
mod view;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let provider = match Config::load().and_then(|config| provider_from_config(&config)) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Oops! Couldn't load the configuration: {e:#}");
            return ExitCode::from(runner::EXIT_FAILURE);
        }
    };

    let stdin = io::stdin();
    let mut runner = runner::Runner::new(provider, stdin.lock(), io::stdout(), io::stderr());
    ExitCode::from(runner.run(std::env::args_os()).await)
}
