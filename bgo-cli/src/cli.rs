use bgo_core::ForecastOptions;
use clap::{Args, Parser, Subcommand};

const AFTER_HELP: &str = "\
Environment:
  OPEN_WEATHER_API_KEY  API key for OpenWeather (overrides `bgo configure`)
  .env                  Optional file in the working directory
  RUST_LOG              Log filter, e.g. `bgo=debug`

Examples:
  bgo now
  bgo forecast -d 3
  bgo forecast -d 2 --with-time
  bgo now --high-precision
  bgo now --full-info";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "bgo",
    version,
    about = "Fast, clear weather in your terminal.",
    after_help = AFTER_HELP
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub flags: Flags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show current weather (default).
    Now,

    /// Show forecast for multiple days.
    Forecast,

    /// Store the OpenWeather API key in the config file.
    Configure,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct Flags {
    /// Forecast length in days.
    #[arg(
        short,
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u8).range(1..=5),
        global = true
    )]
    pub days: u8,

    /// Show values with max precision.
    #[arg(long, global = true)]
    pub high_precision: bool,

    /// Print the full API response.
    #[arg(long, global = true)]
    pub full_info: bool,

    /// Include time of day in forecast output.
    #[arg(long, global = true)]
    pub with_time: bool,
}

impl Flags {
    pub fn forecast_options(&self) -> ForecastOptions {
        ForecastOptions {
            days: self.days,
            with_time: self.with_time,
            high_precision: self.high_precision,
        }
    }
}
