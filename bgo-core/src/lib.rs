//! Core library for the `bgo` weather CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather / ipinfo data source
//! - Typed models for provider payloads and display rows
//! - Forecast aggregation and number formatting
//!
//! It performs no terminal output; `bgo-cli` renders what it returns.

pub mod config;
pub mod current;
pub mod error;
pub mod forecast;
pub mod format;
pub mod json;
pub mod model;
pub mod provider;

pub use config::Config;
pub use current::parse_current;
pub use error::FormatError;
pub use forecast::{ForecastOptions, aggregate, parse_forecast};
pub use model::{Coordinates, CurrentConditions, CurrentPayload, ForecastPayload, ForecastRow, RawSample};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
