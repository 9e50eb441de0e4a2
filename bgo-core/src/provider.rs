use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{Config, model::Coordinates, provider::openweather::OpenWeatherProvider};

pub mod openweather;

/// Remote source of coordinates and raw weather payloads.
///
/// Payloads are returned untyped so callers can print or round them before
/// validating them into [`crate::model`] types.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve the caller's coordinates from their public IP.
    async fn coordinates(&self) -> anyhow::Result<Coordinates>;

    /// Current conditions at `coords`.
    async fn weather_now(&self, coords: &Coordinates) -> anyhow::Result<Value>;

    /// 5-day / 3-hour forecast at `coords`.
    async fn weather_forecast(&self, coords: &Coordinates) -> anyhow::Result<Value>;
}

/// Construct the OpenWeather-backed provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    OpenWeatherProvider::new(
        config.api_key().map(str::to_owned),
        &config.ipinfo_url,
        &config.openweather_base,
    )
}
