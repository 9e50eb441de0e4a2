use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    config::{API_KEY_ENV, REQUEST_TIMEOUT},
    model::Coordinates,
};

use super::WeatherProvider;

const WEATHER_NOW_PATH: &str = "/data/2.5/weather";
const WEATHER_FORECAST_PATH: &str = "/data/2.5/forecast";
const UNITS: &str = "metric";
const LANGUAGE: &str = "en";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    ipinfo_url: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>, ipinfo_url: &str, base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            ipinfo_url: ipinfo_url.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn ipinfo_url(&self) -> &str {
        &self.ipinfo_url
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_weather(&self, path: &str, coords: &Coordinates) -> Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("{API_KEY_ENV} is not set"))?;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, lat = %coords.lat, lon = %coords.lon, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("units", UNITS),
                ("appid", api_key),
                ("lang", LANGUAGE),
                ("lat", coords.lat.as_str()),
                ("lon", coords.lon.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({path})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather response body")?;

        tracing::debug!(%status, bytes = body.len(), "OpenWeather responded");

        if !status.is_success() {
            return Err(anyhow!(
                "openweather status {}: {}",
                status.as_u16(),
                truncate_body(body.trim()),
            ));
        }

        serde_json::from_str(&body).context("Failed to parse OpenWeather JSON")
    }
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    loc: Option<String>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn coordinates(&self) -> Result<Coordinates> {
        tracing::debug!(url = %self.ipinfo_url, "resolving coordinates");

        let res = self
            .http
            .get(&self.ipinfo_url)
            .send()
            .await
            .context("Failed to send request to ipinfo")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read ipinfo response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "ipinfo status {}: {}",
                status.as_u16(),
                truncate_body(body.trim()),
            ));
        }

        let parsed: IpInfoResponse =
            serde_json::from_str(&body).context("Failed to parse ipinfo JSON")?;

        let loc = parsed.loc.ok_or_else(|| anyhow!("missing loc in ipinfo response"))?;
        parse_loc(&loc)
    }

    async fn weather_now(&self, coords: &Coordinates) -> Result<Value> {
        self.fetch_weather(WEATHER_NOW_PATH, coords).await
    }

    async fn weather_forecast(&self, coords: &Coordinates) -> Result<Value> {
        self.fetch_weather(WEATHER_FORECAST_PATH, coords).await
    }
}

/// Split an ipinfo `loc` value (`"lat,lon"`).
fn parse_loc(loc: &str) -> Result<Coordinates> {
    match loc.split(',').collect::<Vec<_>>().as_slice() {
        [lat, lon] => Ok(Coordinates { lat: lat.trim().to_string(), lon: lon.trim().to_string() }),
        _ => Err(anyhow!("invalid loc format: {loc:?}")),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
