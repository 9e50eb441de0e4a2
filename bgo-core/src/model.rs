use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::FormatError;

/// Deserialize a field leniently: a value of the wrong JSON type becomes `None`
/// instead of failing the whole payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`], but only a JSON object can yield a value. Derived struct
/// deserializers would otherwise read arrays positionally.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Latitude/longitude pair as reported by the IP-geolocation service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: String,
    pub lon: String,
}

/// Raw `/forecast` response. Only the sample list is read.
#[derive(Debug, Clone, Default)]
pub struct ForecastPayload {
    pub list: Option<Vec<RawSample>>,
}

impl ForecastPayload {
    /// A missing or non-array `list` reads as `None`. Every list element must
    /// be an object.
    pub fn from_value(value: Value) -> Result<Self, FormatError> {
        let list = match value.get("list") {
            Some(Value::Array(items)) => {
                Some(items.iter().map(RawSample::from_value).collect::<Result<Vec<_>, _>>()?)
            }
            _ => None,
        };
        Ok(Self { list })
    }
}

/// One 3-hour forecast sample, kept as close to the wire as possible.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSample {
    #[serde(default, deserialize_with = "lenient")]
    pub dt_txt: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub main: Option<SampleMetrics>,
}

impl RawSample {
    pub fn from_value(value: &Value) -> Result<Self, FormatError> {
        if !value.is_object() {
            return Err(FormatError::Invalid("forecast item"));
        }
        serde_json::from_value(value.clone()).map_err(FormatError::Payload)
    }

    /// Calendar date part of `dt_txt` (`YYYY-MM-DD`).
    pub fn date(&self) -> Result<&str, FormatError> {
        let dt = self.dt_txt.as_deref().ok_or(FormatError::Missing("dt_txt"))?;
        Ok(dt.split(' ').next().unwrap_or(dt))
    }

    /// Date and `HH:MM` time of day. The seconds suffix is dropped.
    pub fn date_time(&self) -> Result<(&str, &str), FormatError> {
        let dt = self.dt_txt.as_deref().ok_or(FormatError::Missing("dt_txt"))?;
        let mut parts = dt.split(' ');
        let date = parts.next().unwrap_or(dt);
        let time = parts.next().ok_or(FormatError::Invalid("dt_txt"))?;

        let time = match time.len() {
            n if n >= 3 => time.get(..n - 3).unwrap_or(time),
            _ => time,
        };

        Ok((date, time))
    }

    pub fn metrics(&self) -> Result<&SampleMetrics, FormatError> {
        self.main.as_ref().ok_or(FormatError::Missing("main in forecast"))
    }
}

/// Metrics block of a sample. Non-numeric values read back as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct SampleMetrics {
    #[serde(default, deserialize_with = "lenient")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub feels_like: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub humidity: Option<f64>,
}

impl SampleMetrics {
    pub fn temp(&self) -> f64 {
        self.temp.unwrap_or_default()
    }

    pub fn feels_like(&self) -> f64 {
        self.feels_like.unwrap_or_default()
    }

    pub fn humidity(&self) -> f64 {
        self.humidity.unwrap_or_default()
    }
}

/// Raw `/weather` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentPayload {
    #[serde(default, deserialize_with = "lenient_object")]
    pub main: Option<SampleMetrics>,
    #[serde(default, deserialize_with = "lenient")]
    pub weather: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

impl CurrentPayload {
    pub fn from_value(value: Value) -> Result<Self, FormatError> {
        serde_json::from_value(value).map_err(FormatError::Payload)
    }
}

/// First entry of the `weather` condition list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Condition {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ConditionCode>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

/// OpenWeather condition id, sent as a number but tolerated as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConditionCode {
    Number(f64),
    Text(String),
}

impl ConditionCode {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConditionCode::Number(n) => Some(n.trunc() as i64),
            ConditionCode::Text(s) => s.parse().ok(),
        }
    }
}

/// Display-ready forecast line. `date` is empty for repeat dates in time-detail
/// mode; `time` is empty in daily mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForecastRow {
    pub date: String,
    pub time: String,
    pub temp: String,
    pub feels_like: String,
    pub humidity: String,
}

/// Display-ready current conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurrentConditions {
    pub temp: String,
    pub feels_like: String,
    pub humidity: String,
    pub condition_id: i64,
    pub description: String,
    pub location: String,
}
