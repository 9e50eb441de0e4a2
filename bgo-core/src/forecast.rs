//! Forecast aggregation.
//!
//! Turns the flat, chronological list of 3-hour samples returned by the
//! forecast endpoint into display rows, either one averaged row per calendar
//! day or one row per sample over a bounded window of dates.

use crate::{
    error::FormatError,
    format::{CELSIUS, PERCENT, format_number, format_number_precision},
    model::{ForecastPayload, ForecastRow, RawSample, SampleMetrics},
};

/// Caller-facing knobs for [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastOptions {
    /// Number of days to show. Validated by the caller to `1..=5`.
    pub days: u8,
    /// Emit every sample with its time of day instead of daily means.
    pub with_time: bool,
    /// Two decimals for daily means. Ignored when `with_time` is set.
    pub high_precision: bool,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self { days: 5, with_time: false, high_precision: false }
    }
}

/// Validate the payload's sample list and aggregate it.
pub fn parse_forecast(
    payload: &ForecastPayload,
    options: ForecastOptions,
) -> Result<Vec<ForecastRow>, FormatError> {
    match payload.list.as_deref() {
        Some(samples) if !samples.is_empty() => aggregate(samples, options),
        _ => Err(FormatError::Missing("list")),
    }
}

/// Aggregate chronologically ordered samples into rows.
///
/// The first fatal defect met while scanning aborts the whole call; no partial
/// rows are returned.
pub fn aggregate(
    samples: &[RawSample],
    options: ForecastOptions,
) -> Result<Vec<ForecastRow>, FormatError> {
    if samples.is_empty() {
        return Err(FormatError::Missing("list"));
    }

    if options.with_time {
        aggregate_with_time(samples, options.days)
    } else {
        aggregate_daily(samples, options.days, options.high_precision)
    }
}

#[derive(Debug, Default)]
struct Totals {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    count: usize,
}

impl Totals {
    fn add(&mut self, metrics: &SampleMetrics) {
        self.temp += metrics.temp();
        self.feels_like += metrics.feels_like();
        self.humidity += metrics.humidity();
        self.count += 1;
    }

    fn to_row(&self, date: &str, high_precision: bool) -> ForecastRow {
        let n = self.count as f64;
        ForecastRow {
            date: date.to_string(),
            time: String::new(),
            temp: format!("{} {CELSIUS}", format_number_precision(self.temp / n, high_precision)),
            feels_like: format!(
                "{} {CELSIUS}",
                format_number_precision(self.feels_like / n, high_precision)
            ),
            humidity: format!("{}{PERCENT}", format_number_precision(self.humidity / n, high_precision)),
        }
    }
}

fn aggregate_daily(
    samples: &[RawSample],
    days: u8,
    high_precision: bool,
) -> Result<Vec<ForecastRow>, FormatError> {
    let mut rows = Vec::with_capacity(days as usize);
    let mut group_date = samples[0].date()?;
    let mut next = 0;

    for _ in 0..days {
        let mut totals = Totals::default();

        while let Some(sample) = samples.get(next) {
            if sample.date()? != group_date {
                break;
            }
            totals.add(sample.metrics()?);
            next += 1;
        }

        if totals.count == 0 {
            break;
        }

        // Stamped with the last sample scanned into the group.
        let row_date = samples[next - 1].date().unwrap_or(group_date);
        tracing::trace!(date = row_date, samples = totals.count, "closed forecast group");
        rows.push(totals.to_row(row_date, high_precision));

        match samples.get(next) {
            Some(sample) => {
                if let Ok(date) = sample.date() {
                    group_date = date;
                }
            }
            None => break,
        }
    }

    Ok(rows)
}

fn aggregate_with_time(samples: &[RawSample], days: u8) -> Result<Vec<ForecastRow>, FormatError> {
    let window = usize::from(days) + 1;
    let mut rows = Vec::new();
    let mut last_date = "";
    let mut seen_dates = 0;

    for sample in samples {
        if seen_dates == window {
            break;
        }

        let (date, time) = sample.date_time()?;
        let metrics = sample.metrics()?;

        let date = if date == last_date {
            ""
        } else {
            seen_dates += 1;
            last_date = date;
            date
        };

        if seen_dates == window {
            tracing::trace!(date, "forecast window full");
            continue;
        }

        // The precision flag does not apply to per-sample rows.
        rows.push(ForecastRow {
            date: date.to_string(),
            time: time.to_string(),
            temp: format!("{} {CELSIUS}", format_number(metrics.temp())),
            feels_like: format!("{} {CELSIUS}", format_number(metrics.feels_like())),
            humidity: format!("{}{PERCENT}", format_number(metrics.humidity())),
        });
    }

    Ok(rows)
}
