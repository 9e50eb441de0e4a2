//! Terminal rendering of current conditions and forecast tables.

use std::io::{self, Write};

use bgo_core::{CurrentConditions, ForecastRow};
use chrono::{DateTime, Local};
use crossterm::style::Stylize;

use crate::art;

const HEADER_ICON: &str = "\u{1F325}";
const SOURCE: &str = "source: OpenWeather";

/// Three-line panel: art on the left, two columns of values next to it.
pub fn print_weather_now<W: Write>(
    out: &mut W,
    weather: &CurrentConditions,
    now: DateTime<Local>,
) -> io::Result<()> {
    let (ascii_art, color) = art::select(weather.condition_id, now.time());

    let col1 = [
        now.format("%H:%M %p").to_string(),
        format!("temperature: {}", weather.temp),
        format!("humidity: {}", weather.humidity),
    ];
    let col2 = [
        capitalize(&weather.description),
        format!("feels like: {}", weather.feels_like),
        SOURCE.to_string(),
    ];

    writeln!(out, "{}", format!("{} {HEADER_ICON}", weather.location).with(color))?;

    let left: Vec<&str> = ascii_art.split('\n').collect();
    for i in 0..3 {
        let a = left.get(i).copied().unwrap_or_default();
        let line = format!("{a:<10}  {:<28}  {}", col1[i], col2[i]);
        writeln!(out, "{}", line.with(color))?;
    }

    Ok(())
}

/// Fixed-width table, with a time column when `with_time` is set.
pub fn print_weather_forecast<W: Write>(
    out: &mut W,
    rows: &[ForecastRow],
    with_time: bool,
) -> io::Result<()> {
    if with_time {
        writeln!(
            out,
            "{:<12} {:<6} {:<14} {:<16} {:<10}",
            "Date", "Time", "Temperature", "Feels Like", "Humidity"
        )?;
        for row in rows {
            writeln!(
                out,
                "{:<12} {:<6} {:<14} {:<16} {:<10}",
                row.date, row.time, row.temp, row.feels_like, row.humidity
            )?;
        }
        return Ok(());
    }

    writeln!(out, "{:<12} {:<14} {:<16} {:<10}", "Date", "Temperature", "Feels Like", "Humidity")?;
    for row in rows {
        writeln!(
            out,
            "{:<12} {:<14} {:<16} {:<10}",
            row.date, row.temp, row.feels_like, row.humidity
        )?;
    }
    Ok(())
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
