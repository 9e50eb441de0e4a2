use std::{
    ffi::OsString,
    future::Future,
    io::{self, BufRead, Write},
};

use anyhow::anyhow;
use bgo_core::{
    Coordinates, CurrentPayload, ForecastPayload, WeatherProvider,
    config::FETCH_DEADLINE,
    json::{round_values, to_pretty_json},
    parse_current, parse_forecast,
};
use chrono::Local;
use clap::{Parser, error::ErrorKind};
use serde_json::Value;
use tokio::time::Instant;

use crate::{
    cli::{Cli, Command, Flags},
    configure, prompt, view,
};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

const USAGE_HINT: &str = "Oops, I don't know what to do! Use -h to see the usage.";
const COORDINATES_FAILED: &str = "Oops! Something went wrong, couldn't get coordinates";
const FETCH_FAILED: &str = "Oops! Please check your internet connection";
const PARSE_FAILED: &str = "Oops! Something went wrong, couldn't parse the response";
const CONFIGURE_FAILED: &str = "Oops! Couldn't save the configuration";

/// Drives one invocation: parse args, fetch, render, and map failures to exit codes.
pub struct Runner<P, R, W, E> {
    provider: P,
    input: R,
    out: W,
    err_out: E,
}

impl<P, R, W, E> Runner<P, R, W, E>
where
    P: WeatherProvider,
    R: BufRead,
    W: Write,
    E: Write,
{
    pub fn new(provider: P, input: R, out: W, err_out: E) -> Self {
        Self { provider, input, out, err_out }
    }

    /// Run with a full argv (including the program name). Returns the exit code.
    pub async fn run<I, T>(&mut self, args: I) -> u8
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(e) => return self.usage_error(&e),
        };

        match cli.command.unwrap_or(Command::Now) {
            Command::Configure => self.configure(),
            command => self.show(command, cli.flags).await,
        }
    }

    fn usage_error(&mut self, e: &clap::Error) -> u8 {
        if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            log_write(write!(self.out, "{}", e.render()));
            return EXIT_OK;
        }

        log_write(write!(self.err_out, "{}", e.render()));
        log_write(writeln!(self.out, "{USAGE_HINT}"));
        EXIT_USAGE
    }

    fn configure(&mut self) -> u8 {
        match configure::configure_api_key() {
            Ok(path) => {
                log_write(writeln!(self.out, "Saved API key to {}", path.display()));
                EXIT_OK
            }
            Err(e) => self.fail(&e, CONFIGURE_FAILED),
        }
    }

    async fn show(&mut self, command: Command, flags: Flags) -> u8 {
        let deadline = Instant::now() + FETCH_DEADLINE;

        let coords = match within(deadline, self.provider.coordinates()).await {
            Ok(coords) => coords,
            Err(e) => return self.fail(&e, COORDINATES_FAILED),
        };
        tracing::debug!(lat = %coords.lat, lon = %coords.lon, "resolved coordinates");

        let mut response = match self.fetch(command, deadline, &coords).await {
            Ok(response) => response,
            Err(e) => return self.fail(&e, FETCH_FAILED),
        };

        if !flags.high_precision {
            round_values(&mut response);
        }

        if flags.full_info {
            return self.print_full_info(&response);
        }

        match command {
            Command::Forecast => self.render_forecast(response, flags),
            _ => self.render_now(response),
        }
    }

    async fn fetch(
        &self,
        command: Command,
        deadline: Instant,
        coords: &Coordinates,
    ) -> anyhow::Result<Value> {
        match command {
            Command::Forecast => within(deadline, self.provider.weather_forecast(coords)).await,
            _ => within(deadline, self.provider.weather_now(coords)).await,
        }
    }

    /// `--full-info` dumps the payload and exits non-zero.
    fn print_full_info(&mut self, response: &Value) -> u8 {
        match to_pretty_json(response) {
            Ok(text) => log_write(writeln!(self.out, "{text}")),
            Err(e) => {
                tracing::warn!("{e:#}");
                log_write(writeln!(self.out, "invalid json"));
            }
        }
        EXIT_FAILURE
    }

    fn render_now(&mut self, response: Value) -> u8 {
        let parsed = CurrentPayload::from_value(response).and_then(|payload| parse_current(&payload));
        let weather = match parsed {
            Ok(weather) => weather,
            Err(e) => return self.fail(&anyhow::Error::from(e), PARSE_FAILED),
        };

        match view::print_weather_now(&mut self.out, &weather, Local::now()) {
            Ok(()) => EXIT_OK,
            Err(e) => self.fail(&anyhow::Error::from(e), PARSE_FAILED),
        }
    }

    fn render_forecast(&mut self, response: Value, flags: Flags) -> u8 {
        let parsed = ForecastPayload::from_value(response)
            .and_then(|payload| parse_forecast(&payload, flags.forecast_options()));
        let rows = match parsed {
            Ok(rows) => rows,
            Err(e) => return self.fail(&anyhow::Error::from(e), PARSE_FAILED),
        };
        tracing::debug!(rows = rows.len(), "aggregated forecast");

        match view::print_weather_forecast(&mut self.out, &rows, flags.with_time) {
            Ok(()) => EXIT_OK,
            Err(e) => self.fail(&anyhow::Error::from(e), PARSE_FAILED),
        }
    }

    fn fail(&mut self, err: &anyhow::Error, message: &str) -> u8 {
        tracing::debug!("{message}: {err:#}");
        if let Err(e) = prompt::handle_error(&mut self.input, &mut self.out, err, message) {
            tracing::warn!("failed to prompt for error details: {e}");
        }
        EXIT_FAILURE
    }
}

/// Output failures don't change the exit code; they only get logged.
fn log_write(result: io::Result<()>) {
    if let Err(e) = result {
        tracing::warn!("failed to write output: {e}");
    }
}

/// Await `fut`, failing once the invocation's shared deadline passes.
async fn within<T, F>(deadline: Instant, fut: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    tokio::time::timeout_at(deadline, fut).await.map_err(|_| {
        anyhow!("request deadline of {}s exceeded", FETCH_DEADLINE.as_secs())
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    #[derive(Debug, Default, Clone)]
    struct FakeProvider {
        coords: Option<Coordinates>,
        now: Value,
        forecast: Value,
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn coordinates(&self) -> anyhow::Result<Coordinates> {
            self.coords.clone().ok_or_else(|| anyhow!("ipinfo status 503: unavailable"))
        }

        async fn weather_now(&self, _coords: &Coordinates) -> anyhow::Result<Value> {
            Ok(self.now.clone())
        }

        async fn weather_forecast(&self, _coords: &Coordinates) -> anyhow::Result<Value> {
            Ok(self.forecast.clone())
        }
    }

    fn testville() -> FakeProvider {
        FakeProvider {
            coords: Some(Coordinates { lat: "1".into(), lon: "2".into() }),
            now: json!({
                "main": { "temp": 10.0, "feels_like": 8.0, "humidity": 60.0 },
                "weather": [{ "id": 800.0, "description": "clear" }],
                "name": "Testville"
            }),
            forecast: json!({
                "list": [
                    { "dt_txt": "2026-02-04 00:00:00", "main": { "temp": 10.4, "feels_like": 9.0, "humidity": 60.0 } },
                    { "dt_txt": "2026-02-04 03:00:00", "main": { "temp": 12.6, "feels_like": 11.0, "humidity": 66.0 } },
                    { "dt_txt": "2026-02-05 00:00:00", "main": { "temp": 8.0, "feels_like": 7.0, "humidity": 70.0 } },
                    { "dt_txt": "2026-02-05 03:00:00", "main": { "temp": 6.0, "feels_like": 5.0, "humidity": 74.0 } }
                ]
            }),
        }
    }

    async fn run(provider: FakeProvider, answer: &str, args: &[&str]) -> (u8, String, String) {
        let mut out = Vec::new();
        let mut err_out = Vec::new();
        let code = {
            let mut runner = Runner::new(provider, answer.as_bytes(), &mut out, &mut err_out);
            runner.run(std::iter::once("bgo").chain(args.iter().copied())).await
        };
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err_out).unwrap(),
        )
    }

    #[tokio::test]
    async fn now_prints_location() {
        let (code, out, _) = run(testville(), "n\n", &["now"]).await;
        assert_eq!(code, EXIT_OK);
        assert!(out.contains("Testville"));
        assert!(out.contains("temperature: 10°C"));
    }

    #[tokio::test]
    async fn now_is_the_default_command() {
        let (code, out, _) = run(testville(), "n\n", &[]).await;
        assert_eq!(code, EXIT_OK);
        assert!(out.contains("Testville"));
    }

    #[tokio::test]
    async fn invalid_days_is_a_usage_error() {
        let (code, out, err_out) = run(FakeProvider::default(), "n\n", &["forecast", "-d", "8"]).await;
        assert_eq!(code, EXIT_USAGE);
        assert!(out.contains(USAGE_HINT));
        assert!(!err_out.is_empty());
    }

    #[tokio::test]
    async fn unknown_command_is_a_usage_error() {
        let (code, out, _) = run(FakeProvider::default(), "n\n", &["yesterday"]).await;
        assert_eq!(code, EXIT_USAGE);
        assert!(out.contains(USAGE_HINT));
    }

    #[tokio::test]
    async fn help_exits_cleanly() {
        let (code, out, _) = run(FakeProvider::default(), "", &["--help"]).await;
        assert_eq!(code, EXIT_OK);
        assert!(out.contains("--with-time"));
    }

    #[tokio::test]
    async fn full_info_prints_json_and_exits_one() {
        let (code, out, _) = run(testville(), "n\n", &["now", "--full-info"]).await;
        assert_eq!(code, EXIT_FAILURE);
        assert!(out.contains("\"name\": \"Testville\""));
    }

    #[tokio::test]
    async fn forecast_rounds_samples_before_averaging() {
        // 10.4 and 12.6 round to 10 and 13; their mean 11.5 prints as 12.
        let (code, out, _) = run(testville(), "n\n", &["forecast", "-d", "2"]).await;
        assert_eq!(code, EXIT_OK);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2026-02-04   12 °C"));
        assert!(lines[2].starts_with("2026-02-05   7 °C"));
    }

    #[tokio::test]
    async fn forecast_high_precision_uses_raw_values() {
        let (code, out, _) = run(testville(), "n\n", &["forecast", "-d", "1", "--high-precision"]).await;
        assert_eq!(code, EXIT_OK);
        assert!(out.contains("11.50 °C"));
        assert_eq!(out.lines().count(), 2);
    }

    #[tokio::test]
    async fn forecast_with_time_lists_samples() {
        let (code, out, _) = run(testville(), "n\n", &["forecast", "--with-time", "-d", "2"]).await;
        assert_eq!(code, EXIT_OK);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Time"));
        assert!(lines[1].starts_with("2026-02-04   00:00  10 °C"));
        assert!(lines[2].starts_with("             03:00  13 °C"));
    }

    #[tokio::test]
    async fn coordinate_failure_offers_details() {
        let provider = FakeProvider { coords: None, ..testville() };
        let (code, out, _) = run(provider, "y\n", &["now"]).await;

        assert_eq!(code, EXIT_FAILURE);
        assert!(out.contains(COORDINATES_FAILED));
        assert!(out.contains("ipinfo status 503"));
    }

    #[tokio::test]
    async fn malformed_forecast_reports_parse_failure() {
        let provider = FakeProvider {
            forecast: json!({ "list": [{ "dt_txt": "2026-02-04 00:00:00" }] }),
            ..testville()
        };
        let (code, out, _) = run(provider, "y\n", &["forecast"]).await;

        assert_eq!(code, EXIT_FAILURE);
        assert!(out.contains(PARSE_FAILED));
        assert!(out.contains("missing main in forecast"));
        assert!(!out.contains("Temperature"));
    }

    #[tokio::test]
    async fn malformed_now_hides_details_by_default() {
        let provider = FakeProvider { now: json!({ "weather": [] }), ..testville() };
        let (code, out, _) = run(provider, "n\n", &["now"]).await;

        assert_eq!(code, EXIT_FAILURE);
        assert!(out.contains(PARSE_FAILED));
        assert!(!out.contains("missing main"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn closed_stdout_keeps_exit_codes() {
        let cases: [(&[&str], u8); 3] = [
            (&["--help"], EXIT_OK),
            (&["now", "--full-info"], EXIT_FAILURE),
            (&["forecast", "-d", "9"], EXIT_USAGE),
        ];

        for (args, expected) in cases {
            let mut runner = Runner::new(testville(), "".as_bytes(), BrokenPipe, BrokenPipe);
            let code = runner.run(std::iter::once("bgo").chain(args.iter().copied())).await;
            assert_eq!(code, expected, "{args:?}");
        }
    }
}
