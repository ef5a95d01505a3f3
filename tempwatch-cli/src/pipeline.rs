//! Fetch → table → analyze/plot, stopping with a message at the first empty stage.

use std::io::Write;

use anyhow::Result;
use tempwatch_core::{
    Coordinate, Credential, ObservationSource, Settings, TemperatureSeries, TemperatureSummary,
    source_from_settings,
};
use tracing::{info, warn};

use crate::viewer::ChartDisplay;

pub const MISSING_CREDENTIAL: &str =
    "API key not found. Please set the API_KEY environment variable.";
pub const FETCH_FAILED: &str = "Failed to fetch data. Please check your inputs and try again.";
pub const NO_VALID_DATA: &str = "No valid data to process.";
pub const NO_DATA: &str = "No data to analyze.";
pub const NO_PLOT: &str = "No data to plot.";
pub const NO_VALUES: &str = "No temperature values to analyze.";

/// Where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    MissingCredential,
    FetchFailed,
    NoValidData,
    NoData,
    NoValues,
    Charted,
}

/// Full run for one coordinate. Without a credential nothing is sent.
pub async fn execute<W: Write>(
    settings: &Settings,
    credential: Option<Credential>,
    coordinate: Coordinate,
    display: &dyn ChartDisplay,
    out: &mut W,
) -> Result<Outcome> {
    let Some(credential) = credential else {
        writeln!(out, "{MISSING_CREDENTIAL}")?;
        return Ok(Outcome::MissingCredential);
    };

    let source = source_from_settings(credential, settings)?;
    run(source.as_ref(), coordinate, &settings.source, display, out).await
}

pub async fn run<W: Write>(
    source: &dyn ObservationSource,
    coordinate: Coordinate,
    data_source: &str,
    display: &dyn ChartDisplay,
    out: &mut W,
) -> Result<Outcome> {
    info!(%coordinate, "fetching air temperature");

    let raw = match source.fetch(coordinate).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!(error = %err, "fetch failed");
            writeln!(out, "An error occurred while fetching data: {err}")?;
            writeln!(out, "{FETCH_FAILED}")?;
            return Ok(Outcome::FetchFailed);
        }
    };

    let series = match TemperatureSeries::from_raw(&raw, data_source) {
        Ok(series) => series,
        Err(err) => {
            warn!(error = %err, "unusable response");
            writeln!(out, "{NO_VALID_DATA}")?;
            return Ok(Outcome::NoValidData);
        }
    };

    analyze(&series, display, out)
}

/// Print the summary, then hand the series to `display`.
pub fn analyze<W: Write>(
    series: &TemperatureSeries,
    display: &dyn ChartDisplay,
    out: &mut W,
) -> Result<Outcome> {
    if series.is_empty() {
        writeln!(out, "{NO_DATA}")?;
        writeln!(out, "{NO_PLOT}")?;
        return Ok(Outcome::NoData);
    }

    let Some(summary) = TemperatureSummary::of(series) else {
        writeln!(out, "{NO_VALUES}")?;
        return Ok(Outcome::NoValues);
    };

    writeln!(out, "{summary}")?;
    if summary.missing > 0 {
        writeln!(
            out,
            "({} of {} hourly readings had no value)",
            summary.missing,
            series.len()
        )?;
    }
    out.flush()?;

    display.show(series)?;
    Ok(Outcome::Charted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::{
        cell::RefCell,
        sync::atomic::{AtomicUsize, Ordering},
    };
    use tempwatch_core::{FetchError, RawObservationSet, provider::StatusCode};
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

    #[derive(Debug)]
    struct CannedSource {
        body: Option<serde_json::Value>,
        calls: AtomicUsize,
    }

    impl CannedSource {
        fn ok(body: serde_json::Value) -> Self {
            Self { body: Some(body), calls: AtomicUsize::new(0) }
        }

        fn failing() -> Self {
            Self { body: None, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl ObservationSource for CannedSource {
        async fn fetch(&self, _coordinate: Coordinate) -> Result<RawObservationSet, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.body {
                Some(body) => Ok(serde_json::from_value(body.clone()).unwrap()),
                None => Err(FetchError::Status {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    message: "upstream unavailable".into(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct RecordingDisplay {
        shown: RefCell<Vec<usize>>,
    }

    impl ChartDisplay for RecordingDisplay {
        fn show(&self, series: &TemperatureSeries) -> Result<()> {
            self.shown.borrow_mut().push(series.len());
            Ok(())
        }
    }

    fn hours(temps: &[Option<f64>]) -> serde_json::Value {
        let records: Vec<_> = temps
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let air = match t {
                    Some(v) => serde_json::json!({ "sg": v, "noaa": v }),
                    None => serde_json::json!({ "noaa": 1.0 }),
                };
                serde_json::json!({
                    "time": format!("2024-01-01T{i:02}:00:00+00:00"),
                    "airTemperature": air
                })
            })
            .collect();
        serde_json::json!({ "hours": records })
    }

    fn point() -> Coordinate {
        Coordinate::new(58.7984, 17.8081)
    }

    async fn run_with(source: &CannedSource, display: &RecordingDisplay) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = run(source, point(), "sg", display, &mut out).await.unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn prints_statistics_and_shows_chart() {
        let source = CannedSource::ok(hours(&[Some(10.0), Some(20.0), Some(30.0)]));
        let display = RecordingDisplay::default();

        let (outcome, out) = run_with(&source, &display).await;

        assert_eq!(outcome, Outcome::Charted);
        assert_eq!(
            out,
            "Average Temperature: 20.00°C\n\
             Maximum Temperature: 30.00°C\n\
             Minimum Temperature: 10.00°C\n"
        );
        assert_eq!(*display.shown.borrow(), vec![3]);
    }

    #[tokio::test]
    async fn missing_values_are_reported_and_still_charted() {
        let source = CannedSource::ok(hours(&[Some(1.0), None, Some(3.0)]));
        let display = RecordingDisplay::default();

        let (outcome, out) = run_with(&source, &display).await;

        assert_eq!(outcome, Outcome::Charted);
        assert!(out.contains("Average Temperature: 2.00°C"));
        assert!(out.contains("(1 of 3 hourly readings had no value)"));
        assert_eq!(*display.shown.borrow(), vec![3]);
    }

    #[tokio::test]
    async fn fetch_failure_prints_error_and_stops() {
        let source = CannedSource::failing();
        let display = RecordingDisplay::default();

        let (outcome, out) = run_with(&source, &display).await;

        assert_eq!(outcome, Outcome::FetchFailed);
        assert!(out.starts_with("An error occurred while fetching data: "));
        assert!(out.contains("upstream unavailable"));
        assert!(out.ends_with(&format!("{FETCH_FAILED}\n")));
        assert!(display.shown.borrow().is_empty());
    }

    #[tokio::test]
    async fn response_without_hours_never_reaches_analysis() {
        let source = CannedSource::ok(serde_json::json!({}));
        let display = RecordingDisplay::default();

        let (outcome, out) = run_with(&source, &display).await;

        assert_eq!(outcome, Outcome::NoValidData);
        assert_eq!(out, format!("{NO_VALID_DATA}\n"));
        assert!(display.shown.borrow().is_empty());
    }

    #[tokio::test]
    async fn record_without_time_is_not_valid_data() {
        let source = CannedSource::ok(serde_json::json!({
            "hours": [{ "airTemperature": { "sg": 1.0 } }]
        }));
        let display = RecordingDisplay::default();

        let (outcome, out) = run_with(&source, &display).await;

        assert_eq!(outcome, Outcome::NoValidData);
        assert_eq!(out, format!("{NO_VALID_DATA}\n"));
        assert!(display.shown.borrow().is_empty());
    }

    #[tokio::test]
    async fn empty_hours_has_nothing_to_analyze() {
        let source = CannedSource::ok(serde_json::json!({ "hours": [] }));
        let display = RecordingDisplay::default();

        let (outcome, out) = run_with(&source, &display).await;

        assert_eq!(outcome, Outcome::NoData);
        assert_eq!(out, "No data to analyze.\nNo data to plot.\n");
        assert!(display.shown.borrow().is_empty());
    }

    #[tokio::test]
    async fn all_values_missing_skips_chart() {
        let source = CannedSource::ok(hours(&[None, None]));
        let display = RecordingDisplay::default();

        let (outcome, out) = run_with(&source, &display).await;

        assert_eq!(outcome, Outcome::NoValues);
        assert_eq!(out, format!("{NO_VALUES}\n"));
        assert!(display.shown.borrow().is_empty());
    }

    #[tokio::test]
    async fn missing_credential_sends_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(hours(&[Some(1.0)])))
            .expect(0)
            .mount(&server)
            .await;

        let settings = Settings { base_url: server.uri(), ..Settings::default() };
        let display = RecordingDisplay::default();
        let mut out = Vec::new();

        let outcome = execute(&settings, None, point(), &display, &mut out).await.unwrap();

        assert_eq!(outcome, Outcome::MissingCredential);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{MISSING_CREDENTIAL}\n"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn execute_fetches_with_credential() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(hours(&[Some(10.0), Some(30.0)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let settings = Settings { base_url: server.uri(), ..Settings::default() };
        let display = RecordingDisplay::default();
        let mut out = Vec::new();

        let outcome = execute(&settings, Credential::new("KEY"), point(), &display, &mut out)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Charted);
        assert!(String::from_utf8(out).unwrap().contains("Average Temperature: 20.00°C"));
        assert_eq!(*display.shown.borrow(), vec![2]);
    }

    #[tokio::test]
    async fn source_is_called_exactly_once() {
        let source = CannedSource::ok(hours(&[Some(5.0)]));
        let display = RecordingDisplay::default();

        run_with(&source, &display).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
