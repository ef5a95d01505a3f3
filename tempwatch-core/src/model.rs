use std::{collections::HashMap, fmt};

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Length of the trailing window requested on every fetch.
pub const TRAILING_WINDOW_DAYS: i64 = 7;

/// Geographic point the observations are requested for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// API token sent verbatim in the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Name of the environment variable the binary reads the token from.
    pub const ENV_VAR: &'static str = "API_KEY";

    /// Wrap a token; an empty string counts as no credential at all.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() { None } else { Some(Self(token)) }
    }

    /// Resolve the credential through `lookup`, keyed by [`Credential::ENV_VAR`].
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        lookup(Self::ENV_VAR).and_then(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never leak the token into logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Closed time range `[start, end]` sent as the `start`/`end` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// The [`TRAILING_WINDOW_DAYS`] days leading up to `end`.
    pub fn trailing(end: DateTime<Utc>) -> Self {
        Self { start: end - Duration::days(TRAILING_WINDOW_DAYS), end }
    }
}

/// Payload of the point endpoint, as returned on a successful fetch.
///
/// Every field is optional: a body of `{}` decodes fine and is rejected later,
/// when the series is built.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawObservationSet {
    #[serde(default)]
    pub hours: Option<Vec<HourRecord>>,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
}

/// One hourly record. Values are keyed by data-source id (`sg`, `noaa`, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourRecord {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(rename = "airTemperature", default)]
    pub air_temperature: Option<HashMap<String, Option<f64>>>,
}

impl HourRecord {
    /// Temperature reported by `source`, if the record carries one.
    pub fn temperature_from(&self, source: &str) -> Option<f64> {
        self.air_temperature.as_ref()?.get(source).copied().flatten()
    }
}

/// Request accounting echoed back by the API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub cost: Option<u32>,
    pub daily_quota: Option<u32>,
    pub request_count: Option<u32>,
}
