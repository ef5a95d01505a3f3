use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, header::AUTHORIZATION};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

use crate::{
    Settings,
    model::{Coordinate, Credential, RawObservationSet, TimeWindow},
};

use super::{FetchError, ObservationSource};

/// The only variable ever requested.
const PARAMS: &str = "airTemperature";

#[derive(Debug, Clone)]
pub struct StormglassProvider {
    credential: Credential,
    base_url: String,
    http: Client,
}

impl StormglassProvider {
    pub fn new(credential: Credential, settings: &Settings) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            credential,
            base_url: settings.base_url.clone(),
            http,
        })
    }

    /// Fetch air temperature for `coordinate` over an explicit `window`.
    #[instrument(skip(self), fields(url = %self.base_url))]
    pub async fn fetch_window(
        &self,
        coordinate: Coordinate,
        window: TimeWindow,
    ) -> Result<RawObservationSet, FetchError> {
        let start = window.start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let end = window.end.to_rfc3339_opts(SecondsFormat::Secs, true);
        debug!(%start, %end, "requesting observations");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lng", coordinate.longitude.to_string()),
                ("params", PARAMS.to_string()),
                ("start", start),
                ("end", end),
            ])
            .header(AUTHORIZATION, self.credential.as_str())
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::Request)?;

        if !status.is_success() {
            warn!(%status, "stormglass rejected the request");
            return Err(FetchError::Status {
                status,
                message: error_message(&body),
            });
        }

        let parsed: RawObservationSet = serde_json::from_str(&body).map_err(FetchError::Decode)?;

        if let Some(meta) = &parsed.meta {
            info!(
                cost = ?meta.cost,
                daily_quota = ?meta.daily_quota,
                request_count = ?meta.request_count,
                "stormglass quota"
            );
        }
        debug!(
            hours = parsed.hours.as_ref().map_or(0, Vec::len),
            "received observations"
        );

        Ok(parsed)
    }
}

#[async_trait]
impl ObservationSource for StormglassProvider {
    async fn fetch(&self, coordinate: Coordinate) -> Result<RawObservationSet, FetchError> {
        self.fetch_window(coordinate, TimeWindow::trailing(Utc::now())).await
    }
}

/// Error body shape: `{"errors": {"key": "API key is invalid"}}`.
#[derive(Debug, Deserialize)]
struct SgErrorBody {
    errors: BTreeMap<String, serde_json::Value>,
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<SgErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .iter()
            .map(|(field, value)| match value {
                serde_json::Value::String(s) => format!("{field}: {s}"),
                other => format!("{field}: {other}"),
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
