use crate::{Coordinate, Credential, RawObservationSet, Settings, provider::stormglass::StormglassProvider};
use async_trait::async_trait;
pub use reqwest::StatusCode;
use std::fmt::Debug;
use thiserror::Error;

pub mod stormglass;

/// Why a fetch produced no observation set.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection failure, timeout, or an error reading the body.
    #[error("{0}")]
    Request(#[source] reqwest::Error),

    #[error("request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Anything that can hand back the trailing week of observations for a point.
#[async_trait]
pub trait ObservationSource: Send + Sync + Debug {
    async fn fetch(&self, coordinate: Coordinate) -> Result<RawObservationSet, FetchError>;
}

/// Construct the Stormglass source for `credential` using `settings`.
pub fn source_from_settings(
    credential: Credential,
    settings: &Settings,
) -> Result<Box<dyn ObservationSource>, FetchError> {
    Ok(Box::new(StormglassProvider::new(credential, settings)?))
}
