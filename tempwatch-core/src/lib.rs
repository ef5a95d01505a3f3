//! Core library for the `tempwatch` CLI.
//!
//! This crate defines:
//! - Settings loading and the API credential
//! - The observation source abstraction and its Stormglass implementation
//! - Turning a response into a temperature series, summarising and charting it
//!
//! It is used by `tempwatch-cli`, but does no terminal or display I/O itself.

pub mod chart;
pub mod config;
pub mod model;
pub mod provider;
pub mod series;
pub mod stats;

pub use chart::{ChartError, render_png};
pub use config::Settings;
pub use model::{Coordinate, Credential, HourRecord, RawObservationSet, ResponseMeta, TimeWindow};
pub use provider::{FetchError, ObservationSource, source_from_settings, stormglass::StormglassProvider};
pub use series::{Reading, SeriesError, TemperatureSeries};
pub use stats::TemperatureSummary;
