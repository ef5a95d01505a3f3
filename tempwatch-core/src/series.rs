//! Flattening an observation set into a `(time, temperature)` series.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::RawObservationSet;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("response has no \"hours\" records")]
    MissingHours,

    #[error("record {index} has no timestamp")]
    MissingTimestamp { index: usize },

    #[error("record {index} has an invalid timestamp {value:?}")]
    InvalidTimestamp { index: usize, value: String },
}

/// One row of the series; `temperature` is `None` when the source had no value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub time: DateTime<Utc>,
    pub temperature: Option<f64>,
}

/// Readings in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemperatureSeries {
    readings: Vec<Reading>,
}

impl TemperatureSeries {
    /// One reading per hourly record, temperature taken from `source`.
    pub fn from_raw(raw: &RawObservationSet, source: &str) -> Result<Self, SeriesError> {
        let hours = raw.hours.as_ref().ok_or(SeriesError::MissingHours)?;

        let readings = hours
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let raw_time = record
                    .time
                    .as_deref()
                    .ok_or(SeriesError::MissingTimestamp { index })?;
                let time = DateTime::parse_from_rfc3339(raw_time)
                    .map_err(|_| SeriesError::InvalidTimestamp {
                        index,
                        value: raw_time.to_string(),
                    })?
                    .with_timezone(&Utc);

                Ok(Reading {
                    time,
                    temperature: record.temperature_from(source),
                })
            })
            .collect::<Result<Vec<_>, SeriesError>>()?;

        Ok(Self { readings })
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Temperatures that are actually present.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().filter_map(|r| r.temperature)
    }
}

impl FromIterator<Reading> for TemperatureSeries {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self { readings: iter.into_iter().collect() }
    }
}
