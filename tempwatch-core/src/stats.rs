use std::fmt;

use crate::series::TemperatureSeries;

/// Mean, maximum and minimum over the readings that carry a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSummary {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Readings that contributed.
    pub present: usize,
    /// Readings skipped for having no value.
    pub missing: usize,
}

impl TemperatureSummary {
    /// `None` when no reading has a value.
    pub fn of(series: &TemperatureSeries) -> Option<Self> {
        let mut present = 0usize;
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;

        for value in series.values() {
            present += 1;
            sum += value;
            max = max.max(value);
            min = min.min(value);
        }

        if present == 0 {
            return None;
        }

        Some(Self {
            mean: sum / present as f64,
            max,
            min,
            present,
            missing: series.len() - present,
        })
    }
}

impl fmt::Display for TemperatureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average Temperature: {:.2}°C", self.mean)?;
        writeln!(f, "Maximum Temperature: {:.2}°C", self.max)?;
        write!(f, "Minimum Temperature: {:.2}°C", self.min)
    }
}
