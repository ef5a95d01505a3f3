//! PNG line chart of a [`TemperatureSeries`].

use std::{fmt, ops::Range, path::Path};

use chrono::{Duration, NaiveDateTime};
use plotters::{coord::types::RangedDateTime, prelude::*};
use thiserror::Error;
use tracing::debug;

use crate::series::TemperatureSeries;

/// 12×6 at 100 px per unit.
pub const CHART_SIZE: (u32, u32) = (1200, 600);
pub const CHART_TITLE: &str = "Air Temperature Over Time";
pub const X_LABEL: &str = "Date";
pub const Y_LABEL: &str = "Temperature (°C)";

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("series has no temperature values to plot")]
    NoValues,

    #[error("failed to draw chart: {0}")]
    Draw(String),
}

fn draw_failed(err: impl fmt::Display) -> ChartError {
    ChartError::Draw(err.to_string())
}

/// Draw `series` to a PNG at `path`. Missing readings break the line.
pub fn render_png(series: &TemperatureSeries, path: &Path) -> Result<(), ChartError> {
    let segments = segments(series);
    let (x_range, y_range) = bounds(&segments).ok_or(ChartError::NoValues)?;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_failed)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 28))
        .margin(16)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(RangedDateTime::from(x_range), y_range)
        .map_err(draw_failed)?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%m-%d %H:%M").to_string())
        .light_line_style(BLACK.mix(0.15))
        .draw()
        .map_err(draw_failed)?;

    for segment in segments {
        chart
            .draw_series(LineSeries::new(segment, RED))
            .map_err(draw_failed)?;
    }

    root.present().map_err(draw_failed)?;
    debug!(path = %path.display(), "chart written");

    Ok(())
}

/// Runs of consecutive readings that all carry a value.
fn segments(series: &TemperatureSeries) -> Vec<Vec<(NaiveDateTime, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();

    for reading in series.readings() {
        match reading.temperature {
            Some(t) => current.push((reading.time.naive_utc(), t)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }

    out
}

/// Axis ranges with a little headroom; `None` if there are no points.
fn bounds(
    segments: &[Vec<(NaiveDateTime, f64)>],
) -> Option<(Range<NaiveDateTime>, Range<f64>)> {
    let mut points = segments.iter().flatten();
    let &(t0, v0) = points.next()?;

    let (mut t_min, mut t_max, mut v_min, mut v_max) = (t0, t0, v0, v0);
    for &(t, v) in points {
        t_min = t_min.min(t);
        t_max = t_max.max(t);
        v_min = v_min.min(v);
        v_max = v_max.max(v);
    }

    if t_min == t_max {
        t_min -= Duration::hours(1);
        t_max += Duration::hours(1);
    }

    let pad = if v_max - v_min > 1e-6 { (v_max - v_min) * 0.1 } else { 1.0 };

    Some((t_min..t_max, (v_min - pad)..(v_max + pad)))
}
