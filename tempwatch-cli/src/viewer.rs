use std::{
    fs,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Result};
use inquire::{InquireError, Text};
use tempwatch_core::{TemperatureSeries, render_png};
use tracing::{debug, warn};

/// Where a rendered series ends up in front of the user.
pub trait ChartDisplay {
    /// Returns once the user is done looking at the chart.
    fn show(&self, series: &TemperatureSeries) -> Result<()>;
}

/// Renders to PNG and opens it with the platform image viewer.
#[derive(Debug)]
pub struct SystemViewer {
    keep_at: Option<PathBuf>,
}

impl SystemViewer {
    pub fn new(keep_at: Option<PathBuf>) -> Self {
        Self { keep_at }
    }

    fn chart_path(&self) -> PathBuf {
        self.keep_at.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!("tempwatch-{}.png", std::process::id()))
        })
    }
}

impl ChartDisplay for SystemViewer {
    fn show(&self, series: &TemperatureSeries) -> Result<()> {
        let path = self.chart_path();
        render_png(series, &path)
            .with_context(|| format!("Failed to render chart to {}", path.display()))?;

        if !is_interactive() {
            println!("Chart written to {}", path.display());
            return Ok(());
        }

        if let Err(err) = open_in_viewer(&path) {
            warn!(error = %err, "could not launch an image viewer");
            println!("Chart written to {}", path.display());
        }

        wait_for_close()?;

        if self.keep_at.is_none() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }

        Ok(())
    }
}

fn is_interactive() -> bool {
    if !io::stdin().is_terminal() {
        return false;
    }
    // No display server to show a window on.
    if cfg!(all(unix, not(target_os = "macos")))
        && std::env::var_os("DISPLAY").is_none()
        && std::env::var_os("WAYLAND_DISPLAY").is_none()
    {
        return false;
    }
    true
}

fn open_in_viewer(path: &Path) -> Result<()> {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };

    let status = cmd
        .arg(path)
        .status()
        .context("Failed to launch image viewer")?;
    debug!(%status, "image viewer launched");

    anyhow::ensure!(status.success(), "image viewer exited with {status}");
    Ok(())
}

fn wait_for_close() -> Result<()> {
    match Text::new("Press Enter when you are done with the chart").prompt() {
        Ok(_) | Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
