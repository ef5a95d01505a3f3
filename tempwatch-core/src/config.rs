use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Stormglass point endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.stormglass.io/v2/weather/point";

/// Data source whose value is taken from each `airTemperature` mapping.
pub const DEFAULT_SOURCE: &str = "sg";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Non-secret settings, optionally read from a TOML file.
///
/// The API key never lives here; it is passed separately as a
/// [`Credential`](crate::Credential).
///
/// Example TOML:
/// ```toml
/// base_url = "https://api.stormglass.io/v2/weather/point"
/// timeout_secs = 10
/// chart_path = "/home/me/air-temperature.png"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,

    /// Upper bound on the whole HTTP exchange.
    pub timeout_secs: u64,

    /// Keep the rendered chart at this path. When unset a temp file is used
    /// and removed once the viewer is closed.
    pub chart_path: Option<PathBuf>,

    pub source: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            chart_path: None,
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load settings from the platform config dir, or defaults if there is no file yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load settings from `path`, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "tempwatch", "tempwatch")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
