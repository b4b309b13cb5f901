use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{provider::DataSource, units::DisplayUnits, view::Features};

pub const DEFAULT_CITY: &str = "London";
pub const DEFAULT_FORECAST_DAYS: u8 = 3;

/// Credentials and endpoint for the live WeatherAPI.com source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherApiConfig {
    pub api_key: String,
    /// Overrides the public endpoint, e.g. a local proxy.
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// data_source = "live"
/// default_city = "Madrid"
/// fallback_to_mock = true
///
/// [weatherapi]
/// api_key = "..."
///
/// [units]
/// temperature = "fahrenheit"
/// speed = "mph"
///
/// [features]
/// comparison = true
/// uv_panel = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// "live" or "mock".
    pub data_source: Option<String>,
    pub default_city: String,
    pub forecast_days: u8,
    /// Serve bundled mock data when a live load fails.
    pub fallback_to_mock: bool,
    pub weatherapi: Option<WeatherApiConfig>,
    pub units: DisplayUnits,
    pub features: Features,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: None,
            default_city: DEFAULT_CITY.to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            fallback_to_mock: false,
            weatherapi: None,
            units: DisplayUnits::default(),
            features: Features::default(),
        }
    }
}

impl Config {
    /// Return the configured data source as a strongly-typed [`DataSource`].
    pub fn data_source_id(&self) -> Result<DataSource> {
        let s = self.data_source.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "No data source configured.\n\
                 Hint: run `weatherdash configure` first, or pass `--mock`."
            )
        })?;

        DataSource::try_from(s.as_str())
    }

    pub fn set_data_source(&mut self, id: DataSource) {
        self.data_source = Some(id.as_str().to_string());
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace the WeatherAPI key, keeping any base URL override. Makes the
    /// live source the default when none is chosen yet.
    pub fn set_api_key(&mut self, api_key: String) {
        let base_url = self.weatherapi.take().and_then(|c| c.base_url);
        self.weatherapi = Some(WeatherApiConfig { api_key, base_url });

        if self.data_source.is_none() {
            self.set_data_source(DataSource::Live);
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.weatherapi.as_ref().map(|c| c.api_key.as_str()).filter(|k| !k.is_empty())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.weatherapi.as_ref().and_then(|c| c.base_url.as_deref())
    }

    pub fn is_live_configured(&self) -> bool {
        self.api_key().is_some()
    }
}
