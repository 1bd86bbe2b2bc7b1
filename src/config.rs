//! Application configuration.
//!
//! Every field has a default, so a config file only needs the keys it wants
//! to change. Command-line flags are applied on top by `main`.

use crate::consts::dash_consts::{clock, news, weather};
use crate::content::{DISPLAY_FONT, TEXT_FONT, TemperatureFormat};
use crate::render::fonts::default_font_table;
use crate::render::{FontError, FontRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use std::{fs, io, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read or write config file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),

    #[error(transparent)]
    Font(#[from] FontError),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub latitude: f64,
    pub longitude: f64,
    pub tick_interval_ms: u64,
    pub weather_interval_secs: u64,
    pub news_interval_secs: u64,
    /// Two-letter country code for top headlines.
    pub news_country: String,
    pub max_headlines: usize,
    pub temperature: TemperatureFormat,
    /// Logical font name to face family (`mono` or `mono-bold`).
    pub fonts: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            latitude: weather::DEFAULT_LATITUDE,
            longitude: weather::DEFAULT_LONGITUDE,
            tick_interval_ms: clock::TICK_INTERVAL_MS,
            weather_interval_secs: weather::FETCH_INTERVAL_SECS,
            news_interval_secs: news::FETCH_INTERVAL_SECS,
            news_country: news::DEFAULT_COUNTRY.to_string(),
            max_headlines: news::MAX_HEADLINES,
            temperature: TemperatureFormat::default(),
            fonts: default_font_table(),
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Json` if it is not valid configuration JSON.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)?;
        Ok(config)
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    #[allow(unused)]
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ConfigError::Invalid(format!(
                "latitude {} is outside -90..=90",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ConfigError::Invalid(format!(
                "longitude {} is outside -180..=180",
                self.longitude
            )));
        }
        for (name, value) in [
            ("tick_interval_ms", self.tick_interval_ms),
            ("weather_interval_secs", self.weather_interval_secs),
            ("news_interval_secs", self.news_interval_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be greater than 0", name)));
            }
        }
        Ok(())
    }

    /// Load the font table into a registry. Every font the content builder
    /// draws with must be present.
    pub fn font_registry(&self) -> Result<FontRegistry, ConfigError> {
        let registry = FontRegistry::from_table(&self.fonts)?;
        registry.require(&[TEXT_FONT, DISPLAY_FONT])?;
        Ok(registry)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn weather_interval(&self) -> Duration {
        Duration::from_secs(self.weather_interval_secs)
    }

    pub fn news_interval(&self) -> Duration {
        Duration::from_secs(self.news_interval_secs)
    }
}
