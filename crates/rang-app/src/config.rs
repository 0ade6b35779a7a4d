//! Application configuration.

use peniko::Color;
use rang_core::color::{DEFAULT_COLOR, parse_css_color};
use rang_core::simplify::DEFAULT_TOLERANCE;
use rang_core::tools::DEFAULT_BRUSH_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidColor(#[from] rang_core::ColorParseError),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Drawing surface width in pixels.
    pub width: u32,
    /// Drawing surface height in pixels.
    pub height: u32,
    /// Export background; `None` keeps transparency.
    pub background: Option<String>,
    /// Simplification tolerance for committed strokes; `None` keeps every point.
    pub tolerance: Option<f64>,
    pub default_color: String,
    pub brush_size: f64,
    /// Where the file backend keeps rooms. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            background: Some("#ffffff".to_string()),
            tolerance: Some(DEFAULT_TOLERANCE),
            default_color: DEFAULT_COLOR.to_string(),
            brush_size: DEFAULT_BRUSH_SIZE,
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Default config file location.
    ///
    /// On Unix: `~/.config/rang/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rang").join("config.json"))
    }

    /// Parsed export background.
    pub fn background_color(&self) -> Result<Option<Color>, ConfigError> {
        self.background
            .as_deref()
            .map(parse_css_color)
            .transpose()
            .map_err(ConfigError::from)
    }

    /// Directory for the file backend.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_local_dir()
                .or_else(dirs::home_dir)
                .map(|base| base.join("rang").join("rooms"))
                .ok_or_else(|| ConfigError::Io("Could not determine home directory".to_string())),
        }
    }
}
