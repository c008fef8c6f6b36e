// src/config.rs

//! Defines the configuration structures for ferrofoot.
//!
//! Settings are read from a JSON file. Every section and field has a default,
//! so a config file only needs to mention what it changes:
//!
//! ```json
//! { "window": { "title": "My Game", "speed": 30 } }
//! ```
//!
//! The process-wide [`CONFIG`] is loaded once, from the file named by the
//! `FERROFOOT_CONFIG` environment variable, or from defaults when unset.

use crate::error::{FootError, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "FERROFOOT_CONFIG";

pub static CONFIG: Lazy<Config> = Lazy::new(|| match std::env::var_os(CONFIG_ENV_VAR) {
    Some(path) => Config::load_or_default(path),
    None => Config::default(),
});

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub actors: ActorConfig,
    pub background: BackgroundConfig,
}

impl Config {
    /// Reads and parses a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FootError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|e| FootError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Like `load`, falling back to defaults (with a warning) on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{}; using default configuration", e);
            Self::default()
        })
    }
}

// --- Window Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title until a game sets its own.
    pub title: String,
    /// Default frame rate of new worlds.
    pub speed: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "ferrofoot".to_string(),
            speed: 60,
        }
    }
}

// --- Actor Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActorConfig {
    /// Side length of the default actor image in free worlds.
    pub default_size: u32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        ActorConfig { default_size: 50 }
    }
}

// --- Background Configuration ---

/// Look of the generated default backgrounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Distance between hatch lines in free worlds.
    pub hatch_spacing: u32,
    /// Border width of each cell in grid worlds.
    pub grid_border: u32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        BackgroundConfig {
            hatch_spacing: 30,
            grid_border: 3,
        }
    }
}
