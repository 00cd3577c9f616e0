//! CLI configuration file support
//!
//! Loads configuration from ~/.config/calculadora/config.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Clear the terminal before every screen
    pub clear_screen: bool,
    /// Wait for Enter after showing a result
    pub pause: bool,
    /// Directory for saved histories (defaults to the working directory)
    pub save_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            clear_screen: true,
            pause: true,
            save_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the default path, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        Self::load_from_path(&path).unwrap_or_else(|err| {
            warn!("ignoring configuration: {err:#}");
            Self::default()
        })
    }

    /// Load configuration from a specific path. A missing file is not an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("calculadora").join("config.toml"))
    }

    pub fn save_dir(&self) -> PathBuf {
        self.save_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
