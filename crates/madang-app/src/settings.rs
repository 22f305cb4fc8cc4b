//! Settings file
//!
//! `<config_dir>/madang/settings.toml`; a missing file means defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use madang_core::ConnectionConfig;
use serde::{Deserialize, Serialize};

use crate::logging::LogProfile;

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("madang"))
}

pub fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .context("Could not determine data directory")
        .map(|p| p.join("madang"))
}

pub fn settings_path() -> Result<PathBuf> {
    config_dir().map(|p| p.join("settings.toml"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where `db_error_log.txt` and `general_error_log.txt` are appended
    pub error_log_dir: PathBuf,
    pub logging: LogProfile,
    pub connection: ConnectionConfig,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = data_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            connection: ConnectionConfig::new(
                "sqlite",
                &data_dir.join("madang.db").to_string_lossy(),
            ),
            error_log_dir: data_dir,
            logging: LogProfile::default(),
        }
    }
}

impl Settings {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings TOML in {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }
}
