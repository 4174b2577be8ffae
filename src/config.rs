// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON under the XDG config directory. Missing or unreadable
//! files fall back to defaults; individual missing fields do too, so old
//! config files keep loading across releases.

use crate::constants::{APP_NAME, CONFIG_FILE};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device selected in the last session, preselected on startup
    pub last_device_id: Option<String>,
    /// User-agent reported to the negotiator when the CLI flag is absent
    pub user_agent_override: Option<String>,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults on any
    /// failure (first run, unreadable file, stale format)
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                if path.exists() {
                    warn!(path = %path.display(), error = %err, "Failed to load config, using defaults");
                }
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("{}: {}", path.display(), err)))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save to the default location
    pub fn save(&self) -> AppResult<()> {
        let path = Self::default_path()
            .ok_or_else(|| AppError::Config("no config directory available".to_string()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| AppError::Config(format!("{}: {}", parent.display(), err)))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .map_err(|err| AppError::Config(format!("{}: {}", path.display(), err)))?;
        Ok(())
    }
}
