//! Persistence configuration, loadable from TOML

use crate::error::{OptionsError, OptionsResult};
use crate::options::OPTION_DEBOUNCE_DELAY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Auto-save configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Save after changes settle
    pub enabled: bool,
    /// Quiet period before a save, in milliseconds
    pub debounce_ms: u64,
    /// Write unsaved changes when the manager is dropped
    pub flush_on_drop: bool,
    /// Quiet period of each option's own debounced hook, in milliseconds
    pub option_debounce_ms: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 1000,
            flush_on_drop: true,
            option_debounce_ms: OPTION_DEBOUNCE_DELAY.as_millis() as u64,
        }
    }
}

impl AutoSaveConfig {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn option_debounce_delay(&self) -> Duration {
        Duration::from_millis(self.option_debounce_ms)
    }
}

/// Storage location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the options file
    pub base_directory: PathBuf,
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_directory: dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("xreal"),
            file_name: "options.dat".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn file_path(&self) -> PathBuf {
        self.base_directory.join(&self.file_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub auto_save: AutoSaveConfig,
    pub storage: StorageConfig,
}

impl PersistenceConfig {
    /// Read a TOML config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> OptionsResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No persistence config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::from_toml_str(&text)?;
        info!("Loaded persistence config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> OptionsResult<Self> {
        toml::from_str(text).map_err(|e| OptionsError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> OptionsResult<String> {
        toml::to_string_pretty(self).map_err(|e| OptionsError::Config(e.to_string()))
    }
}
