//! Persistent panel configuration
//!
//! Stored as pretty-printed JSON in the user's config directory. Missing
//! fields take their defaults, so older files keep loading.

use crate::controller::DeviceId;
use crate::render::UiGeneration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors reading or writing the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("config file I/O failed for {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The file is not valid configuration JSON
    #[error("invalid config file {path}: {source}")]
    Json {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// No per-user config directory on this platform
    #[error("could not find a config directory")]
    NoConfigDir,
}

/// Where and how to reach the gateway device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Controller address, e.g. `http://192.168.1.10:3480`
    pub base_url: String,

    /// Gateway plugin device number
    pub device: DeviceId,

    /// Controller UI generation to render for
    pub generation: UiGeneration,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Monitor refresh interval in milliseconds; the generation's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_ms: Option<u64>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3480".to_string(),
            device: DeviceId(1),
            generation: UiGeneration::Ui7,
            timeout_ms: 5000,
            refresh_ms: None,
        }
    }
}

impl PanelConfig {
    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("otgw-panel").join("config.json"))
    }

    /// Load from `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, or the defaults when the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save to `path`, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(io_err)
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Monitor refresh interval, honouring the override
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.generation.refresh_interval())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let config: PanelConfig = serde_json::from_str(r#"{"device": 42}"#).unwrap();
        assert_eq!(config.device, DeviceId(42));
        assert_eq!(config.generation, UiGeneration::Ui7);
        assert_eq!(config.refresh_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_refresh_override() {
        let config = PanelConfig {
            generation: UiGeneration::Ui5,
            refresh_ms: Some(250),
            ..PanelConfig::default()
        };
        assert_eq!(config.refresh_interval(), Duration::from_millis(250));
    }
}
