//! Config file handling
//!
//! The config lives at `<config dir>/field-sketch/config.ron` unless
//! `FIELD_SKETCH_CONFIG` points somewhere else. A missing file yields the
//! defaults and can be written out on first run; an unreadable file also
//! yields the defaults but is never overwritten.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use super::AppConfig;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "FIELD_SKETCH_CONFIG";

/// Shared configuration manager type
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Cannot access {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Cannot encode config: {0}")]
    Serialize(String),

    #[error("Invalid config in {path:?}: {message}")]
    Deserialize { path: PathBuf, message: String },
}

/// Where the active config came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from the config file
    File,
    /// No file yet; defaults in use
    Missing,
    /// The file exists but could not be read or parsed; defaults in use
    Unreadable,
}

pub struct ConfigManager {
    config: AppConfig,
    config_path: PathBuf,
    origin: ConfigOrigin,
}

impl ConfigManager {
    /// Load from the environment override or the OS config directory
    pub fn new() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_config_path);
        Self::with_path(path)
    }

    /// Load from a specific file
    pub fn with_path(config_path: PathBuf) -> Self {
        let (config, origin) = match Self::load_from_path(&config_path) {
            Ok(Some(config)) => (config, ConfigOrigin::File),
            Ok(None) => {
                tracing::info!("No config at {:?}, using defaults", config_path);
                (AppConfig::new(), ConfigOrigin::Missing)
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                (AppConfig::new(), ConfigOrigin::Unreadable)
            }
        };

        Self {
            config,
            config_path,
            origin,
        }
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("field-sketch")
            .join("config.ron")
    }

    fn load_from_path(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };
        let config: AppConfig = ron::from_str(&content).map_err(|e| ConfigError::Deserialize {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if config.version != AppConfig::CURRENT_VERSION {
            tracing::warn!(
                "Config {:?} has version {}, expected {}",
                path,
                config.version,
                AppConfig::CURRENT_VERSION
            );
        }
        tracing::info!("Loaded config from {:?}", path);
        Ok(Some(config))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn origin(&self) -> ConfigOrigin {
        self.origin
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }

    /// Write the active config to the config file
    pub fn save(&mut self) -> Result<(), ConfigError> {
        let io_error = |e: std::io::Error| ConfigError::Io {
            path: self.config_path.clone(),
            message: e.to_string(),
        };
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(&self.config_path, content).map_err(io_error)?;

        tracing::info!("Wrote config to {:?}", self.config_path);
        self.origin = ConfigOrigin::File;
        Ok(())
    }

    /// Write the defaults out if no config file exists yet
    ///
    /// Returns whether a file was written. An unreadable file is left alone.
    pub fn write_defaults_if_missing(&mut self) -> Result<bool, ConfigError> {
        if self.origin != ConfigOrigin::Missing {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a new shared configuration manager
pub fn create_shared_config() -> SharedConfig {
    Arc::new(RwLock::new(ConfigManager::new()))
}
