//! Application configuration module
//!
//! This module handles application-wide configuration: where fields are
//! persisted and how the map surface is framed initially.

mod manager;

pub use manager::{
    CONFIG_PATH_ENV, ConfigError, ConfigManager, ConfigOrigin, SharedConfig, create_shared_config,
};

use field_core::DisplayPoint;
use serde::{Deserialize, Serialize};

/// Persistence backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Keep fields in process memory
    #[default]
    Memory,
    /// Talk to the field service over HTTP
    Http,
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistenceConfig {
    /// Which backend to use
    pub backend: StoreBackend,
    /// Base URL of the field service API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Initial map framing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapConfig {
    /// Map center in display order (latitude, longitude)
    pub center: DisplayPoint,
    /// Initial zoom level
    pub zoom: u8,
    /// Tile URL template handed to the map surface
    pub tile_url: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: DisplayPoint::new(55.7558, 37.6176),
            zoom: 10,
            tile_url: "https://mt1.google.com/vt/lyrs=y&x={x}&y={y}&z={z}".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    /// Persistence settings
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Map settings
    #[serde(default)]
    pub map: MapConfig,
}

impl AppConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = ron::from_str(
            r#"(
                version: 1,
                persistence: (backend: Http, base_url: "http://fields.local/api", timeout_secs: 3),
            )"#,
        )
        .unwrap();

        assert_eq!(config.persistence.backend, StoreBackend::Http);
        assert_eq!(config.persistence.timeout_secs, 3);
        assert_eq!(config.map, MapConfig::default());
    }

    #[test]
    fn test_round_trip_through_ron() {
        let mut config = AppConfig::new();
        config.map.zoom = 14;
        config.map.center = DisplayPoint::new(54.98, 73.37);

        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let back: AppConfig = ron::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
