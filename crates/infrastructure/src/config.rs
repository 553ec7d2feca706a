//! Application configuration
//!
//! Aggregates the per-integration config structs and loads them from an
//! optional TOML file. Every field has a serde default, so an empty file
//! (or no file at all) yields a working configuration for the default
//! Manchester service area.

use std::path::Path;

use integration_geocoding::GeocodingConfig;
use integration_routing::RoutingConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The configuration contents are invalid
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Geocoding provider settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Routing backend settings
    #[serde(default)]
    pub routing: RoutingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, deserialized, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;

        let app: Self = settings.try_deserialize()?;
        app.validate().map_err(ConfigError::Invalid)?;

        info!(path = %path.display(), "Configuration loaded");
        Ok(app)
    }

    /// Validate all sections
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.geocoding.validate()?;
        self.routing.validate()
    }
}
