//! Session configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid
//! configuration:
//!
//! ```toml
//! app_key = "abc 123"      # whitespace is stripped
//! auto_connect = true
//! logging = false
//!
//! [spatial]
//! enabled = true
//! radius = 10.0
//! minimal_hear_radius = 1.0
//! curve = [{ time = 0.0, value = 0.0 }, { time = 1.0, value = 1.0 }]
//!
//! [video]
//! row_order = "bottom_up"
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Deserializer};

use crate::{error::ConfigError, spatial::SpatialAudioConfig, video::RowOrder};

/// Video frame settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Row layout recorded on allocated frame buffers.
    pub row_order: RowOrder,
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Application credential sent with `connect`.
    #[serde(deserialize_with = "strip_whitespace")]
    pub app_key: String,
    /// Connect as soon as the signaling server is reached.
    pub auto_connect: bool,
    /// Log raw notifications and dropped inputs.
    pub logging: bool,
    /// Spatial audio settings.
    pub spatial: SpatialAudioConfig,
    /// Video settings.
    pub video: VideoConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            app_key: String::new(),
            auto_connect: true,
            logging: false,
            spatial: SpatialAudioConfig::default(),
            video: VideoConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Replace the app key, stripping all whitespace.
    #[must_use]
    pub fn with_app_key(mut self, app_key: &str) -> Self {
        self.app_key = remove_whitespace(app_key);
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Check value ranges the type system does not enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let spatial = &self.spatial;

        if !spatial.radius.is_finite() || spatial.radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spatial.radius must be positive, got {}",
                spatial.radius
            )));
        }

        if !spatial.minimal_hear_radius.is_finite() || spatial.minimal_hear_radius < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spatial.minimal_hear_radius must be non-negative, got {}",
                spatial.minimal_hear_radius
            )));
        }

        Ok(())
    }
}

fn remove_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

fn strip_whitespace<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(remove_whitespace(&raw))
}
