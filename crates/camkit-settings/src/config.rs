//! Configuration for CamKit
//!
//! Provides configuration file handling and validation. Files are JSON or
//! TOML, chosen by extension.
//!
//! Configuration is organized into logical sections:
//! - Machine limits (travel, feed and spindle maxima)
//! - Post-processor preferences (dialect, decimal places, units)
//! - CAM defaults (retract heights, helical entry)

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use camkit_core::{MachineLimits, Units};

use crate::error::{SettingsError, SettingsResult};

/// On-disk configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format implied by a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(SettingsError::UnsupportedFormat(format!(
                "'{}' (config file must be .json or .toml)",
                path.display()
            ))),
        }
    }
}

/// Post-processor preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostSettings {
    /// Dialect id used when none is requested
    pub default_dialect: String,
    /// Overrides the dialect's decimal places
    pub decimals: Option<usize>,
    pub units: Units,
}

impl Default for PostSettings {
    fn default() -> Self {
        Self {
            default_dialect: "generic_3axis".to_string(),
            decimals: None,
            units: Units::Millimeters,
        }
    }
}

/// Defaults applied to newly created operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CamDefaults {
    /// Retract height between passes
    pub safe_z: f64,
    /// Height for travel between features
    pub clearance_z: f64,
    /// Helical entry depth per revolution
    pub helix_pitch: f64,
    pub segments_per_revolution: u32,
}

impl Default for CamDefaults {
    fn default() -> Self {
        Self {
            safe_z: 5.0,
            clearance_z: 50.0,
            helix_pitch: 0.5,
            segments_per_revolution: 24,
        }
    }
}

/// Complete CamKit configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub machine: MachineLimits,
    pub post: PostSettings,
    pub cam: CamDefaults,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        let config = Self::from_str_as(&content, format)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        let format = ConfigFormat::from_path(path)?;
        let content = self.to_string_as(format)?;
        fs::write(path, content)?;
        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Parse and validate configuration text
    pub fn from_str_as(content: &str, format: ConfigFormat) -> SettingsResult<Self> {
        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate and serialize
    pub fn to_string_as(&self, format: ConfigFormat) -> SettingsResult<String> {
        self.validate()?;
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };
        Ok(content)
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if let Some(field) = self.machine.invalid_fields().first() {
            return Err(SettingsError::invalid(
                format!("machine.{}", field),
                "must be a positive number",
            ));
        }

        if self.post.default_dialect.trim().is_empty() {
            return Err(SettingsError::invalid(
                "post.default_dialect",
                "must not be empty",
            ));
        }
        if self.post.decimals.is_some_and(|d| d > 6) {
            return Err(SettingsError::invalid("post.decimals", "must be at most 6"));
        }

        let cam = &self.cam;
        if !cam.safe_z.is_finite() || !cam.clearance_z.is_finite() {
            return Err(SettingsError::invalid("cam", "heights must be finite"));
        }
        if cam.clearance_z < cam.safe_z {
            return Err(SettingsError::invalid(
                "cam.clearance_z",
                "must not be below safe_z",
            ));
        }
        if !(cam.helix_pitch.is_finite() && cam.helix_pitch > 0.0) {
            return Err(SettingsError::invalid("cam.helix_pitch", "must be > 0"));
        }
        if cam.segments_per_revolution < 3 {
            return Err(SettingsError::invalid(
                "cam.segments_per_revolution",
                "must be at least 3",
            ));
        }

        debug!("Configuration is valid");
        Ok(())
    }
}
