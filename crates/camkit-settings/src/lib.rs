//! CamKit Settings Crate
//!
//! Machine limits, post-processor preferences and CAM defaults, loaded from
//! and saved to JSON or TOML files.

pub mod config;
pub mod error;

pub use config::{CamDefaults, Config, ConfigFormat, PostSettings};
pub use error::{SettingsError, SettingsResult};
