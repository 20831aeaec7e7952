//! Machine envelope used by toolpath verification and G-code validation.

use serde::{Deserialize, Serialize};

/// Travel and rate limits of the target machine
///
/// Travel is the full axis length in program units. Checks that assume a
/// centred work origin use half of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineLimits {
    pub x_travel: f64,
    pub y_travel: f64,
    pub z_travel: f64,
    /// Units per minute
    pub max_feed_rate: f64,
    /// Revolutions per minute
    pub max_spindle_speed: f64,
}

impl Default for MachineLimits {
    fn default() -> Self {
        Self {
            x_travel: 500.0,
            y_travel: 400.0,
            z_travel: 300.0,
            max_feed_rate: 10000.0,
            max_spindle_speed: 10000.0,
        }
    }
}

impl MachineLimits {
    /// Travel for an axis letter, `None` for axes without a limit
    pub fn travel(&self, axis: char) -> Option<f64> {
        match axis.to_ascii_uppercase() {
            'X' => Some(self.x_travel),
            'Y' => Some(self.y_travel),
            'Z' => Some(self.z_travel),
            _ => None,
        }
    }

    /// Names of fields that are not positive finite numbers
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        [
            ("x_travel", self.x_travel),
            ("y_travel", self.y_travel),
            ("z_travel", self.z_travel),
            ("max_feed_rate", self.max_feed_rate),
            ("max_spindle_speed", self.max_spindle_speed),
        ]
        .into_iter()
        .filter(|(_, v)| !(v.is_finite() && *v > 0.0))
        .map(|(name, _)| name)
        .collect()
    }
}
