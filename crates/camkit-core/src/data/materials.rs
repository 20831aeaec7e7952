//! Workpiece materials
//!
//! Each stock material scales a tool's nominal surface speed by a fixed
//! factor when deriving spindle speed and feed rate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stock material being cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMaterial {
    Aluminum,
    Brass,
    Plastic,
    Wood,
    Steel,
    Stainless,
    Titanium,
    /// Anything without a specific entry; cuts at nominal speed
    #[default]
    Other,
}

impl WorkMaterial {
    /// Get all materials
    pub fn all() -> &'static [WorkMaterial] {
        &[
            WorkMaterial::Aluminum,
            WorkMaterial::Brass,
            WorkMaterial::Plastic,
            WorkMaterial::Wood,
            WorkMaterial::Steel,
            WorkMaterial::Stainless,
            WorkMaterial::Titanium,
            WorkMaterial::Other,
        ]
    }

    /// Surface speed multiplier for this material
    pub fn speed_factor(&self) -> f64 {
        match self {
            Self::Aluminum => 1.2,
            Self::Brass => 1.1,
            Self::Plastic => 1.3,
            Self::Wood => 1.5,
            Self::Steel => 0.8,
            Self::Stainless => 0.7,
            Self::Titanium => 0.6,
            Self::Other => 1.0,
        }
    }

    /// Lookup by name; unknown names map to [`WorkMaterial::Other`]
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Self::Other)
    }
}

impl fmt::Display for WorkMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aluminum => write!(f, "aluminum"),
            Self::Brass => write!(f, "brass"),
            Self::Plastic => write!(f, "plastic"),
            Self::Wood => write!(f, "wood"),
            Self::Steel => write!(f, "steel"),
            Self::Stainless => write!(f, "stainless"),
            Self::Titanium => write!(f, "titanium"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl FromStr for WorkMaterial {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aluminum" | "aluminium" => Ok(Self::Aluminum),
            "brass" => Ok(Self::Brass),
            "plastic" => Ok(Self::Plastic),
            "wood" => Ok(Self::Wood),
            "steel" => Ok(Self::Steel),
            "stainless" => Ok(Self::Stainless),
            "titanium" => Ok(Self::Titanium),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown material: {}", s)),
        }
    }
}
