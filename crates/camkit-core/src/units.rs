//! Program units
//!
//! G-code programs declare their units with G20 (inch) or G21 (mm). Units are
//! tracked, never silently converted; these helpers convert explicitly when a
//! caller asks for it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Length units of a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Millimeters (G21)
    #[default]
    #[serde(alias = "mm")]
    Millimeters,
    /// Inches (G20)
    #[serde(alias = "inch")]
    Inches,
}

impl Units {
    /// Units selected by a G-code number, if it is G20 or G21
    pub fn from_gcode(code: u32) -> Option<Self> {
        match code {
            20 => Some(Self::Inches),
            21 => Some(Self::Millimeters),
            _ => None,
        }
    }

    /// Units selected by the MCAM header flag (0 mm, 1 inch)
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            0 => Some(Self::Millimeters),
            1 => Some(Self::Inches),
            _ => None,
        }
    }

    /// The G-code word that selects these units
    pub fn gcode(&self) -> &'static str {
        match self {
            Self::Millimeters => "G21",
            Self::Inches => "G20",
        }
    }

    /// Short unit label ("mm" or "in")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Millimeters => "mm",
            Self::Inches => "in",
        }
    }

    /// Convert a length expressed in these units to millimeters
    pub fn to_mm(&self, value: f64) -> f64 {
        match self {
            Self::Millimeters => value,
            Self::Inches => value * MM_PER_INCH,
        }
    }

    /// Convert a length from these units into `target` units
    pub fn convert(&self, value: f64, target: Units) -> f64 {
        match (self, target) {
            (Self::Millimeters, Self::Inches) => value / MM_PER_INCH,
            (Self::Inches, Self::Millimeters) => value * MM_PER_INCH,
            _ => value,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millimeters => write!(f, "mm"),
            Self::Inches => write!(f, "inch"),
        }
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeters" | "metric" | "g21" => Ok(Self::Millimeters),
            "in" | "inch" | "inches" | "imperial" | "g20" => Ok(Self::Inches),
            _ => Err(format!("Unknown units: {}", s)),
        }
    }
}

/// Format a length for display with three decimals and the unit label
pub fn format_length(value: f64, units: Units) -> String {
    format!("{:.3} {}", value, units.label())
}

/// Format a feed rate in units per minute
pub fn format_feed_rate(value: f64, units: Units) -> String {
    format!("{:.1} {}/min", value, units.label())
}
