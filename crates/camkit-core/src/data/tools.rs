//! Cutting tool descriptors and the tool library
//!
//! This module provides:
//! - Tool kinds and tool materials
//! - Spindle speed and feed rate derivation from cutting data
//! - Step-down / step-over recommendations per tool kind
//! - The standard tool library

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;

use super::materials::WorkMaterial;
use crate::error::ToolError;

/// Tool kinds for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Flat end mill
    EndMill,
    /// Ball end mill
    BallNose,
    /// Twist drill
    Drill,
    /// V-bit engraving tool
    VBit,
    /// Face mill
    FaceMill,
}

impl ToolKind {
    /// Recommended (step_down, step_over) as multiples of the diameter
    fn step_factors(&self) -> (f64, f64) {
        match self {
            Self::EndMill => (0.5, 0.4),
            Self::BallNose => (0.3, 0.2),
            Self::Drill => (2.0, 0.4),
            Self::FaceMill => (0.1, 0.6),
            Self::VBit => (0.2, 0.1),
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndMill => write!(f, "End Mill"),
            Self::BallNose => write!(f, "Ball Nose"),
            Self::Drill => write!(f, "Drill"),
            Self::VBit => write!(f, "V-Bit"),
            Self::FaceMill => write!(f, "Face Mill"),
        }
    }
}

/// Tool material composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMaterial {
    /// High Speed Steel
    HSS,
    /// Carbide
    #[default]
    Carbide,
}

impl std::fmt::Display for ToolMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HSS => write!(f, "HSS"),
            Self::Carbide => write!(f, "Carbide"),
        }
    }
}

/// Immutable cutting tool descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool number used in `T` words
    pub id: u32,
    pub kind: ToolKind,
    /// Cutting diameter in mm
    pub diameter: f64,
    /// Number of flutes (inserts for face mills)
    pub flutes: u32,
    pub material: ToolMaterial,
    /// Nominal surface speed in m/min
    pub surface_speed: f64,
    /// Chip load per tooth in mm
    pub feed_per_tooth: f64,
    pub description: String,
}

impl Tool {
    /// Create a tool with default cutting data (100 m/min, 0.1 mm/tooth)
    pub fn new(id: u32, kind: ToolKind, diameter: f64, flutes: u32) -> Result<Self, ToolError> {
        Self::with_cutting_data(id, kind, diameter, flutes, 100.0, 0.1)
    }

    /// Create a tool with explicit cutting data
    pub fn with_cutting_data(
        id: u32,
        kind: ToolKind,
        diameter: f64,
        flutes: u32,
        surface_speed: f64,
        feed_per_tooth: f64,
    ) -> Result<Self, ToolError> {
        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(ToolError::InvalidDiameter(diameter));
        }
        if flutes == 0 {
            return Err(ToolError::NoFlutes);
        }
        if !surface_speed.is_finite() || surface_speed <= 0.0 {
            return Err(ToolError::InvalidCuttingData {
                name: "surface_speed".to_string(),
                reason: format!("must be positive, got {}", surface_speed),
            });
        }
        if !feed_per_tooth.is_finite() || feed_per_tooth <= 0.0 {
            return Err(ToolError::InvalidCuttingData {
                name: "feed_per_tooth".to_string(),
                reason: format!("must be positive, got {}", feed_per_tooth),
            });
        }

        Ok(Self {
            id,
            kind,
            diameter,
            flutes,
            material: ToolMaterial::Carbide,
            surface_speed,
            feed_per_tooth,
            description: format!("{}mm {}", diameter, kind),
        })
    }

    pub fn with_material(mut self, material: ToolMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// RPM = surface speed x material factor x 1000 / (pi x diameter), rounded
    pub fn spindle_speed_for(&self, material: WorkMaterial) -> f64 {
        let adjusted = self.surface_speed * material.speed_factor();
        ((adjusted * 1000.0) / (PI * self.diameter)).round()
    }

    /// Feed (mm/min) = RPM x flutes x feed per tooth, rounded
    pub fn feed_rate_for(&self, material: WorkMaterial) -> f64 {
        let rpm = self.spindle_speed_for(material);
        (rpm * self.flutes as f64 * self.feed_per_tooth).round()
    }

    /// Recommended depth per pass in mm
    pub fn recommended_step_down(&self) -> f64 {
        self.diameter * self.kind.step_factors().0
    }

    /// Recommended lateral step in mm
    pub fn recommended_step_over(&self) -> f64 {
        self.diameter * self.kind.step_factors().1
    }

    /// Get a descriptive string for the tool
    pub fn description_short(&self) -> String {
        format!(
            "T{} {} - {}mm, {} flutes",
            self.id, self.description, self.diameter, self.flutes
        )
    }
}

/// Tool library keyed by tool number
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolLibrary {
    tools: BTreeMap<u32, Tool>,
}

impl ToolLibrary {
    /// Create a new empty tool library
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding the stock end mills, ball nose, drills, face mill and v-bit
    pub fn standard() -> Self {
        let specs: [(u32, ToolKind, f64, u32, ToolMaterial, f64, f64, &str); 8] = [
            (1, ToolKind::EndMill, 3.175, 2, ToolMaterial::Carbide, 150.0, 0.05, "1/8\" 2-Flute End Mill"),
            (2, ToolKind::EndMill, 6.0, 3, ToolMaterial::Carbide, 120.0, 0.08, "6mm 3-Flute End Mill"),
            (3, ToolKind::EndMill, 10.0, 4, ToolMaterial::Carbide, 100.0, 0.1, "10mm 4-Flute End Mill"),
            (4, ToolKind::BallNose, 6.0, 2, ToolMaterial::Carbide, 120.0, 0.06, "6mm Ball Nose"),
            (5, ToolKind::Drill, 3.0, 1, ToolMaterial::HSS, 30.0, 0.1, "3mm Drill Bit"),
            (6, ToolKind::Drill, 6.0, 1, ToolMaterial::HSS, 25.0, 0.15, "6mm Drill Bit"),
            (7, ToolKind::FaceMill, 25.0, 3, ToolMaterial::Carbide, 200.0, 0.1, "25mm Face Mill"),
            (8, ToolKind::VBit, 6.0, 1, ToolMaterial::Carbide, 100.0, 0.05, "90 deg V-Bit"),
        ];

        let mut library = Self::new();
        for (id, kind, diameter, flutes, material, speed, fpt, description) in specs {
            if let Ok(tool) = Tool::with_cutting_data(id, kind, diameter, flutes, speed, fpt) {
                library.add_tool(tool.with_material(material).with_description(description));
            }
        }
        library
    }

    /// Add a tool, replacing any tool with the same number
    pub fn add_tool(&mut self, tool: Tool) -> Option<Tool> {
        self.tools.insert(tool.id, tool)
    }

    /// Get a tool by number
    pub fn get_tool(&self, id: u32) -> Option<&Tool> {
        self.tools.get(&id)
    }

    /// Remove a tool from the library
    pub fn remove_tool(&mut self, id: u32) -> Option<Tool> {
        self.tools.remove(&id)
    }

    /// All tools ordered by number
    pub fn tools(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    /// Get tools by kind
    pub fn get_tools_by_kind(&self, kind: ToolKind) -> Vec<&Tool> {
        self.tools.values().filter(|t| t.kind == kind).collect()
    }

    /// Search tools by diameter range
    pub fn search_by_diameter(&self, min: f64, max: f64) -> Vec<&Tool> {
        self.tools
            .values()
            .filter(|t| t.diameter >= min && t.diameter <= max)
            .collect()
    }

    /// Get the next available tool number
    pub fn next_tool_number(&self) -> u32 {
        self.tools.keys().next_back().map_or(1, |last| last + 1)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
