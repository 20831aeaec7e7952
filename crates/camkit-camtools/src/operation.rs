//! Machining operations
//!
//! An [`Operation`] is a tagged union of contour, pocket and drill
//! parameters. Each variant carries only the fields it uses; the shared
//! cutting data lives in [`CutSettings`]. Operations are checked when built
//! through the `Operation::*` constructors and again before generation, so a
//! value deserialized from JSON cannot bypass validation.

use serde::{Deserialize, Serialize};

use camkit_core::{Point2, Polyline2, Tool, Toolpath, WorkMaterial};

use crate::error::{CamToolResult, ParameterError, ParameterResult};

/// Safe travel height above the stock top
pub const DEFAULT_SAFE_Z: f64 = 5.0;
/// Height of the initial rapid at the start of every toolpath
pub const DEFAULT_CLEARANCE_Z: f64 = 50.0;
/// Upper bound on the number of depth passes one operation may request
pub const MAX_DEPTH_LEVELS: usize = 10_000;

/// Lead-in / lead-out move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStrategy {
    /// Along the first (or last) segment direction
    Tangent,
    /// Along the outward normal of the first (or last) segment
    Perpendicular,
    /// Away from the geometry centroid through the start (or end) point
    Radial,
    #[default]
    None,
}

/// Who applies cutter radius compensation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compensation {
    /// Offset computed here
    #[default]
    Computer,
    /// Nominal geometry emitted; controller applies G41/G42
    Control,
    /// Nominal geometry, no compensation
    None,
}

/// Pocket clearing pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PocketPattern {
    #[default]
    Zigzag,
    /// Concentric inward offset rings
    Offset,
}

/// Pocket entry move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampStrategy {
    #[default]
    Helical,
    /// Straight plunge at half feed
    Plunge,
}

/// Helical entry shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelixSettings {
    /// Depth per revolution
    pub pitch: f64,
    pub segments_per_revolution: u32,
}

impl Default for HelixSettings {
    fn default() -> Self {
        Self {
            pitch: 0.5,
            segments_per_revolution: 24,
        }
    }
}

/// Cutting data shared by every operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutSettings {
    pub tool: Tool,
    /// Units per minute
    pub feed_rate: f64,
    pub spindle_speed: f64,
    #[serde(default = "default_safe_z")]
    pub safe_z: f64,
    #[serde(default = "default_clearance_z")]
    pub clearance_z: f64,
}

fn default_safe_z() -> f64 {
    DEFAULT_SAFE_Z
}

fn default_clearance_z() -> f64 {
    DEFAULT_CLEARANCE_Z
}

impl CutSettings {
    pub fn new(tool: Tool, feed_rate: f64, spindle_speed: f64) -> Self {
        Self {
            tool,
            feed_rate,
            spindle_speed,
            safe_z: DEFAULT_SAFE_Z,
            clearance_z: DEFAULT_CLEARANCE_Z,
        }
    }

    /// Feed and speed derived from the tool's cutting data for a material
    pub fn for_material(tool: Tool, material: WorkMaterial) -> Self {
        let spindle_speed = tool.spindle_speed_for(material);
        let feed_rate = tool.feed_rate_for(material);
        Self::new(tool, feed_rate, spindle_speed)
    }

    pub fn with_safe_z(mut self, safe_z: f64) -> Self {
        self.safe_z = safe_z;
        self
    }

    pub fn with_clearance_z(mut self, clearance_z: f64) -> Self {
        self.clearance_z = clearance_z;
        self
    }

    pub fn tool_radius(&self) -> f64 {
        self.tool.radius()
    }

    fn validate(&self) -> ParameterResult<()> {
        if !self.tool.diameter.is_finite() || self.tool.diameter <= 0.0 {
            return Err(ParameterError::invalid(
                "tool.diameter",
                format!("must be positive, got {}", self.tool.diameter),
            ));
        }
        positive("feed_rate", self.feed_rate)?;
        positive("spindle_speed", self.spindle_speed)?;
        finite("safe_z", self.safe_z)?;
        finite("clearance_z", self.clearance_z)
    }
}

/// Profile cut along a polyline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourOp {
    pub cut: CutSettings,
    pub geometry: Polyline2,
    /// Final depth, zero or negative
    pub depth: f64,
    pub step_down: f64,
    #[serde(default)]
    pub lead_in: LeadStrategy,
    #[serde(default)]
    pub lead_out: LeadStrategy,
    #[serde(default = "default_climb")]
    pub climb: bool,
    #[serde(default)]
    pub compensation: Compensation,
    #[serde(default)]
    pub stock_to_leave: f64,
}

fn default_climb() -> bool {
    true
}

impl ContourOp {
    pub fn new(cut: CutSettings, geometry: Polyline2, depth: f64, step_down: f64) -> Self {
        Self {
            cut,
            geometry,
            depth,
            step_down,
            lead_in: LeadStrategy::None,
            lead_out: LeadStrategy::None,
            climb: true,
            compensation: Compensation::Computer,
            stock_to_leave: 0.0,
        }
    }

    pub fn with_leads(mut self, lead_in: LeadStrategy, lead_out: LeadStrategy) -> Self {
        self.lead_in = lead_in;
        self.lead_out = lead_out;
        self
    }

    pub fn with_climb(mut self, climb: bool) -> Self {
        self.climb = climb;
        self
    }

    pub fn with_compensation(mut self, compensation: Compensation) -> Self {
        self.compensation = compensation;
        self
    }

    pub fn with_stock_to_leave(mut self, stock: f64) -> Self {
        self.stock_to_leave = stock;
        self
    }

    fn validate(&self) -> ParameterResult<()> {
        self.cut.validate()?;
        depth_and_step("depth", self.depth, self.step_down)?;
        non_negative("stock_to_leave", self.stock_to_leave)?;
        let needed = if self.geometry.closed { 3 } else { 2 };
        polyline(&self.geometry, needed)
    }
}

/// Area clearing inside a closed boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PocketOp {
    pub cut: CutSettings,
    pub boundary: Polyline2,
    pub depth: f64,
    pub step_down: f64,
    /// Fraction of the tool diameter, in (0, 1]
    pub step_over: f64,
    #[serde(default)]
    pub pattern: PocketPattern,
    #[serde(default)]
    pub ramp: RampStrategy,
    #[serde(default)]
    pub helix: HelixSettings,
    #[serde(default)]
    pub stock_to_leave: f64,
}

impl PocketOp {
    pub fn new(
        cut: CutSettings,
        boundary: Polyline2,
        depth: f64,
        step_down: f64,
        step_over: f64,
    ) -> Self {
        Self {
            cut,
            boundary,
            depth,
            step_down,
            step_over,
            pattern: PocketPattern::Zigzag,
            ramp: RampStrategy::Helical,
            helix: HelixSettings::default(),
            stock_to_leave: 0.0,
        }
    }

    pub fn with_pattern(mut self, pattern: PocketPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_ramp(mut self, ramp: RampStrategy) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn with_helix(mut self, helix: HelixSettings) -> Self {
        self.helix = helix;
        self
    }

    pub fn with_stock_to_leave(mut self, stock: f64) -> Self {
        self.stock_to_leave = stock;
        self
    }

    /// Distance between adjacent clearing passes
    pub fn step_distance(&self) -> f64 {
        self.cut.tool.diameter * self.step_over
    }

    fn validate(&self) -> ParameterResult<()> {
        self.cut.validate()?;
        depth_and_step("depth", self.depth, self.step_down)?;
        if !(self.step_over > 0.0 && self.step_over <= 1.0) {
            return Err(ParameterError::OutOfRange {
                name: "step_over".to_string(),
                value: self.step_over,
                min: 0.0,
                max: 1.0,
            });
        }
        non_negative("stock_to_leave", self.stock_to_leave)?;
        positive("helix.pitch", self.helix.pitch)?;
        if self.helix.segments_per_revolution < 3 {
            return Err(ParameterError::invalid(
                "helix.segments_per_revolution",
                "must be at least 3",
            ));
        }
        if !self.boundary.closed {
            return Err(ParameterError::InvalidGeometry(
                "pocket boundary must be closed".to_string(),
            ));
        }
        polyline(&self.boundary, 3)
    }
}

/// Holes at a set of XY targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillOp {
    pub cut: CutSettings,
    pub points: Vec<Point2>,
    pub depth: f64,
    /// Zero drills in one plunge
    #[serde(default)]
    pub peck_depth: f64,
    /// Height above each hole for travel between holes
    pub clearance: f64,
    /// Height to retract to after each peck
    pub retract: f64,
    /// Seconds at the bottom of each hole
    #[serde(default)]
    pub dwell: f64,
}

impl DrillOp {
    pub fn new(cut: CutSettings, points: Vec<Point2>, depth: f64) -> Self {
        Self {
            cut,
            points,
            depth,
            peck_depth: 0.0,
            clearance: DEFAULT_SAFE_Z,
            retract: 1.0,
            dwell: 0.0,
        }
    }

    pub fn with_peck(mut self, peck_depth: f64) -> Self {
        self.peck_depth = peck_depth;
        self
    }

    pub fn with_heights(mut self, clearance: f64, retract: f64) -> Self {
        self.clearance = clearance;
        self.retract = retract;
        self
    }

    pub fn with_dwell(mut self, seconds: f64) -> Self {
        self.dwell = seconds;
        self
    }

    fn validate(&self) -> ParameterResult<()> {
        self.cut.validate()?;
        non_positive("depth", self.depth)?;
        non_negative("peck_depth", self.peck_depth)?;
        if self.peck_depth > 0.0 && self.depth / self.peck_depth < -(MAX_DEPTH_LEVELS as f64) {
            return Err(ParameterError::invalid(
                "peck_depth",
                format!("more than {} pecks per hole", MAX_DEPTH_LEVELS),
            ));
        }
        finite("clearance", self.clearance)?;
        finite("retract", self.retract)?;
        non_negative("dwell", self.dwell)?;
        if self.points.is_empty() {
            return Err(ParameterError::Missing("points".to_string()));
        }
        if let Some(bad) = self.points.iter().position(|p| !p.is_finite()) {
            return Err(ParameterError::InvalidGeometry(format!(
                "drill point {} is not finite",
                bad
            )));
        }
        Ok(())
    }
}

/// A machining operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Contour(ContourOp),
    Pocket(PocketOp),
    Drill(DrillOp),
}

impl Operation {
    pub fn contour(op: ContourOp) -> CamToolResult<Self> {
        op.validate()?;
        Ok(Self::Contour(op))
    }

    pub fn pocket(op: PocketOp) -> CamToolResult<Self> {
        op.validate()?;
        Ok(Self::Pocket(op))
    }

    pub fn drill(op: DrillOp) -> CamToolResult<Self> {
        op.validate()?;
        Ok(Self::Drill(op))
    }

    /// Check every parameter against its allowed range
    pub fn validate(&self) -> CamToolResult<()> {
        match self {
            Self::Contour(op) => op.validate()?,
            Self::Pocket(op) => op.validate()?,
            Self::Drill(op) => op.validate()?,
        }
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Contour(_) => "contour",
            Self::Pocket(_) => "pocket",
            Self::Drill(_) => "drill",
        }
    }

    pub fn cut(&self) -> &CutSettings {
        match self {
            Self::Contour(op) => &op.cut,
            Self::Pocket(op) => &op.cut,
            Self::Drill(op) => &op.cut,
        }
    }

    pub fn tool(&self) -> &Tool {
        &self.cut().tool
    }

    /// Final cutting depth
    pub fn depth(&self) -> f64 {
        match self {
            Self::Contour(op) => op.depth,
            Self::Pocket(op) => op.depth,
            Self::Drill(op) => op.depth,
        }
    }
}

/// An operation together with its most recently generated toolpath
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub operation: Operation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolpath: Option<Toolpath>,
}

impl Job {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            toolpath: None,
        }
    }

    /// Generate the toolpath, replacing any previous result
    ///
    /// On failure the previous toolpath is cleared.
    pub fn generate_toolpath(&mut self) -> CamToolResult<&Toolpath> {
        self.toolpath = None;
        let toolpath = crate::generator::generate(&self.operation)?;
        Ok(self.toolpath.insert(toolpath))
    }

    pub fn toolpath(&self) -> Option<&Toolpath> {
        self.toolpath.as_ref()
    }
}

fn finite(name: &str, value: f64) -> ParameterResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::invalid(name, format!("must be finite, got {}", value)))
    }
}

fn positive(name: &str, value: f64) -> ParameterResult<()> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::invalid(name, format!("must be positive, got {}", value)))
    }
}

fn non_negative(name: &str, value: f64) -> ParameterResult<()> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ParameterError::invalid(name, format!("cannot be negative, got {}", value)))
    }
}

fn non_positive(name: &str, value: f64) -> ParameterResult<()> {
    finite(name, value)?;
    if value <= 0.0 {
        Ok(())
    } else {
        Err(ParameterError::invalid(
            name,
            format!("must be zero or below the stock top, got {}", value),
        ))
    }
}

fn depth_and_step(name: &str, depth: f64, step_down: f64) -> ParameterResult<()> {
    non_positive(name, depth)?;
    positive("step_down", step_down)?;
    if -depth / step_down > MAX_DEPTH_LEVELS as f64 {
        return Err(ParameterError::invalid(
            "step_down",
            format!("more than {} depth passes", MAX_DEPTH_LEVELS),
        ));
    }
    Ok(())
}

fn polyline(geometry: &Polyline2, min_points: usize) -> ParameterResult<()> {
    if geometry.len() < min_points {
        return Err(ParameterError::InvalidGeometry(format!(
            "need at least {} points, got {}",
            min_points,
            geometry.len()
        )));
    }
    if let Some(bad) = geometry.points.iter().position(|p| !p.is_finite()) {
        return Err(ParameterError::InvalidGeometry(format!(
            "point {} is not finite",
            bad
        )));
    }
    Ok(())
}
