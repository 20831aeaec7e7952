//! Motion point types and data structures.

use serde::{Deserialize, Serialize};

/// Kind of motion a point describes, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionType {
    Rapid,
    Linear,
    Arc,
    Drill,
    Dwell,
}

impl std::fmt::Display for MotionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rapid => write!(f, "rapid"),
            Self::Linear => write!(f, "linear"),
            Self::Arc => write!(f, "arc"),
            Self::Drill => write!(f, "drill"),
            Self::Dwell => write!(f, "dwell"),
        }
    }
}

/// Arc rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcDirection {
    /// G2
    Cw,
    /// G3
    Ccw,
}

/// How an arc's geometry was given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcForm {
    /// Center offset from the start point
    Center { i: f64, j: f64, k: f64 },
    /// Radius form (negative selects the long arc)
    Radius(f64),
}

/// Arc payload: direction plus the I/J/K and/or R words that were given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcParams {
    pub direction: ArcDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub j: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
}

impl ArcParams {
    /// Arc defined by a center offset in the XY plane.
    pub fn center(direction: ArcDirection, i: f64, j: f64) -> Self {
        Self {
            direction,
            i: Some(i),
            j: Some(j),
            k: None,
            r: None,
        }
    }

    /// Arc defined by radius.
    pub fn radius(direction: ArcDirection, r: f64) -> Self {
        Self {
            direction,
            i: None,
            j: None,
            k: None,
            r: Some(r),
        }
    }

    /// Authoritative geometry. I/J/K win over R when both are present.
    pub fn center_form(&self) -> Option<ArcForm> {
        if self.i.is_some() || self.j.is_some() || self.k.is_some() {
            Some(ArcForm::Center {
                i: self.i.unwrap_or(0.0),
                j: self.j.unwrap_or(0.0),
                k: self.k.unwrap_or(0.0),
            })
        } else {
            self.r.map(ArcForm::Radius)
        }
    }

    pub fn has_geometry(&self) -> bool {
        self.center_form().is_some()
    }
}

/// Drill cycle payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrillCycle {
    /// Cycle number, 81 to 89
    pub cycle: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retract_height: Option<f64>,
    /// Dwell at the bottom, seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dwell_time: Option<f64>,
    /// Peck increment (Q word)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peck: Option<f64>,
}

impl DrillCycle {
    /// Plain G81 cycle retracting to `retract_height`.
    pub fn standard(retract_height: f64) -> Self {
        Self {
            cycle: 81,
            retract_height: Some(retract_height),
            dwell_time: None,
            peck: None,
        }
    }
}

/// Motion with its type-specific payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Motion {
    Rapid,
    Linear,
    Arc(ArcParams),
    Drill(DrillCycle),
    Dwell { seconds: f64 },
}

impl Motion {
    pub fn kind(&self) -> MotionType {
        match self {
            Motion::Rapid => MotionType::Rapid,
            Motion::Linear => MotionType::Linear,
            Motion::Arc(_) => MotionType::Arc,
            Motion::Drill(_) => MotionType::Drill,
            Motion::Dwell { .. } => MotionType::Dwell,
        }
    }
}

/// One instruction in a toolpath.
///
/// Feed and spindle are `None` when the source did not state them; consumers
/// inherit the previous value in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Rotary axis angle in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(flatten)]
    pub motion: Motion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spindle_speed: Option<f64>,
    #[serde(default)]
    pub tool_id: u32,
    /// Source line for parsed points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl MotionPoint {
    /// Creates a point with the given motion at a position.
    pub fn new(motion: Motion, x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            a: None,
            motion,
            feed_rate: None,
            spindle_speed: None,
            tool_id: 0,
            line: None,
            comment: None,
        }
    }

    pub fn rapid(x: f64, y: f64, z: f64) -> Self {
        Self::new(Motion::Rapid, x, y, z)
    }

    pub fn linear(x: f64, y: f64, z: f64) -> Self {
        Self::new(Motion::Linear, x, y, z)
    }

    pub fn arc(x: f64, y: f64, z: f64, params: ArcParams) -> Self {
        Self::new(Motion::Arc(params), x, y, z)
    }

    pub fn drill(x: f64, y: f64, z: f64, cycle: DrillCycle) -> Self {
        Self::new(Motion::Drill(cycle), x, y, z)
    }

    /// A dwell held at `position`; it never moves the tool.
    pub fn dwell(position: [f64; 3], seconds: f64) -> Self {
        Self::new(
            Motion::Dwell { seconds },
            position[0],
            position[1],
            position[2],
        )
    }

    pub fn with_feed(mut self, feed_rate: f64) -> Self {
        self.feed_rate = Some(feed_rate);
        self
    }

    pub fn with_spindle(mut self, spindle_speed: f64) -> Self {
        self.spindle_speed = Some(spindle_speed);
        self
    }

    pub fn with_tool(mut self, tool_id: u32) -> Self {
        self.tool_id = tool_id;
        self
    }

    pub fn with_a(mut self, a: f64) -> Self {
        self.a = Some(a);
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn kind(&self) -> MotionType {
        self.motion.kind()
    }

    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Moves at feed (everything except rapids and dwells).
    pub fn is_cutting(&self) -> bool {
        matches!(
            self.motion,
            Motion::Linear | Motion::Arc(_) | Motion::Drill(_)
        )
    }

    pub fn is_dwell(&self) -> bool {
        matches!(self.motion, Motion::Dwell { .. })
    }

    /// Dwell duration in seconds, if any.
    pub fn dwell_seconds(&self) -> Option<f64> {
        match self.motion {
            Motion::Dwell { seconds } => Some(seconds),
            Motion::Drill(cycle) => cycle.dwell_time,
            _ => None,
        }
    }

    pub fn distance_to(&self, other: &MotionPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn distance_2d(&self, other: &MotionPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}
