//! Modal state tracking
//!
//! Modal groups are persistent states that affect all subsequent commands
//! until changed by another code in the same group.

use serde::{Deserialize, Serialize};

use camkit_core::Units;

use super::command::Code;

/// Modal groups a code can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalGroup {
    Motion,
    Plane,
    Units,
    Distance,
    FeedMode,
    WorkOffset,
    CutterComp,
    Spindle,
    Coolant,
}

/// Active value of every modal group
///
/// Each field holds the code number of the active member, e.g. `motion_mode`
/// is `1` after a `G1` and `spindle` is `3` after an `M3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalState {
    /// Motion (G0, G1, G2, G3, G80-G89)
    pub motion_mode: u8,

    /// Plane selection (G17=XY, G18=XZ, G19=YZ)
    pub plane_mode: u8,

    /// Units (G20=inches, G21=millimeters)
    pub units_mode: u8,

    /// Distance mode (G90=absolute, G91=incremental)
    pub distance_mode: u8,

    /// Feed rate mode (G93=inverse_time, G94=units_per_minute, G95=units_per_revolution)
    pub feed_rate_mode: u8,

    /// Coordinate system (G54-G59)
    pub coordinate_system: u8,

    /// Cutter compensation (G40=off, G41=left, G42=right)
    pub compensation_mode: u8,

    /// Spindle (M3=cw, M4=ccw, M5=stop)
    pub spindle: u8,

    /// Coolant (M7=mist, M8=flood, M9=off)
    pub coolant: u8,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            motion_mode: 0,        // G0 (rapid)
            plane_mode: 17,        // G17 (XY plane)
            units_mode: 21,        // G21 (millimeters)
            distance_mode: 90,     // G90 (absolute)
            feed_rate_mode: 94,    // G94 (units per minute)
            coordinate_system: 54, // G54 (first WCS)
            compensation_mode: 40, // G40 (cutter compensation off)
            spindle: 5,            // M5 (stopped)
            coolant: 9,            // M9 (off)
        }
    }
}

impl ModalState {
    /// Create a modal state with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `code` belongs to any modal group
    pub fn is_modal(code: &Code) -> bool {
        Self::group_of(code).is_some()
    }

    /// Modal group `code` belongs to
    pub fn group_of(code: &Code) -> Option<ModalGroup> {
        if code.minor.is_some() {
            return None;
        }
        match (code.letter, code.major) {
            ('G', 0..=3) | ('G', 80..=89) => Some(ModalGroup::Motion),
            ('G', 17..=19) => Some(ModalGroup::Plane),
            ('G', 20 | 21) => Some(ModalGroup::Units),
            ('G', 90 | 91) => Some(ModalGroup::Distance),
            ('G', 93..=95) => Some(ModalGroup::FeedMode),
            ('G', 54..=59) => Some(ModalGroup::WorkOffset),
            ('G', 40..=42) => Some(ModalGroup::CutterComp),
            ('M', 3..=5) => Some(ModalGroup::Spindle),
            ('M', 7..=9) => Some(ModalGroup::Coolant),
            _ => None,
        }
    }

    /// Apply a code to its group; returns false for codes outside every group
    pub fn apply(&mut self, code: &Code) -> bool {
        let Some(group) = Self::group_of(code) else {
            return false;
        };
        let value = code.major as u8;
        let slot = match group {
            ModalGroup::Motion => &mut self.motion_mode,
            ModalGroup::Plane => &mut self.plane_mode,
            ModalGroup::Units => &mut self.units_mode,
            ModalGroup::Distance => &mut self.distance_mode,
            ModalGroup::FeedMode => &mut self.feed_rate_mode,
            ModalGroup::WorkOffset => &mut self.coordinate_system,
            ModalGroup::CutterComp => &mut self.compensation_mode,
            ModalGroup::Spindle => &mut self.spindle,
            ModalGroup::Coolant => &mut self.coolant,
        };
        *slot = value;
        true
    }

    pub fn units(&self) -> Units {
        Units::from_gcode(self.units_mode as u32).unwrap_or_default()
    }

    pub fn is_incremental(&self) -> bool {
        self.distance_mode == 91
    }

    /// A canned drill cycle (G81-G89) is active
    pub fn in_drill_cycle(&self) -> bool {
        (81..=89).contains(&self.motion_mode)
    }

    pub fn spindle_on(&self) -> bool {
        matches!(self.spindle, 3 | 4)
    }

    /// Get a human-readable description of the current motion mode
    pub fn motion_mode_description(&self) -> &'static str {
        match self.motion_mode {
            0 => "Rapid positioning (G0)",
            1 => "Linear interpolation (G1)",
            2 => "Clockwise arc (G2)",
            3 => "Counter-clockwise arc (G3)",
            80 => "Motion cancelled (G80)",
            81..=89 => "Canned drill cycle",
            _ => "Unknown motion mode",
        }
    }

    /// Get a human-readable description of the current plane
    pub fn plane_description(&self) -> &'static str {
        match self.plane_mode {
            17 => "XY plane (G17)",
            18 => "XZ plane (G18)",
            19 => "YZ plane (G19)",
            _ => "Unknown plane",
        }
    }

    /// Get a human-readable description of distance mode
    pub fn distance_mode_description(&self) -> &'static str {
        match self.distance_mode {
            90 => "Absolute positioning (G90)",
            91 => "Incremental positioning (G91)",
            _ => "Unknown distance mode",
        }
    }
}
