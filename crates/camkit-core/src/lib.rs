//! # CamKit Core
//!
//! Core types shared by every CamKit crate.
//! Provides the canonical toolpath model, 2D input geometry, cutting tool
//! descriptors, machine limits, program units and the validation report types.

pub mod data;
pub mod error;
pub mod geometry;
pub mod machine;
pub mod toolpath;
pub mod units;
pub mod validation;

pub use data::{Tool, ToolKind, ToolLibrary, ToolMaterial, WorkMaterial};
pub use error::{Error, GcodeError, Result, ToolError};
pub use geometry::{Point2, Polyline2};
pub use machine::MachineLimits;
pub use toolpath::{
    ArcDirection, ArcForm, ArcParams, Bounds, DrillCycle, Motion, MotionPoint, MotionType,
    Toolpath, DEFAULT_FEED_RATE, RAPID_FACTOR,
};
pub use units::Units;
pub use validation::{Severity, ValidationIssue, ValidationReport};
