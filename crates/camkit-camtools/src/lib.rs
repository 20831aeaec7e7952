//! # CamKit CAM Tools
//!
//! Generates toolpaths from 2D geometry and machining parameters.
//!
//! ## Operations
//!
//! - **Contour**: profile along a polyline with tool-radius compensation,
//!   climb or conventional direction, and tangent/perpendicular/radial leads
//! - **Pocket**: clear a closed region with a zigzag raster or offset rings,
//!   entered by a helical ramp or a plunge
//! - **Drill**: single-plunge or peck drilling with optional dwell
//!
//! ## Supporting Infrastructure
//!
//! - **Offset**: polygon offsetting on top of `cavalier_contours`
//! - **Optimizer**: nearest-neighbour ordering of drill targets
//! - **Analysis**: cycle-time estimate and machine-limit verification

pub mod analysis;
pub mod contour;
pub mod drill;
pub mod error;
pub mod generator;
pub mod offset;
pub mod operation;
pub mod optimizer;
pub mod pocket;

// Re-export commonly used items
pub use analysis::{calculate_cycle_time, verify_toolpath};
pub use error::{CamToolError, CamToolResult, ParameterError, ParameterResult};
pub use generator::{depth_levels, generate, generate_all};
pub use offset::{offset_closed, offset_open, OffsetLoop, PathVertex};
pub use operation::{
    Compensation, ContourOp, CutSettings, DrillOp, HelixSettings, Job, LeadStrategy, Operation,
    PocketOp, PocketPattern, RampStrategy, DEFAULT_CLEARANCE_Z, DEFAULT_SAFE_Z,
};
pub use optimizer::{optimize_drill_operation, optimize_point_order, travel_distance};
