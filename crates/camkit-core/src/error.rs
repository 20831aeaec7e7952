//! Error handling for CamKit
//!
//! Provides the error types shared by every layer of the pipeline:
//! - G-Code errors (parsing/validation findings)
//! - Tool errors (invalid cutting-tool descriptors)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-Code error type
///
/// Represents findings produced while parsing, validating or verifying
/// G-code and toolpaths. Most of these are reported inside a
/// [`ValidationReport`](crate::ValidationReport) rather than returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// A word carried a value that is not a number
    #[error("Invalid parameter '{param}' at line {line_number}: {reason}")]
    InvalidParameter {
        /// The line number where the invalid parameter was found.
        line_number: u32,
        /// The parameter letter.
        param: String,
        /// The reason the parameter is invalid.
        reason: String,
    },

    /// An inline expression referenced a variable that was never assigned
    #[error("Unresolved variable #{name} at line {line_number}, using 0")]
    UnresolvedVariable {
        /// The line number of the expression.
        line_number: u32,
        /// The variable number.
        name: String,
    },

    /// An inline expression could not be evaluated
    #[error("Expression [{expression}] at line {line_number} failed: {reason}")]
    ExpressionFailed {
        /// The line number of the expression.
        line_number: u32,
        /// The expression text without brackets.
        expression: String,
        /// The evaluator's message.
        reason: String,
    },

    /// Feed rate given on a rapid move
    #[error("Line {line_number}: Feed rate specified with rapid move (G0)")]
    FeedOnRapid {
        /// The offending line.
        line_number: u32,
    },

    /// Circular move without I/J/K or R
    #[error("Line {line_number}: Circular move without I/J/K or R parameters")]
    MissingArcCenter {
        /// The offending line.
        line_number: u32,
    },

    /// Feed rate zero or negative
    #[error("Line {line_number}: Feed rate must be positive (got {value})")]
    NonPositiveFeed {
        /// The offending line.
        line_number: u32,
        /// The feed rate value.
        value: f64,
    },

    /// Negative spindle speed
    #[error("Line {line_number}: Spindle speed cannot be negative (got {value})")]
    NegativeSpindle {
        /// The offending line.
        line_number: u32,
        /// The spindle speed value.
        value: f64,
    },

    /// Axis value is NaN or infinite
    #[error("Line {line_number}: Invalid value for axis {axis}")]
    NonFiniteAxis {
        /// The offending line.
        line_number: u32,
        /// The axis letter.
        axis: char,
    },

    /// Coordinate out of machine limits
    #[error("Line {line_number}: {axis} axis out of bounds ({value} > {limit})")]
    CoordinateOutOfBounds {
        /// The line number (or point index) of the coordinate.
        line_number: u32,
        /// The axis letter.
        axis: char,
        /// The coordinate value.
        value: f64,
        /// The limit it exceeded.
        limit: f64,
    },

    /// Code listed as unsupported by the target controllers
    #[error("Line {line_number}: Command {code} may not be supported")]
    UnsupportedCode {
        /// The offending line.
        line_number: u32,
        /// The code text, e.g. `G12`.
        code: String,
    },

    /// Two motion codes on one line
    #[error("Line {line_number}: Multiple motion commands (G0 and G1)")]
    ModalConflict {
        /// The offending line.
        line_number: u32,
    },

    /// Feed rate above machine maximum
    #[error("Line {line_number}: Feed rate exceeds maximum ({value} > {max})")]
    FeedRateExceeded {
        /// The offending line.
        line_number: u32,
        /// The feed rate value.
        value: f64,
        /// The configured maximum.
        max: f64,
    },

    /// Rapid move ending below the stock surface
    #[error("Rapid move into material at point {index}")]
    RapidIntoMaterial {
        /// Index of the point that ends below Z=0.
        index: usize,
    },

    /// Linear move much shorter than the tool diameter
    #[error("Very short move at point {index} ({length:.4}), consider optimizing")]
    ShortMove {
        /// Index of the point that ends the move.
        index: usize,
        /// The move length.
        length: f64,
    },
}

impl GcodeError {
    /// Line number (or point index) the finding refers to
    pub fn line_number(&self) -> Option<u32> {
        match self {
            Self::InvalidParameter { line_number, .. }
            | Self::UnresolvedVariable { line_number, .. }
            | Self::ExpressionFailed { line_number, .. }
            | Self::FeedOnRapid { line_number }
            | Self::MissingArcCenter { line_number }
            | Self::NonPositiveFeed { line_number, .. }
            | Self::NegativeSpindle { line_number, .. }
            | Self::NonFiniteAxis { line_number, .. }
            | Self::CoordinateOutOfBounds { line_number, .. }
            | Self::UnsupportedCode { line_number, .. }
            | Self::ModalConflict { line_number }
            | Self::FeedRateExceeded { line_number, .. } => Some(*line_number),
            Self::RapidIntoMaterial { .. } | Self::ShortMove { .. } => None,
        }
    }
}

/// Tool descriptor error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Diameter zero, negative or not finite
    #[error("Tool diameter must be positive and finite, got {0}")]
    InvalidDiameter(f64),

    /// No flutes
    #[error("Tool must have at least one flute")]
    NoFlutes,

    /// Cutting data out of range
    #[error("Invalid cutting data for '{name}': {reason}")]
    InvalidCuttingData {
        /// The field name.
        name: String,
        /// The reason the value is invalid.
        reason: String,
    },
}

/// Main error type for the core crate
#[derive(Error, Debug)]
pub enum Error {
    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Tool error
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a G-Code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Gcode(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
