//! Error types for the CAM tools crate.
//!
//! This module provides structured error types for operation parameter
//! validation and toolpath generation.

use thiserror::Error;

/// Errors that can occur during CAM operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CamToolError {
    /// Invalid parameters were provided to an operation.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A geometry operation failed during toolpath creation.
    #[error("Geometry error: {0}")]
    GeometryError(String),

    /// Toolpath generation failed.
    #[error("Toolpath generation failed: {0}")]
    GenerationFailed(String),

    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),
}

/// Errors related to operation parameter validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A required input is missing.
    #[error("Missing required parameter: {0}")]
    Missing(String),

    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// Input geometry is unusable (too few points, non-finite coordinates).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl ParameterError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;
