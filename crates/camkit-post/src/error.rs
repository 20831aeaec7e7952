//! Error types for G-code emission.

use thiserror::Error;

/// Errors that can occur while post-processing a toolpath.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PostError {
    /// There is nothing to emit.
    #[error("Toolpath has no points")]
    EmptyToolpath,

    /// A point cannot be written as G-code.
    #[error("Point {index} cannot be emitted: {reason}")]
    InvalidPoint { index: usize, reason: String },

    /// Writing to the output buffer failed.
    #[error("Formatting failed: {0}")]
    Format(String),
}

impl From<std::fmt::Error> for PostError {
    fn from(err: std::fmt::Error) -> Self {
        Self::Format(err.to_string())
    }
}

/// Result type alias for post-processing.
pub type PostResult<T> = Result<T, PostError>;
