//! Error types for the binary decoder
//!
//! G-code text parsing never fails; its findings are reported as
//! [`ValidationIssue`](camkit_core::ValidationIssue)s. The binary path is
//! strict and stops at the first fatal condition.

use thiserror::Error;

/// Fatal MCAM decode failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Wrong magic, unsupported version, size mismatch or inconsistent content
    #[error("Format error: {0}")]
    Format(String),

    /// A read would pass the end of the buffer, or a count exceeds its cap
    #[error("Bounds error reading '{field}': {reason}")]
    Bounds {
        /// The field being read when the check failed.
        field: String,
        /// What went wrong.
        reason: String,
    },
}

impl DecodeError {
    /// Create a format error from a message
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create a bounds error naming `field`
    pub fn bounds(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Bounds {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Field named by a bounds error
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Bounds { field, .. } => Some(field),
            Self::Format(_) => None,
        }
    }

    pub fn is_bounds(&self) -> bool {
        matches!(self, Self::Bounds { .. })
    }
}

/// Result type for the binary decoder
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::bounds("vertex[1].y", "need 4 bytes at offset 40, buffer is 42");
        assert_eq!(
            err.to_string(),
            "Bounds error reading 'vertex[1].y': need 4 bytes at offset 40, buffer is 42"
        );
        assert_eq!(err.field(), Some("vertex[1].y"));
        assert!(err.is_bounds());

        let err = DecodeError::format("bad magic");
        assert_eq!(err.to_string(), "Format error: bad magic");
        assert_eq!(err.field(), None);
    }
}
