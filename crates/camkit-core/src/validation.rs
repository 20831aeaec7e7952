//! Validation findings shared by the parser, CAM verifier and post-processor.

use serde::{Deserialize, Serialize};

use crate::error::GcodeError;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Result is still usable
    Warning,
    /// Caller should decide whether to block use
    Error,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Source line (1-based) when the finding maps to one
    pub line: Option<u32>,
    pub message: String,
}

impl ValidationIssue {
    /// Warning built from a G-code finding
    pub fn warning(err: GcodeError) -> Self {
        Self {
            severity: Severity::Warning,
            line: err.line_number(),
            message: err.to_string(),
        }
    }

    /// Error built from a G-code finding
    pub fn error(err: GcodeError) -> Self {
        Self {
            severity: Severity::Error,
            line: err.line_number(),
            message: err.to_string(),
        }
    }
}

/// Errors and warnings collected by a validation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_error(&mut self, err: GcodeError) {
        self.errors.push(ValidationIssue::error(err));
    }

    pub fn push_warning(&mut self, err: GcodeError) {
        self.warnings.push(ValidationIssue::warning(err));
    }

    /// True when no errors were found (warnings allowed)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Append another report's findings
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}
