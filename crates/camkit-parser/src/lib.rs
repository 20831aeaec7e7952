//! # CamKit Parser
//!
//! Toolpath ingestion for CamKit: a G-code text parser with modal state,
//! inline expressions and per-tool segmentation, plus a strict decoder for
//! MCAM binary files that falls back to text when the bytes are not MCAM.

pub mod binary;
pub mod error;
pub mod gcode;

pub use binary::{DecodeOutcome, DecodeSource, McamDecoder, McamFile, McamGeometry, McamHeader};
pub use error::{DecodeError, DecodeResult};
pub use gcode::{
    analyze_tool_changes, command_bounds, format_number, optimize, strip_comments, tokenize,
    validate_commands, validate_toolpath, Code, GcodeParser, ModalGroup, ModalState,
    ParseOutcome, ParsedCommand, Token, ToolChange, Variables, WordValue, DEFAULT_TOOL,
};
