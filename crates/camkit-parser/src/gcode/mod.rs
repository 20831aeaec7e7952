//! G-Code parser and modal state machine
//!
//! This module provides:
//! - Line tokenizing with inline expressions
//! - Modal state tracking
//! - Toolpath extraction with sticky coordinates, feed and spindle
//! - Command and toolpath validation
//! - Redundant word removal

pub mod command;
pub mod expression;
pub mod modal;
pub mod optimize;
pub mod parser;
pub mod tokenizer;
pub mod validate;

pub use command::{
    analyze_tool_changes, command_bounds, format_number, Code, ParsedCommand, ToolChange,
};
pub use expression::Variables;
pub use modal::{ModalGroup, ModalState};
pub use optimize::optimize;
pub use parser::{strip_comments, GcodeParser, ParseOutcome, DEFAULT_TOOL};
pub use tokenizer::{tokenize, Token, WordValue};
pub use validate::{validate_commands, validate_toolpath};
