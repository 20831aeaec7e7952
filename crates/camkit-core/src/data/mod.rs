//! Cutting data
//!
//! This module provides:
//! - Tool descriptors and the standard tool library
//! - Workpiece materials and their speed factors

pub mod materials;
pub mod tools;

pub use materials::WorkMaterial;
pub use tools::{Tool, ToolKind, ToolLibrary, ToolMaterial};
