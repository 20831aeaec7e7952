//! Operator setup sheet for a posted program

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use camkit_camtools::{calculate_cycle_time, Operation};
use camkit_core::{MotionType, ToolKind, Toolpath};

use crate::dialect::Dialect;
use crate::post_processor::operation_tools;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramInfo {
    pub file_name: String,
    pub created: DateTime<Utc>,
    pub post_processor: String,
    pub total_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupTool {
    pub id: u32,
    pub kind: ToolKind,
    pub description: String,
    pub diameter: f64,
    pub flutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupOperation {
    pub kind: String,
    pub tool: u32,
    pub depth: f64,
    pub feed_rate: f64,
    pub spindle_speed: f64,
}

/// Program summary handed to the machine operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupSheet {
    pub program: ProgramInfo,
    pub tools: Vec<SetupTool>,
    pub operations: Vec<SetupOperation>,
    pub estimated_time_secs: f64,
    pub safety_notes: Vec<String>,
}

impl SetupSheet {
    pub fn new(
        dialect: &Dialect,
        gcode: &str,
        toolpath: &Toolpath,
        operations: &[Operation],
    ) -> Self {
        let created = Utc::now();
        let tools = operation_tools(operations)
            .into_iter()
            .map(|tool| SetupTool {
                id: tool.id,
                kind: tool.kind,
                description: tool.description.clone(),
                diameter: tool.diameter,
                flutes: tool.flutes,
            })
            .collect();
        let ops = operations
            .iter()
            .map(|op| SetupOperation {
                kind: op.name().to_string(),
                tool: op.tool().id,
                depth: op.depth(),
                feed_rate: op.cut().feed_rate,
                spindle_speed: op.cut().spindle_speed,
            })
            .collect();

        Self {
            program: ProgramInfo {
                file_name: format!("program_{}.{}", created.timestamp(), dialect.extension),
                created,
                post_processor: dialect.name.clone(),
                total_lines: gcode.lines().count(),
            },
            tools,
            operations: ops,
            estimated_time_secs: calculate_cycle_time(toolpath).as_secs_f64(),
            safety_notes: safety_notes(toolpath, operations),
        }
    }
}

fn safety_notes(toolpath: &Toolpath, operations: &[Operation]) -> Vec<String> {
    let mut notes = Vec::new();
    if let Some(deepest) = operations.iter().map(Operation::depth).reduce(f64::min) {
        notes.push(format!(
            "Verify stock is thicker than the deepest cut ({:.3} mm)",
            deepest.abs()
        ));
    }
    let tool_ids = toolpath.tool_ids();
    if tool_ids.len() > 1 {
        notes.push(format!(
            "Program uses {} tools; check tool length offsets before running",
            tool_ids.len()
        ));
    }
    if toolpath.iter().any(|p| p.kind() == MotionType::Drill) {
        notes.push("Canned drill cycles present; confirm retract plane".to_string());
    }
    if operations.iter().any(|op| op.cut().spindle_speed > 20000.0) {
        notes.push("Spindle speed above 20000 RPM; confirm spindle rating".to_string());
    }
    notes
}
