//! G-code generation from toolpaths.
//!
//! Emission walks the toolpath once. Tool, spindle speed and feed rate are
//! written only when they change; a compaction pass then drops any motion
//! code, feed word or spindle word that repeats the value already in effect.

use std::collections::BTreeSet;

use chrono::Local;
use tracing::{debug, info};

use camkit_camtools::Operation;
use camkit_core::{ArcDirection, Motion, MotionPoint, Tool, Toolpath, Units};

use crate::dialect::{Dialect, DialectRegistry};
use crate::error::{PostError, PostResult};
use crate::setup_sheet::SetupSheet;

/// Retract height used by the safety moves and the footer
pub const DEFAULT_SAFE_Z: f64 = 10.0;

/// Values already written to the program
#[derive(Debug, Default)]
struct EmissionState {
    tool: Option<u32>,
    spindle: Option<f64>,
    feed: Option<f64>,
    in_cycle: bool,
}

/// G-code generator for converting toolpaths to dialect-specific programs.
#[derive(Debug, Clone)]
pub struct PostProcessor {
    registry: DialectRegistry,
    /// Safe Z height for the start and end retracts
    pub safe_z: f64,
    /// Units declared in the preamble; coordinates are written unconverted
    pub units: Units,
    /// Overrides the dialect's decimal places
    pub decimals: Option<usize>,
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PostProcessor {
    /// Creates a post-processor with the built-in dialects.
    pub fn new() -> Self {
        Self {
            registry: DialectRegistry::standard(),
            safe_z: DEFAULT_SAFE_Z,
            units: Units::Millimeters,
            decimals: None,
        }
    }

    pub fn with_registry(mut self, registry: DialectRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_safe_z(mut self, safe_z: f64) -> Self {
        self.safe_z = safe_z;
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_decimals(mut self, decimals: Option<usize>) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn registry(&self) -> &DialectRegistry {
        &self.registry
    }

    /// The dialect for `dialect_id` with the decimal override applied
    pub fn dialect(&self, dialect_id: &str) -> Dialect {
        let dialect = self.registry.resolve(dialect_id);
        match self.decimals {
            Some(decimals) => dialect.with_decimals(decimals),
            None => dialect,
        }
    }

    /// Generates a complete program for `toolpath` in the requested dialect.
    ///
    /// `operations` only feed the tool table comment; the motion comes from
    /// the toolpath alone.
    pub fn generate_gcode(
        &self,
        toolpath: &Toolpath,
        operations: &[Operation],
        dialect_id: &str,
    ) -> PostResult<String> {
        if toolpath.is_empty() {
            return Err(PostError::EmptyToolpath);
        }
        let dialect = self.dialect(dialect_id);
        let date = Local::now().format("%Y-%m-%d").to_string();

        let mut lines = dialect.preamble(self.units, &date);
        lines.extend(tool_table(&dialect, operations));
        lines.push(format!("G0 {}", dialect.format_word('Z', self.safe_z)));
        lines.push(format!(
            "G0 {} {}",
            dialect.format_word('X', 0.0),
            dialect.format_word('Y', 0.0)
        ));

        let mut state = EmissionState::default();
        for (index, point) in toolpath.iter().enumerate() {
            check_point(index, point)?;
            emit_point(&dialect, point, &mut state, &mut lines);
        }
        if state.in_cycle {
            lines.push("G80".to_string());
        }
        lines.extend(dialect.footer(self.safe_z));

        let before = lines.len();
        let lines = compact(lines);
        debug!("Compaction removed {} empty line(s)", before - lines.len());
        info!(
            "Posted {} points as {} lines for {}",
            toolpath.len(),
            lines.len(),
            dialect.name
        );

        let mut program = lines.join("\n");
        program.push('\n');
        Ok(program)
    }

    /// Summary of a generated program for the machine operator
    pub fn setup_sheet(
        &self,
        gcode: &str,
        toolpath: &Toolpath,
        operations: &[Operation],
        dialect_id: &str,
    ) -> SetupSheet {
        SetupSheet::new(&self.dialect(dialect_id), gcode, toolpath, operations)
    }
}

/// Unique tools in first-use order
pub fn operation_tools(operations: &[Operation]) -> Vec<&Tool> {
    let mut seen = BTreeSet::new();
    let mut tools = Vec::new();
    for op in operations {
        let tool = op.tool();
        if seen.insert(tool.id) {
            tools.push(tool);
        }
    }
    tools
}

fn tool_table(dialect: &Dialect, operations: &[Operation]) -> Vec<String> {
    let tools = operation_tools(operations);
    if tools.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![dialect.comment("Tool Table")];
    for tool in tools {
        let description = if tool.description.is_empty() {
            tool.kind.to_string()
        } else {
            tool.description.clone()
        };
        lines.push(dialect.comment(&format!(
            "T{} - {} - D{}mm",
            tool.id, description, tool.diameter
        )));
    }
    lines
}

fn check_point(index: usize, point: &MotionPoint) -> PostResult<()> {
    let values = [
        ('X', Some(point.x)),
        ('Y', Some(point.y)),
        ('Z', Some(point.z)),
        ('A', point.a),
        ('F', point.feed_rate),
        ('S', point.spindle_speed),
    ];
    for (letter, value) in values {
        if value.is_some_and(|v| !v.is_finite()) {
            return Err(PostError::InvalidPoint {
                index,
                reason: format!("{} is not finite", letter),
            });
        }
    }
    Ok(())
}

fn emit_point(
    dialect: &Dialect,
    point: &MotionPoint,
    state: &mut EmissionState,
    lines: &mut Vec<String>,
) {
    if point.tool_id != 0 && state.tool != Some(point.tool_id) {
        lines.push(format!("T{} M6", point.tool_id));
        state.tool = Some(point.tool_id);
    }

    if let Some(speed) = point.spindle_speed.filter(|s| *s > 0.0) {
        if state.spindle != Some(speed) {
            let word = format!("S{}", speed.round() as i64);
            if state.spindle.is_none() {
                lines.push(format!("{} M3", word));
            } else {
                lines.push(word);
            }
            state.spindle = Some(speed);
        }
    }

    let drilling = matches!(point.motion, Motion::Drill(_));
    if state.in_cycle && !drilling {
        lines.push("G80".to_string());
    }
    state.in_cycle = drilling;

    let mut words = Vec::new();
    match point.motion {
        Motion::Dwell { seconds } => {
            words.push("G4".to_string());
            words.push(dialect.format_word('P', seconds));
        }
        motion => {
            words.push(
                match motion {
                    Motion::Rapid => "G0",
                    Motion::Linear => "G1",
                    Motion::Arc(arc) if arc.direction == ArcDirection::Cw => "G2",
                    Motion::Arc(_) => "G3",
                    _ => "G81",
                }
                .to_string(),
            );
            words.push(dialect.format_word('X', point.x));
            words.push(dialect.format_word('Y', point.y));
            words.push(dialect.format_word('Z', point.z));
            if let Some(a) = point.a {
                words.push(dialect.format_word('A', a));
            }
            match motion {
                Motion::Arc(arc) => {
                    for (letter, value) in [('I', arc.i), ('J', arc.j), ('K', arc.k), ('R', arc.r)] {
                        if let Some(v) = value {
                            words.push(dialect.format_word(letter, v));
                        }
                    }
                }
                Motion::Drill(cycle) => {
                    if let Some(r) = cycle.retract_height {
                        words.push(dialect.format_word('R', r));
                    }
                }
                _ => {}
            }
            if point.is_cutting() {
                if let Some(feed) = point.feed_rate.filter(|f| *f > 0.0) {
                    if state.feed != Some(feed) {
                        words.push(dialect.format_word('F', feed));
                        state.feed = Some(feed);
                    }
                }
            }
        }
    }

    let mut line = words.join(" ");
    if let Some(comment) = point.comment.as_deref().filter(|c| !c.is_empty()) {
        line.push(' ');
        line.push_str(&dialect.comment(comment));
    }
    lines.push(line);
}

/// Motion-group G number of a word, if it is one (`G0`-`G3`, `G80`-`G89`)
fn motion_code(word: &str) -> Option<u32> {
    let number = word.strip_prefix(['G', 'g'])?;
    if number.contains('.') {
        return None;
    }
    let code: u32 = number.parse().ok()?;
    matches!(code, 0..=3 | 80..=89).then_some(code)
}

/// Drop motion codes, feed words and spindle words that repeat the value
/// already in effect, and remove lines left empty
pub fn compact(lines: Vec<String>) -> Vec<String> {
    let mut last_motion: Option<u32> = None;
    let mut last_feed: Option<String> = None;
    let mut last_spindle: Option<String> = None;
    let mut compacted = Vec::with_capacity(lines.len());

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with([';', '(', '%']) {
            compacted.push(trimmed.to_string());
            continue;
        }

        let (code, comment) = match trimmed.find([';', '(']) {
            Some(at) => (&trimmed[..at], Some(&trimmed[at..])),
            None => (trimmed, None),
        };

        let mut kept: Vec<&str> = Vec::new();
        for word in code.split_whitespace() {
            if let Some(motion) = motion_code(word) {
                if last_motion == Some(motion) {
                    continue;
                }
                last_motion = Some(motion);
            } else if let Some(value) = word.strip_prefix(['F', 'f']) {
                if last_feed.as_deref() == Some(value) {
                    continue;
                }
                last_feed = Some(value.to_string());
            } else if let Some(value) = word.strip_prefix(['S', 's']) {
                if last_spindle.as_deref() == Some(value) {
                    continue;
                }
                last_spindle = Some(value.to_string());
            }
            kept.push(word);
        }

        let mut out = kept.join(" ");
        if let Some(comment) = comment {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(comment.trim());
        }
        if !out.is_empty() {
            compacted.push(out);
        }
    }
    compacted
}
