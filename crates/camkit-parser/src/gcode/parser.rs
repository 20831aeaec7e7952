//! G-code text parser
//!
//! Turns G-code text into a [`Toolpath`] plus the list of parsed commands.
//! Parsing is permissive: malformed words become warnings and unrecognized
//! content is skipped so the rest of the program still loads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use camkit_core::{
    ArcDirection, ArcParams, Bounds, DrillCycle, GcodeError, MotionPoint, Toolpath, Units,
    ValidationIssue,
};

use super::command::{analyze_tool_changes, command_bounds, Code, ParsedCommand, ToolChange};
use super::expression::{parse_assignment, Variables};
use super::modal::ModalState;
use super::tokenizer::{tokenize, Token, WordValue};

/// Tool assumed active before the program selects one
pub const DEFAULT_TOOL: u32 = 1;

/// Letters that carry numeric parameters
const PARAM_LETTERS: &[char] = &[
    'X', 'Y', 'Z', 'A', 'B', 'C', 'I', 'J', 'K', 'R', 'F', 'S', 'P', 'Q', 'T', 'L',
];

/// Result of parsing G-code text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOutcome {
    /// Text parsing always completes; kept for parity with decoder results
    pub success: bool,
    /// Every motion point in program order
    pub toolpath: Toolpath,
    /// Points split into runs per active tool
    pub toolpaths: Vec<Toolpath>,
    pub commands: Vec<ParsedCommand>,
    /// Units in effect at the end of the program
    pub units: Units,
    pub warnings: Vec<ValidationIssue>,
}

impl ParseOutcome {
    /// Estimated run time of the parsed program in seconds
    pub fn estimate_machining_time(&self) -> f64 {
        self.toolpath.machining_time_secs()
    }

    /// Bounds over explicitly written X/Y/Z words
    pub fn command_bounds(&self) -> Option<Bounds> {
        command_bounds(&self.commands)
    }

    /// Tool transitions in program order
    pub fn tool_changes(&self) -> Vec<ToolChange> {
        analyze_tool_changes(&self.commands, DEFAULT_TOOL)
    }
}

/// G-code parser
///
/// Holds no state between calls; every [`parse`](GcodeParser::parse) starts
/// from the default modal state with an empty variable table.
#[derive(Debug, Clone)]
pub struct GcodeParser {
    initial_tool: u32,
}

impl Default for GcodeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl GcodeParser {
    /// Create a new G-Code parser
    pub fn new() -> Self {
        Self {
            initial_tool: DEFAULT_TOOL,
        }
    }

    /// Tool assumed active before the first `T` word
    pub fn with_initial_tool(mut self, tool: u32) -> Self {
        self.initial_tool = tool;
        self
    }

    /// Parse a whole program
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let mut session = ParseSession::new(self.initial_tool);
        for (index, line) in text.split('\n').enumerate() {
            session.parse_line(index as u32 + 1, line);
        }
        session.finish()
    }
}

/// Per-parse mutable state threaded through the line loop
struct ParseSession {
    modal: ModalState,
    variables: Variables,
    position: [f64; 3],
    a: Option<f64>,
    feed: Option<f64>,
    spindle: Option<f64>,
    retract: Option<f64>,
    tool: u32,
    toolpath: Toolpath,
    segments: Vec<Toolpath>,
    segment: Toolpath,
    commands: Vec<ParsedCommand>,
    warnings: Vec<ValidationIssue>,
}

impl ParseSession {
    fn new(tool: u32) -> Self {
        let mut segment = Toolpath::new();
        segment.tool_id = Some(tool);
        Self {
            modal: ModalState::default(),
            variables: Variables::new(),
            position: [0.0; 3],
            a: None,
            feed: None,
            spindle: None,
            retract: None,
            tool,
            toolpath: Toolpath::new(),
            segments: Vec::new(),
            segment,
            commands: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, err: GcodeError) {
        debug!("{}", err);
        self.warnings.push(ValidationIssue::warning(err));
    }

    fn parse_line(&mut self, line_number: u32, raw: &str) {
        let line = raw.trim_end_matches('\r').trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('(') || line == "%" {
            return;
        }

        let (code_text, comment) = strip_comments(line);
        if code_text.trim().is_empty() {
            return;
        }

        if let Some((number, expression)) = parse_assignment(&code_text) {
            let value = self.evaluate(line_number, &expression);
            debug!("Line {}: #{} = {}", line_number, number, value);
            self.variables.set(number, value);
            return;
        }

        let tokens = tokenize(&code_text);
        let mut codes = Vec::new();
        let mut params = BTreeMap::new();

        for token in &tokens {
            match token {
                Token::Expression(expression) => {
                    let value = self.evaluate(line_number, expression);
                    debug!(
                        "Line {}: standalone expression [{}] = {}",
                        line_number, expression, value
                    );
                }
                Token::Word { letter, value, raw } => match letter {
                    'G' | 'M' => match (value, Code::parse(*letter, raw)) {
                        (WordValue::Number(_), Some(code)) => codes.push(code),
                        _ => self.warn(GcodeError::InvalidParameter {
                            line_number,
                            param: letter.to_string(),
                            reason: format!("'{}' is not a valid code number", raw),
                        }),
                    },
                    'N' => {}
                    l if PARAM_LETTERS.contains(l) => {
                        if let Some(v) = self.resolve(line_number, *l, value) {
                            params.insert(*l, v);
                        }
                    }
                    other => debug!("Line {}: ignoring word '{}{}'", line_number, other, raw),
                },
            }
        }

        for code in &codes {
            self.modal.apply(code);
        }

        if let Some(f) = params.get(&'F') {
            self.feed = Some(*f);
        }
        if let Some(s) = params.get(&'S') {
            self.spindle = Some(*s);
        }
        if let Some(t) = params.get(&'T').copied() {
            self.select_tool(line_number, t);
        }

        let comment = comment.filter(|c| !c.is_empty());
        if codes.iter().any(|c| c.is_g(4)) {
            let seconds = params.get(&'P').copied().unwrap_or(0.0);
            let mut point = MotionPoint::dwell(self.position, seconds).with_tool(self.tool);
            point.spindle_speed = self.spindle;
            point.line = Some(line_number);
            point.comment = comment.clone();
            self.emit(point);
        } else if ['X', 'Y', 'Z', 'A'].iter().any(|l| params.contains_key(l)) {
            self.move_to(line_number, &params, comment.clone());
        }

        self.commands.push(ParsedCommand {
            line_number,
            raw: raw.trim_end_matches('\r').to_string(),
            codes,
            params,
            tokens,
            modal: self.modal,
            comment,
        });
    }

    /// Numeric value of a parameter word, or `None` (with a warning) if unusable
    fn resolve(&mut self, line_number: u32, letter: char, value: &WordValue) -> Option<f64> {
        match value {
            WordValue::Number(v) => Some(*v),
            WordValue::Expression(expression) => {
                let expression = expression.clone();
                Some(self.evaluate(line_number, &expression))
            }
            WordValue::Invalid(text) => {
                self.warn(GcodeError::InvalidParameter {
                    line_number,
                    param: letter.to_string(),
                    reason: format!("'{}' is not a number", text),
                });
                None
            }
        }
    }

    fn evaluate(&mut self, line_number: u32, expression: &str) -> f64 {
        let evaluation = self.variables.evaluate(expression);
        for name in &evaluation.unresolved {
            self.warn(GcodeError::UnresolvedVariable {
                line_number,
                name: name.to_string(),
            });
        }
        if let Some(reason) = evaluation.error {
            self.warn(GcodeError::ExpressionFailed {
                line_number,
                expression: expression.to_string(),
                reason,
            });
        }
        evaluation.value
    }

    fn select_tool(&mut self, line_number: u32, value: f64) {
        if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            self.warn(GcodeError::InvalidParameter {
                line_number,
                param: "T".to_string(),
                reason: format!("{} is not a tool number", value),
            });
            return;
        }
        let tool = value as u32;
        if tool == self.tool {
            return;
        }
        debug!("Line {}: tool change T{} -> T{}", line_number, self.tool, tool);
        let mut next = Toolpath::new();
        next.tool_id = Some(tool);
        let finished = std::mem::replace(&mut self.segment, next);
        if !finished.is_empty() {
            self.segments.push(finished);
        }
        self.tool = tool;
    }

    fn move_to(
        &mut self,
        line_number: u32,
        params: &BTreeMap<char, f64>,
        comment: Option<String>,
    ) {
        let incremental = self.modal.is_incremental();
        let mut target = self.position;
        for (slot, letter) in target.iter_mut().zip(['X', 'Y', 'Z']) {
            if let Some(v) = params.get(&letter) {
                *slot = if incremental { *slot + v } else { *v };
            }
        }
        if let Some(a) = params.get(&'A') {
            self.a = Some(match (incremental, self.a) {
                (true, Some(prev)) => prev + a,
                _ => *a,
            });
        }

        let [x, y, z] = target;
        let motion = self.modal.motion_mode;
        let mut point = match motion {
            0 => {
                let mut p = MotionPoint::rapid(x, y, z);
                p.feed_rate = params.get(&'F').copied();
                p
            }
            1 => MotionPoint::linear(x, y, z),
            2 | 3 => {
                let arc = ArcParams {
                    direction: if motion == 2 {
                        ArcDirection::Cw
                    } else {
                        ArcDirection::Ccw
                    },
                    i: params.get(&'I').copied(),
                    j: params.get(&'J').copied(),
                    k: params.get(&'K').copied(),
                    r: params.get(&'R').copied(),
                };
                if !arc.has_geometry() {
                    self.warn(GcodeError::MissingArcCenter { line_number });
                }
                MotionPoint::arc(x, y, z, arc)
            }
            81..=89 => {
                if let Some(r) = params.get(&'R') {
                    self.retract = Some(*r);
                }
                MotionPoint::drill(
                    x,
                    y,
                    z,
                    DrillCycle {
                        cycle: motion,
                        retract_height: self.retract,
                        dwell_time: params.get(&'P').copied(),
                        peck: params.get(&'Q').copied(),
                    },
                )
            }
            _ => {
                debug!(
                    "Line {}: axis words with motion cancelled (G{}), position updated only",
                    line_number, motion
                );
                self.position = target;
                return;
            }
        };

        if point.is_cutting() {
            point.feed_rate = self.feed;
        }
        point.spindle_speed = self.spindle;
        point.tool_id = self.tool;
        point.a = self.a;
        point.line = Some(line_number);
        point.comment = comment;
        self.position = target;
        self.emit(point);
    }

    fn emit(&mut self, point: MotionPoint) {
        self.segment.push(point.clone());
        self.toolpath.push(point);
    }

    fn finish(mut self) -> ParseOutcome {
        if !self.segment.is_empty() {
            self.segments.push(std::mem::take(&mut self.segment));
        }
        let tools = self.toolpath.tool_ids();
        if let [only] = tools.as_slice() {
            self.toolpath.tool_id = Some(*only);
        }

        info!(
            "Parsed {} commands into {} points across {} tool(s), {} warning(s)",
            self.commands.len(),
            self.toolpath.len(),
            self.segments.len(),
            self.warnings.len()
        );

        ParseOutcome {
            success: true,
            toolpath: self.toolpath,
            toolpaths: self.segments,
            commands: self.commands,
            units: self.modal.units(),
            warnings: self.warnings,
        }
    }
}

/// Split a line into its code text and the text of any `;` or `( )` comments
pub fn strip_comments(line: &str) -> (String, Option<String>) {
    let mut code = String::with_capacity(line.len());
    let mut comments: Vec<String> = Vec::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            ';' => {
                comments.push(chars.as_str().trim().to_string());
                break;
            }
            '(' => {
                let rest = chars.as_str();
                match rest.find(')') {
                    Some(end) => {
                        comments.push(rest[..end].trim().to_string());
                        chars = rest[end + 1..].chars();
                    }
                    None => {
                        comments.push(rest.trim().to_string());
                        break;
                    }
                }
                code.push(' ');
            }
            _ => code.push(c),
        }
    }

    let comment = if comments.is_empty() {
        None
    } else {
        Some(comments.join(" "))
    };
    (code, comment)
}
