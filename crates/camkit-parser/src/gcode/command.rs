//! Parsed G-code command types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use camkit_core::Bounds;

use super::modal::ModalState;
use super::tokenizer::Token;

/// Order in which parameter words are rendered
pub const PARAM_ORDER: [char; 16] = [
    'X', 'Y', 'Z', 'A', 'B', 'C', 'I', 'J', 'K', 'R', 'P', 'Q', 'L', 'F', 'S', 'T',
];

/// Axis words dropped by the optimizer when unchanged
pub const AXIS_LETTERS: [char; 6] = ['X', 'Y', 'Z', 'A', 'B', 'C'];

/// A G or M code such as `G1` or `G5.1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Code {
    /// `'G'` or `'M'`
    pub letter: char,
    pub major: u32,
    pub minor: Option<u32>,
}

impl Code {
    pub const fn g(major: u32) -> Self {
        Self {
            letter: 'G',
            major,
            minor: None,
        }
    }

    pub const fn m(major: u32) -> Self {
        Self {
            letter: 'M',
            major,
            minor: None,
        }
    }

    /// Parse the numeric text of a G/M word (`"01"`, `"5.1"`)
    pub fn parse(letter: char, raw: &str) -> Option<Self> {
        let letter = letter.to_ascii_uppercase();
        if letter != 'G' && letter != 'M' {
            return None;
        }
        let (major, minor) = match raw.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (raw, None),
        };
        let major = major.parse::<u32>().ok()?;
        let minor = match minor {
            Some(m) => Some(m.parse::<u32>().ok()?),
            None => None,
        };
        Some(Self {
            letter,
            major,
            minor,
        })
    }

    pub fn is_g(&self, major: u32) -> bool {
        self.letter == 'G' && self.major == major && self.minor.is_none()
    }

    pub fn is_m(&self, major: u32) -> bool {
        self.letter == 'M' && self.major == major && self.minor.is_none()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minor {
            Some(minor) => write!(f, "{}{}.{}", self.letter, self.major, minor),
            None => write!(f, "{}{}", self.letter, self.major),
        }
    }
}

/// One parsed line of G-code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCommand {
    /// 1-based source line
    pub line_number: u32,
    /// Line as written, including comments
    pub raw: String,
    /// G and M codes in order of appearance
    pub codes: Vec<Code>,
    /// Numeric parameter words
    pub params: BTreeMap<char, f64>,
    /// Tokens the line was built from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<Token>,
    /// Modal state after this line was applied
    pub modal: ModalState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ParsedCommand {
    /// Primary code: the last G or M code on the line
    pub fn code(&self) -> Option<Code> {
        self.codes.last().copied()
    }

    pub fn has_code(&self, code: Code) -> bool {
        self.codes.contains(&code)
    }

    pub fn param(&self, letter: char) -> Option<f64> {
        self.params.get(&letter).copied()
    }

    pub fn has_param(&self, letter: char) -> bool {
        self.params.contains_key(&letter)
    }

    /// Render the command back to a G-code line (comments are not kept)
    pub fn to_line(&self) -> String {
        let mut words: Vec<String> = self.codes.iter().map(Code::to_string).collect();
        for letter in PARAM_ORDER {
            if let Some(value) = self.params.get(&letter) {
                words.push(format!("{}{}", letter, format_number(*value)));
            }
        }
        for (letter, value) in &self.params {
            if !PARAM_ORDER.contains(letter) {
                words.push(format!("{}{}", letter, format_number(*value)));
            }
        }
        words.join(" ")
    }
}

/// Format a word value with at most four decimals and no trailing zeros
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let text = format!("{:.4}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// A `T` word that selected a different tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolChange {
    pub line_number: u32,
    pub from_tool: u32,
    pub to_tool: u32,
}

/// Tool transitions in program order, starting from `initial_tool`
pub fn analyze_tool_changes(commands: &[ParsedCommand], initial_tool: u32) -> Vec<ToolChange> {
    let mut current = initial_tool;
    let mut changes = Vec::new();
    for command in commands {
        let Some(tool) = command.param('T') else {
            continue;
        };
        if tool < 0.0 || tool.fract() != 0.0 {
            continue;
        }
        let tool = tool as u32;
        if tool != current {
            changes.push(ToolChange {
                line_number: command.line_number,
                from_tool: current,
                to_tool: tool,
            });
            current = tool;
        }
    }
    changes
}

/// Bounds over X/Y/Z words that were written explicitly
///
/// Axes that never appear report 0 on both sides. Returns `None` when no
/// command carries an X, Y or Z word.
pub fn command_bounds(commands: &[ParsedCommand]) -> Option<Bounds> {
    let mut ranges: [Option<(f64, f64)>; 3] = [None; 3];
    for command in commands {
        for (slot, letter) in ranges.iter_mut().zip(['X', 'Y', 'Z']) {
            if let Some(v) = command.param(letter) {
                *slot = Some(match *slot {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
    }
    if ranges.iter().all(Option::is_none) {
        return None;
    }
    let [x, y, z] = ranges.map(|r| r.unwrap_or((0.0, 0.0)));
    Some(Bounds {
        min_x: x.0,
        max_x: x.1,
        min_y: y.0,
        max_y: y.1,
        min_z: z.0,
        max_z: z.1,
    })
}
