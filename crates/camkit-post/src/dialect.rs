//! Controller dialects
//!
//! A dialect fixes the program preamble and footer, the comment syntax and
//! how numbers are written. The command vocabulary is shared: every dialect
//! emits the same G/M words.

use serde::{Deserialize, Serialize};
use tracing::warn;

use camkit_core::Units;

/// Dialect used when none (or an unknown one) is requested
pub const DEFAULT_DIALECT: &str = "generic_3axis";

/// How coordinates and other numbers are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberStyle {
    /// Always `decimals` places: `10.000`
    #[default]
    Fixed,
    /// Trailing zeros dropped, decimal point kept: `10.`, `1.5`
    TrailingPoint,
}

/// Comment syntax accepted by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStyle {
    /// `; text`
    #[default]
    Semicolon,
    /// `(text)`
    Parentheses,
}

/// Output conventions of one controller family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialect {
    pub id: String,
    pub name: String,
    pub description: String,
    /// File extension without the dot
    pub extension: String,
    /// Lines before the modal setup line, e.g. `%` and a program number
    pub program_start: Vec<String>,
    /// Write a creation-date comment after the program start
    pub date_stamp: bool,
    /// Lines after the return-to-origin moves
    pub program_end: Vec<String>,
    pub decimals: usize,
    pub number_style: NumberStyle,
    pub comment_style: CommentStyle,
}

impl Dialect {
    fn base(id: &str, name: &str, description: &str, extension: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            extension: extension.to_string(),
            program_start: Vec::new(),
            date_stamp: false,
            program_end: vec!["M30".to_string()],
            decimals: 3,
            number_style: NumberStyle::Fixed,
            comment_style: CommentStyle::Semicolon,
        }
    }

    fn percent_framed(mut self, program_header: &str) -> Self {
        self.program_start = vec!["%".to_string(), program_header.to_string()];
        self.program_end = vec!["M30".to_string(), "%".to_string()];
        self.number_style = NumberStyle::TrailingPoint;
        self.comment_style = CommentStyle::Parentheses;
        self
    }

    pub fn generic_3axis() -> Self {
        Self::base(
            DEFAULT_DIALECT,
            "Generic 3-Axis Mill",
            "Standard 3-axis milling machine",
            "nc",
        )
    }

    pub fn fanuc() -> Self {
        Self::base(
            "fanuc",
            "Fanuc Compatible",
            "Fanuc 0i/16i/18i/21i compatible",
            "nc",
        )
        .percent_framed("O1000")
    }

    pub fn haas() -> Self {
        Self::base("haas", "Haas Compatible", "Haas CNC mill compatible", "nc")
            .percent_framed("O1000 (PROGRAM NAME)")
    }

    pub fn mach3() -> Self {
        let mut dialect = Self::base(
            "mach3",
            "Mach3 Compatible",
            "Mach3 CNC controller compatible",
            "tap",
        );
        dialect.date_stamp = true;
        dialect.comment_style = CommentStyle::Parentheses;
        dialect
    }

    pub fn linuxcnc() -> Self {
        let mut dialect = Self::base(
            "linuxcnc",
            "LinuxCNC Compatible",
            "LinuxCNC/EMC2 compatible",
            "ngc",
        );
        dialect.date_stamp = true;
        dialect.comment_style = CommentStyle::Parentheses;
        dialect
    }

    pub fn grbl() -> Self {
        Self::base(
            "grbl",
            "GRBL Compatible",
            "GRBL 1.1 and grblHAL hobby controllers",
            "gcode",
        )
    }

    /// Same dialect with a different number of decimal places
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Write a number in this dialect's style
    pub fn format_number(&self, value: f64) -> String {
        let mut text = format!("{:.*}", self.decimals, value);
        if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
            text.remove(0);
        }
        match self.number_style {
            NumberStyle::Fixed => text,
            NumberStyle::TrailingPoint => {
                if text.contains('.') {
                    text.trim_end_matches('0').to_string()
                } else {
                    text + "."
                }
            }
        }
    }

    /// A word such as `X10.000`
    pub fn format_word(&self, letter: char, value: f64) -> String {
        format!("{}{}", letter, self.format_number(value))
    }

    pub fn comment(&self, text: &str) -> String {
        match self.comment_style {
            CommentStyle::Semicolon => format!("; {}", text),
            CommentStyle::Parentheses => format!("({})", text.replace(['(', ')'], "")),
        }
    }

    /// Program start, optional date stamp and the modal setup line
    pub fn preamble(&self, units: Units, date: &str) -> Vec<String> {
        let mut lines = self.program_start.clone();
        if self.date_stamp {
            lines.push(self.comment(&format!("File created: {}", date)));
        }
        lines.push(format!("G17 {} G40 G49 G54 G80 G90 G94", units.gcode()));
        lines
    }

    /// Spindle stop, retract, return to origin and program end
    pub fn footer(&self, safe_z: f64) -> Vec<String> {
        let mut lines = vec![
            "M5".to_string(),
            format!("G0 {}", self.format_word('Z', safe_z)),
            format!("G0 {} {}", self.format_word('X', 0.0), self.format_word('Y', 0.0)),
        ];
        lines.extend(self.program_end.iter().cloned());
        lines
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::generic_3axis()
    }
}

/// Registered dialects in registration order
#[derive(Debug, Clone)]
pub struct DialectRegistry {
    dialects: Vec<Dialect>,
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl DialectRegistry {
    /// The built-in dialects
    pub fn standard() -> Self {
        Self {
            dialects: vec![
                Dialect::generic_3axis(),
                Dialect::fanuc(),
                Dialect::haas(),
                Dialect::mach3(),
                Dialect::linuxcnc(),
                Dialect::grbl(),
            ],
        }
    }

    /// Add or replace a dialect, returning the one it replaced
    pub fn register(&mut self, dialect: Dialect) -> Option<Dialect> {
        match self.dialects.iter_mut().find(|d| d.id == dialect.id) {
            Some(existing) => Some(std::mem::replace(existing, dialect)),
            None => {
                self.dialects.push(dialect);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Dialect> {
        self.dialects.iter().find(|d| d.id.eq_ignore_ascii_case(id))
    }

    /// The dialect for `id`, or the generic one when `id` is unknown
    pub fn resolve(&self, id: &str) -> Dialect {
        if let Some(dialect) = self.get(id) {
            return dialect.clone();
        }
        warn!("Unknown dialect '{}', using {}", id, DEFAULT_DIALECT);
        self.get(DEFAULT_DIALECT)
            .cloned()
            .unwrap_or_else(Dialect::generic_3axis)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.dialects.iter().map(|d| d.id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dialect> {
        self.dialects.iter()
    }

    pub fn len(&self) -> usize {
        self.dialects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_numbers() {
        let dialect = Dialect::generic_3axis();
        assert_eq!(dialect.format_word('X', 10.0), "X10.000");
        assert_eq!(dialect.format_word('Y', -2.5), "Y-2.500");
        assert_eq!(dialect.format_number(-0.0001), "0.000");
        assert_eq!(dialect.clone().with_decimals(1).format_number(1.26), "1.3");
    }

    #[test]
    fn test_trailing_point_numbers() {
        let dialect = Dialect::fanuc();
        assert_eq!(dialect.format_word('Z', 10.0), "Z10.");
        assert_eq!(dialect.format_word('X', 1.5), "X1.5");
        assert_eq!(dialect.format_word('Y', -0.125), "Y-0.125");
        assert_eq!(dialect.with_decimals(0).format_number(7.0), "7.");
    }

    #[test]
    fn test_footer_per_dialect() {
        assert_eq!(
            Dialect::haas().footer(10.0),
            vec!["M5", "G0 Z10.", "G0 X0. Y0.", "M30", "%"]
        );
        assert_eq!(
            Dialect::grbl().footer(10.0),
            vec!["M5", "G0 Z10.000", "G0 X0.000 Y0.000", "M30"]
        );
    }

    #[test]
    fn test_preamble() {
        let lines = Dialect::mach3().preamble(Units::Millimeters, "2024-01-01");
        assert_eq!(
            lines,
            vec![
                "(File created: 2024-01-01)",
                "G17 G21 G40 G49 G54 G80 G90 G94"
            ]
        );
        let lines = Dialect::fanuc().preamble(Units::Inches, "");
        assert_eq!(lines[..2], ["%", "O1000"]);
        assert!(lines[2].contains("G20"));
    }

    #[test]
    fn test_registry_fallback() {
        let registry = DialectRegistry::standard();
        assert_eq!(
            registry.ids(),
            vec!["generic_3axis", "fanuc", "haas", "mach3", "linuxcnc", "grbl"]
        );
        assert_eq!(registry.resolve("FANUC").id, "fanuc");
        assert_eq!(registry.resolve("heidenhain").id, DEFAULT_DIALECT);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = DialectRegistry::standard();
        let custom = Dialect::grbl().with_decimals(2);
        assert!(registry.register(custom).is_some());
        assert_eq!(registry.resolve("grbl").decimals, 2);
        assert_eq!(registry.len(), 6);
    }
}
