//! Posted-program validation against the target machine
//!
//! Works line by line on the text, so it catches problems in hand-edited
//! programs as well as generated ones.

use camkit_core::{GcodeError, MachineLimits, ValidationReport};
use camkit_parser::{strip_comments, tokenize, Code, Token, WordValue};

/// Codes many controllers reject (splines, lathe modes, exact stop, data
/// setting, polar and circular pocket cycles)
pub const UNSUPPORTED_CODES: [Code; 11] = [
    Code::g(5),
    Code {
        letter: 'G',
        major: 5,
        minor: Some(1),
    },
    Code {
        letter: 'G',
        major: 5,
        minor: Some(2),
    },
    Code {
        letter: 'G',
        major: 6,
        minor: Some(2),
    },
    Code::g(7),
    Code::g(8),
    Code::g(9),
    Code::g(10),
    Code::g(11),
    Code::g(12),
    Code::g(13),
];

/// Validate G-code text
///
/// Unsupported codes and feeds above the machine maximum are warnings. A
/// line with both G0 and G1, or an X/Y/Z value beyond half the axis travel,
/// is an error.
pub fn validate_gcode(text: &str, limits: &MachineLimits) -> ValidationReport {
    let mut report = ValidationReport::new();

    for (index, raw) in text.lines().enumerate() {
        let line_number = index as u32 + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with([';', '(', '%']) {
            continue;
        }
        let (code_text, _) = strip_comments(line);

        let mut codes = Vec::new();
        for token in tokenize(&code_text) {
            let Token::Word { letter, value, raw } = token else {
                continue;
            };
            match letter {
                'G' | 'M' => codes.extend(Code::parse(letter, &raw)),
                'X' | 'Y' | 'Z' => {
                    if let (WordValue::Number(v), Some(travel)) = (value, limits.travel(letter)) {
                        let limit = travel / 2.0;
                        if v.abs() > limit {
                            report.push_error(GcodeError::CoordinateOutOfBounds {
                                line_number,
                                axis: letter,
                                value: v,
                                limit,
                            });
                        }
                    }
                }
                'F' => {
                    if let WordValue::Number(v) = value {
                        if v > limits.max_feed_rate {
                            report.push_warning(GcodeError::FeedRateExceeded {
                                line_number,
                                value: v,
                                max: limits.max_feed_rate,
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        for code in UNSUPPORTED_CODES.iter().filter(|c| codes.contains(c)) {
            report.push_warning(GcodeError::UnsupportedCode {
                line_number,
                code: code.to_string(),
            });
        }
        if codes.iter().any(|c| c.is_g(0)) && codes.iter().any(|c| c.is_g(1)) {
            report.push_error(GcodeError::ModalConflict { line_number });
        }
    }

    report
}
