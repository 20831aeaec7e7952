//! Toolpath and command validation
//!
//! Checks run after parsing. Findings never stop a program from loading;
//! callers decide whether errors block use.

use camkit_core::{GcodeError, MotionPoint, MotionType, Toolpath, ValidationReport};

use super::command::{Code, ParsedCommand};

/// Letters whose values are axis positions
const AXIS_WORDS: [char; 9] = ['X', 'Y', 'Z', 'A', 'B', 'C', 'U', 'V', 'W'];

/// Validate the points of a toolpath
///
/// Findings refer to the point's source line when it has one, otherwise to
/// its 1-based position in the path.
pub fn validate_toolpath(toolpath: &Toolpath) -> ValidationReport {
    let mut report = ValidationReport::new();

    for (index, point) in toolpath.iter().enumerate() {
        let line_number = point.line.unwrap_or(index as u32 + 1);

        if point.kind() == MotionType::Rapid && point.feed_rate.is_some() {
            report.push_warning(GcodeError::FeedOnRapid { line_number });
        }
        if let camkit_core::Motion::Arc(arc) = point.motion {
            if !arc.has_geometry() {
                report.push_warning(GcodeError::MissingArcCenter { line_number });
            }
        }
        check_point_values(point, line_number, &mut report);
    }

    report
}

fn check_point_values(point: &MotionPoint, line_number: u32, report: &mut ValidationReport) {
    let axes = [
        ('X', Some(point.x)),
        ('Y', Some(point.y)),
        ('Z', Some(point.z)),
        ('A', point.a),
    ];
    for (axis, value) in axes {
        if value.is_some_and(|v| !v.is_finite()) {
            report.push_error(GcodeError::NonFiniteAxis { line_number, axis });
        }
    }
    if let Some(feed) = point.feed_rate {
        if feed <= 0.0 || feed.is_nan() {
            report.push_error(GcodeError::NonPositiveFeed {
                line_number,
                value: feed,
            });
        }
    }
    if let Some(speed) = point.spindle_speed {
        if speed < 0.0 {
            report.push_error(GcodeError::NegativeSpindle {
                line_number,
                value: speed,
            });
        }
    }
}

/// Validate parsed commands word by word
pub fn validate_commands(commands: &[ParsedCommand]) -> ValidationReport {
    let mut report = ValidationReport::new();

    for command in commands {
        let line_number = command.line_number;
        let code = command.code();

        if code == Some(Code::g(0)) && command.has_param('F') {
            report.push_warning(GcodeError::FeedOnRapid { line_number });
        }
        let is_arc = matches!(code, Some(c) if c.is_g(2) || c.is_g(3));
        if is_arc && !['I', 'J', 'K', 'R'].iter().any(|l| command.has_param(*l)) {
            report.push_warning(GcodeError::MissingArcCenter { line_number });
        }

        for (letter, value) in &command.params {
            if AXIS_WORDS.contains(letter) && !value.is_finite() {
                report.push_error(GcodeError::NonFiniteAxis {
                    line_number,
                    axis: *letter,
                });
            }
        }
        if let Some(feed) = command.param('F') {
            if feed <= 0.0 || feed.is_nan() {
                report.push_error(GcodeError::NonPositiveFeed {
                    line_number,
                    value: feed,
                });
            }
        }
        if let Some(speed) = command.param('S') {
            if speed < 0.0 {
                report.push_error(GcodeError::NegativeSpindle {
                    line_number,
                    value: speed,
                });
            }
        }
    }

    report
}
