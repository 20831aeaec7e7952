//! Toolpath analysis: cycle time and machine-limit verification

use std::time::Duration;

use camkit_core::{GcodeError, MachineLimits, MotionType, Toolpath, ValidationReport};

/// Moves shorter than this fraction of the tool diameter are flagged
const SHORT_MOVE_FACTOR: f64 = 0.1;

/// Estimated run time of a toolpath
pub fn calculate_cycle_time(toolpath: &Toolpath) -> Duration {
    Duration::try_from_secs_f64(toolpath.machining_time_secs()).unwrap_or(Duration::MAX)
}

/// Check a generated toolpath against the machine envelope
///
/// Rapids that start above Z0 and end below it, and very short consecutive linear moves are
/// warnings. Coordinates beyond an axis's travel are errors.
pub fn verify_toolpath(
    toolpath: &Toolpath,
    limits: &MachineLimits,
    tool_diameter: f64,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    let min_length = tool_diameter * SHORT_MOVE_FACTOR;
    let points = toolpath.points();

    for (index, point) in points.iter().enumerate() {
        let from_z = index.checked_sub(1).map_or(0.0, |i| points[i].z);
        if point.kind() == MotionType::Rapid && from_z > 0.0 && point.z < 0.0 {
            report.push_warning(GcodeError::RapidIntoMaterial { index });
        }

        if index > 0 && point.kind() == MotionType::Linear {
            let previous = &points[index - 1];
            if previous.kind() == MotionType::Linear {
                let length = previous.distance_to(point);
                if length < min_length {
                    report.push_warning(GcodeError::ShortMove { index, length });
                }
            }
        }

        let line_number = point.line.unwrap_or(index as u32 + 1);
        for (axis, value) in [('X', point.x), ('Y', point.y), ('Z', point.z)] {
            let Some(limit) = limits.travel(axis) else {
                continue;
            };
            if value.abs() > limit {
                report.push_error(GcodeError::CoordinateOutOfBounds {
                    line_number,
                    axis,
                    value,
                    limit,
                });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use camkit_core::MotionPoint;

    #[test]
    fn test_cycle_time() {
        let toolpath = Toolpath::from_points(vec![
            MotionPoint::linear(100.0, 0.0, 0.0).with_feed(600.0),
            MotionPoint::dwell([100.0, 0.0, 0.0], 2.0),
        ]);
        assert_eq!(calculate_cycle_time(&toolpath), Duration::from_secs(12));
    }

    #[test]
    fn test_rapid_into_material() {
        let toolpath = Toolpath::from_points(vec![
            MotionPoint::rapid(0.0, 0.0, 5.0),
            MotionPoint::rapid(0.0, 0.0, -1.0),
        ]);
        let report = verify_toolpath(&toolpath, &MachineLimits::default(), 6.0);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.contains("point 1"));
    }

    #[test]
    fn test_rapid_below_surface_not_flagged() {
        // Repositioning inside an open pocket never crosses the surface
        let toolpath = Toolpath::from_points(vec![
            MotionPoint::linear(0.0, 0.0, -2.0),
            MotionPoint::rapid(5.0, 0.0, -1.0),
        ]);
        let report = verify_toolpath(&toolpath, &MachineLimits::default(), 6.0);
        assert!(report.warnings.is_empty());

        // A first point has nothing above the surface to come from
        let toolpath = Toolpath::from_points(vec![MotionPoint::rapid(0.0, 0.0, -1.0)]);
        let report = verify_toolpath(&toolpath, &MachineLimits::default(), 6.0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_short_consecutive_moves() {
        let toolpath = Toolpath::from_points(vec![
            MotionPoint::linear(0.0, 0.0, -1.0),
            MotionPoint::linear(0.2, 0.0, -1.0),
            MotionPoint::linear(10.0, 0.0, -1.0),
        ]);
        let report = verify_toolpath(&toolpath, &MachineLimits::default(), 6.0);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.contains("point 1"));
    }

    #[test]
    fn test_out_of_travel() {
        let toolpath = Toolpath::from_points(vec![MotionPoint::linear(600.0, 0.0, 0.0)]);
        let report = verify_toolpath(&toolpath, &MachineLimits::default(), 6.0);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].line, Some(1));
        assert!(report.errors[0].message.contains("X axis"));
    }
}
