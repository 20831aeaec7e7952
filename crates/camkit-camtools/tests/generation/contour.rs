use camkit_camtools::{
    generate, verify_toolpath, Compensation, ContourOp, LeadStrategy, Operation,
};
use camkit_core::{MachineLimits, MotionType, Point2, Polyline2};

use crate::common::{cut_levels, end_mill};

fn square_contour() -> ContourOp {
    ContourOp::new(
        end_mill(6.0),
        Polyline2::rectangle(10.0, 10.0, 30.0, 30.0),
        -3.0,
        1.5,
    )
}

#[test]
fn test_outside_contour_clears_part_by_radius() {
    let op = Operation::contour(square_contour()).unwrap();
    let toolpath = generate(&op).unwrap();
    assert_eq!(cut_levels(&toolpath), vec![-1.5, -3.0]);

    // Every vertex of the compensated path is at least a radius from the part
    for p in toolpath.iter().filter(|p| p.is_cutting()) {
        let dx = (10.0 - p.x).max(p.x - 40.0).max(0.0);
        let dy = (10.0 - p.y).max(p.y - 40.0).max(0.0);
        assert!(dx.hypot(dy) >= 3.0 - 1e-6, "({}, {}) too close", p.x, p.y);
    }
}

#[test]
fn test_arc_centers_on_part_corners() {
    let op = Operation::contour(square_contour()).unwrap();
    let toolpath = generate(&op).unwrap();
    let points = toolpath.points();
    let corners = [
        Point2::new(10.0, 10.0),
        Point2::new(40.0, 10.0),
        Point2::new(40.0, 40.0),
        Point2::new(10.0, 40.0),
    ];
    for (index, point) in points.iter().enumerate() {
        if let camkit_core::Motion::Arc(arc) = point.motion {
            let start = &points[index - 1];
            let center = Point2::new(start.x + arc.i.unwrap(), start.y + arc.j.unwrap());
            assert!(corners.iter().any(|c| c.distance_to(&center) < 1e-6));
        }
    }
}

#[test]
fn test_control_compensation_keeps_nominal_geometry() {
    let op = square_contour().with_compensation(Compensation::Control);
    let toolpath = generate(&Operation::contour(op).unwrap()).unwrap();
    assert_eq!(toolpath.count_of(MotionType::Arc), 0);
    for p in toolpath.iter().filter(|p| p.is_cutting()) {
        assert!(p.x == 10.0 || p.x == 40.0 || p.y == 10.0 || p.y == 40.0);
    }
}

#[test]
fn test_lead_in_plunges_off_the_path() {
    let op = square_contour()
        .with_compensation(Compensation::None)
        .with_leads(LeadStrategy::Radial, LeadStrategy::Radial);
    let toolpath = generate(&Operation::contour(op).unwrap()).unwrap();
    let plunge = toolpath
        .iter()
        .find(|p| p.kind() == MotionType::Linear)
        .unwrap();
    // Radial from the centroid (25, 25) through the start corner (10, 10)
    let expected = 10.0 - 3.0 / 2f64.sqrt();
    assert!((plunge.x - expected).abs() < 1e-9);
    assert!((plunge.y - expected).abs() < 1e-9);
    assert_eq!(plunge.z, -1.5);
}

#[test]
fn test_generated_contour_verifies_clean() {
    let op = Operation::contour(square_contour()).unwrap();
    let toolpath = generate(&op).unwrap();
    let report = verify_toolpath(&toolpath, &MachineLimits::default(), 6.0);
    assert!(report.is_valid());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_degenerate_geometry_rejected() {
    let op = ContourOp::new(
        end_mill(6.0),
        Polyline2::new(vec![Point2::new(1.0, 1.0)], false),
        -1.0,
        1.0,
    );
    assert!(Operation::contour(op).is_err());
}

#[test]
fn test_climb_cuts_with_tool_left_of_travel() {
    let line = Polyline2::new(vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)], false);
    let op = Operation::contour(ContourOp::new(end_mill(4.0), line, -1.0, 1.0)).unwrap();
    let toolpath = generate(&op).unwrap();
    let cuts: Vec<(f64, f64)> = toolpath
        .iter()
        .filter(|p| p.is_cutting())
        .map(|p| (p.x, p.y))
        .collect();
    assert!(!cuts.is_empty());
    assert!(cuts.iter().all(|(_, y)| (y - 2.0).abs() < 1e-9), "{:?}", cuts);
    assert!((cuts[0].0 - 0.0).abs() < 1e-9);
    assert!((cuts[cuts.len() - 1].0 - 10.0).abs() < 1e-9);
}

#[test]
fn test_climb_outside_contour_runs_clockwise() {
    let op = Operation::contour(square_contour().with_compensation(Compensation::None)).unwrap();
    let toolpath = generate(&op).unwrap();
    let level: Vec<Point2> = toolpath
        .iter()
        .filter(|p| p.is_cutting() && p.z == -1.5)
        .map(|p| Point2::new(p.x, p.y))
        .collect();
    assert!(Polyline2::closed(level).signed_area() < 0.0);
}
