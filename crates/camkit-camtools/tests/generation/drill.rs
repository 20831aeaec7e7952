use camkit_camtools::{generate, optimize_drill_operation, DrillOp, Operation};
use camkit_core::{MotionType, Point2};

use crate::common::{cut_levels, drill_bit, end_mill};

#[test]
fn test_peck_drilling_retracts_after_every_peck() {
    let op = DrillOp::new(drill_bit(2, 5.0), vec![Point2::new(10.0, 10.0)], -15.0)
        .with_peck(4.0)
        .with_heights(5.0, 1.0);
    let toolpath = generate(&Operation::drill(op).unwrap()).unwrap();
    assert_eq!(cut_levels(&toolpath), vec![-4.0, -8.0, -12.0, -15.0]);

    let points = toolpath.points();
    for (index, point) in points.iter().enumerate() {
        if point.kind() == MotionType::Linear {
            let next = &points[index + 1];
            assert_eq!(next.kind(), MotionType::Rapid);
            assert!(next.z > 0.0);
        }
    }
    assert_eq!(points.last().unwrap().z, 5.0);
}

#[test]
fn test_every_hole_visited() {
    let targets = vec![
        Point2::new(0.0, 0.0),
        Point2::new(20.0, 0.0),
        Point2::new(20.0, 20.0),
    ];
    let op = DrillOp::new(drill_bit(4, 3.0), targets.clone(), -5.0);
    let toolpath = generate(&Operation::drill(op).unwrap()).unwrap();
    let bottoms: Vec<Point2> = toolpath
        .iter()
        .filter(|p| p.kind() == MotionType::Linear)
        .map(|p| Point2::new(p.x, p.y))
        .collect();
    assert_eq!(bottoms, targets);
    assert!(toolpath.iter().all(|p| p.tool_id == 4));
}

#[test]
fn test_reorder_drill_targets() {
    let op = DrillOp::new(
        drill_bit(2, 5.0),
        vec![
            Point2::new(30.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(50.0, 0.0),
            Point2::new(35.0, 0.0),
        ],
        -3.0,
    );
    let reordered = optimize_drill_operation(&Operation::drill(op).unwrap()).unwrap();
    let Operation::Drill(drill) = reordered else {
        panic!("expected a drill operation");
    };
    let xs: Vec<f64> = drill.points.iter().map(|p| p.x).collect();
    // The tour starts at the first target, not the nearest to the origin
    assert_eq!(xs, vec![30.0, 35.0, 50.0, 10.0]);
}

#[test]
fn test_reorder_rejects_pocket() {
    let pocket = camkit_camtools::PocketOp::new(
        end_mill(6.0),
        camkit_core::Polyline2::rectangle(0.0, 0.0, 40.0, 30.0),
        -2.0,
        1.0,
        0.5,
    );
    let op = Operation::pocket(pocket).unwrap();
    assert!(optimize_drill_operation(&op).is_err());
}
