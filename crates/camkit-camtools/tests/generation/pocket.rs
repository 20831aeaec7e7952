use camkit_camtools::{
    generate, CamToolError, Operation, PocketOp, PocketPattern, RampStrategy,
};
use camkit_core::{MotionType, Point2, Polyline2};

use crate::common::{cut_levels, end_mill};

fn rectangle_pocket() -> PocketOp {
    PocketOp::new(
        end_mill(6.0),
        Polyline2::rectangle(0.0, 0.0, 40.0, 30.0),
        -10.0,
        3.0,
        0.5,
    )
}

#[test]
fn test_pocket_depth_levels() {
    let op = Operation::pocket(rectangle_pocket().with_ramp(RampStrategy::Plunge)).unwrap();
    let toolpath = generate(&op).unwrap();
    assert_eq!(cut_levels(&toolpath), vec![-3.0, -6.0, -9.0, -10.0]);
}

#[test]
fn test_pocket_stays_a_radius_inside() {
    for pattern in [PocketPattern::Zigzag, PocketPattern::Offset] {
        let op = Operation::pocket(rectangle_pocket().with_pattern(pattern)).unwrap();
        let toolpath = generate(&op).unwrap();
        for p in toolpath.iter().filter(|p| p.is_cutting()) {
            assert!(
                p.x >= 3.0 - 1e-6 && p.x <= 37.0 + 1e-6,
                "{:?}: x {} outside",
                pattern,
                p.x
            );
            assert!(
                p.y >= 3.0 - 1e-6 && p.y <= 27.0 + 1e-6,
                "{:?}: y {} outside",
                pattern,
                p.y
            );
        }
    }
}

#[test]
fn test_helical_entry() {
    let op = Operation::pocket(rectangle_pocket()).unwrap();
    let toolpath = generate(&op).unwrap();
    let center = Point2::new(20.0, 15.0);

    // First level: one entry point at the surface, then 6 revolutions of 24 segments
    let points = toolpath.points();
    let entry = points
        .iter()
        .position(|p| p.kind() == MotionType::Linear)
        .unwrap();
    assert_eq!(points[entry].z, 0.0);
    let helix = &points[entry + 1..=entry + 144];
    for p in helix {
        let r = Point2::new(p.x, p.y).distance_to(&center);
        assert!((r - 4.8).abs() < 1e-9);
    }
    assert!(helix.windows(2).all(|w| w[1].z < w[0].z));
    assert!((helix[143].z + 3.0).abs() < 1e-9);

    assert!(toolpath
        .iter()
        .filter(|p| p.kind() == MotionType::Rapid)
        .all(|p| p.z >= 0.0));
}

#[test]
fn test_pocket_narrower_than_tool() {
    let slot = PocketOp::new(
        end_mill(6.0),
        Polyline2::rectangle(0.0, 0.0, 50.0, 5.0),
        -2.0,
        1.0,
        0.5,
    );
    let op = Operation::pocket(slot).unwrap();
    assert!(matches!(generate(&op), Err(CamToolError::GeometryError(_))));
}

#[test]
fn test_step_over_range() {
    let op = PocketOp::new(
        end_mill(6.0),
        Polyline2::rectangle(0.0, 0.0, 40.0, 30.0),
        -2.0,
        1.0,
        1.5,
    );
    assert!(Operation::pocket(op).is_err());
}

fn wall_distance(boundary: &Polyline2, p: Point2) -> f64 {
    boundary
        .segments()
        .map(|(a, b)| {
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / (dx * dx + dy * dy)).clamp(0.0, 1.0);
            p.distance_to(&Point2::new(a.x + t * dx, a.y + t * dy))
        })
        .fold(f64::INFINITY, f64::min)
}

#[test]
fn test_zigzag_clears_slanted_walls() {
    let triangle = Polyline2::closed(vec![
        Point2::new(0.0, 0.0),
        Point2::new(60.0, 0.0),
        Point2::new(30.0, 40.0),
    ]);
    let op = PocketOp::new(end_mill(6.0), triangle.clone(), -2.0, 2.0, 0.5)
        .with_pattern(PocketPattern::Zigzag)
        .with_ramp(RampStrategy::Plunge);
    let toolpath = generate(&Operation::pocket(op).unwrap()).unwrap();

    let cuts: Vec<Point2> = toolpath
        .iter()
        .filter(|p| p.is_cutting())
        .map(|p| Point2::new(p.x, p.y))
        .collect();
    assert!(cuts.len() > 10);
    let closest = cuts
        .iter()
        .map(|p| wall_distance(&triangle, *p))
        .fold(f64::INFINITY, f64::min);
    assert!(closest >= 3.0 - 1e-6, "closest cut is {} from a wall", closest);
}
