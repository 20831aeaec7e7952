use camkit_camtools::{
    depth_levels, generate_all, CamToolError, DrillOp, Job, Operation, PocketOp,
};
use camkit_core::{Point2, Polyline2};
use proptest::prelude::*;

use crate::common::{drill_bit, end_mill};

fn drill_job() -> Operation {
    let op = DrillOp::new(drill_bit(2, 5.0), vec![Point2::new(5.0, 5.0)], -4.0);
    Operation::drill(op).unwrap()
}

#[test]
fn test_job_keeps_latest_toolpath() {
    let mut job = Job::new(drill_job());
    assert!(job.toolpath().is_none());
    let len = job.generate_toolpath().unwrap().len();
    assert_eq!(job.toolpath().map(|t| t.len()), Some(len));

    // A failing regeneration clears the stale result
    if let Operation::Drill(op) = &mut job.operation {
        op.points.clear();
    }
    assert!(matches!(
        job.generate_toolpath(),
        Err(CamToolError::Parameter(_))
    ));
    assert!(job.toolpath().is_none());
}

#[test]
fn test_generate_all_preserves_order() {
    let narrow = PocketOp::new(
        end_mill(6.0),
        Polyline2::rectangle(0.0, 0.0, 50.0, 4.0),
        -1.0,
        1.0,
        0.5,
    );
    let operations = vec![drill_job(), Operation::pocket(narrow).unwrap(), drill_job()];
    let results = generate_all(&operations);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert_eq!(results[0], results[2]);
}

#[test]
fn test_operation_json_is_tagged() {
    let json = serde_json::to_value(drill_job()).unwrap();
    assert_eq!(json["type"], "drill");
    let back: Operation = serde_json::from_value(json).unwrap();
    assert_eq!(back, drill_job());
}

proptest! {
    #[test]
    fn depth_levels_step_down_to_depth(depth in -200.0f64..-0.01, step in 0.05f64..20.0) {
        let levels = depth_levels(depth, step);
        prop_assert_eq!(*levels.last().unwrap(), depth);
        let mut previous = 0.0;
        for level in &levels {
            prop_assert!(*level < previous);
            prop_assert!(previous - level <= step + 1e-9);
            previous = *level;
        }
    }
}
