use camkit_camtools::{generate, CutSettings, DrillOp, Operation};
use camkit_core::{MachineLimits, Point2, Tool, ToolKind};
use camkit_post::{validate_gcode, PostProcessor};

#[test]
fn test_posted_program_validates() {
    let tool = Tool::new(2, ToolKind::Drill, 5.0, 2).unwrap();
    let op = DrillOp::new(
        CutSettings::new(tool, 150.0, 3000.0),
        vec![Point2::new(20.0, 20.0), Point2::new(-40.0, 60.0)],
        -8.0,
    )
    .with_peck(3.0);
    let operation = Operation::drill(op).unwrap();
    let toolpath = generate(&operation).unwrap();
    let program = PostProcessor::new()
        .generate_gcode(&toolpath, std::slice::from_ref(&operation), "generic_3axis")
        .unwrap();

    let report = validate_gcode(&program, &MachineLimits::default());
    assert!(report.is_clean(), "{:?}", report);
}

#[test]
fn test_small_machine_rejects_program() {
    let limits = MachineLimits {
        x_travel: 100.0,
        y_travel: 100.0,
        ..MachineLimits::default()
    };
    let report = validate_gcode("G0 X10 Y10\nG1 X60 Y10 F12000\n", &limits);
    assert!(!report.is_valid());
    assert_eq!(report.errors[0].line, Some(2));
    assert_eq!(report.warnings.len(), 1);
}
