use camkit_core::{MotionPoint, Toolpath, Units};
use camkit_post::{PostProcessor, SetupSheet};

fn short_path() -> Toolpath {
    Toolpath::from_points(vec![
        MotionPoint::rapid(0.0, 0.0, 5.0).with_tool(1),
        MotionPoint::linear(10.0, 0.0, -1.0)
            .with_tool(1)
            .with_feed(500.0)
            .with_spindle(9000.0),
        MotionPoint::dwell([10.0, 0.0, -1.0], 0.5).with_tool(1),
    ])
}

#[test]
fn test_fanuc_framing_and_trailing_points() {
    let program = PostProcessor::new()
        .generate_gcode(&short_path(), &[], "fanuc")
        .unwrap();
    let lines: Vec<&str> = program.lines().collect();
    assert_eq!(lines[0], "%");
    assert_eq!(lines[1], "O1000");
    assert_eq!(*lines.last().unwrap(), "%");
    assert!(lines.contains(&"G0 Z10."));
    assert!(lines.contains(&"G4 P0.5"));
    assert!(program.contains("X10. Y0. Z-1. F500."));
}

#[test]
fn test_generic_preamble_and_footer() {
    let program = PostProcessor::new()
        .generate_gcode(&short_path(), &[], "generic_3axis")
        .unwrap();
    let lines: Vec<&str> = program.lines().collect();
    assert_eq!(lines[0], "G17 G21 G40 G49 G54 G80 G90 G94");
    assert_eq!(lines[1], "G0 Z10.000");
    assert_eq!(lines[2], "X0.000 Y0.000");
    assert_eq!(&lines[lines.len() - 4..], ["M5", "G0 Z10.000", "X0.000 Y0.000", "M30"]);
}

#[test]
fn test_unknown_dialect_falls_back() {
    let post = PostProcessor::new();
    let fallback = post
        .generate_gcode(&short_path(), &[], "sinumerik")
        .unwrap();
    let generic = post
        .generate_gcode(&short_path(), &[], "generic_3axis")
        .unwrap();
    assert_eq!(fallback, generic);
}

#[test]
fn test_overrides() {
    let program = PostProcessor::new()
        .with_units(Units::Inches)
        .with_decimals(Some(1))
        .with_safe_z(0.5)
        .generate_gcode(&short_path(), &[], "mach3")
        .unwrap();
    assert!(program.contains("(File created: "));
    assert!(program.contains("G17 G20"));
    assert!(program.contains("G0 Z0.5"));
    assert!(program.contains("X10.0 Y0.0 Z-1.0 F500.0"));
}

#[test]
fn test_setup_sheet_serializes() {
    let post = PostProcessor::new();
    let toolpath = short_path();
    let program = post.generate_gcode(&toolpath, &[], "haas").unwrap();
    let sheet = post.setup_sheet(&program, &toolpath, &[], "haas");
    assert_eq!(sheet.program.post_processor, "Haas Compatible");
    assert_eq!(sheet.program.total_lines, program.lines().count());

    let json = serde_json::to_string(&sheet).unwrap();
    let back: SetupSheet = serde_json::from_str(&json).unwrap();
    assert_eq!(back.program, sheet.program);
    assert_eq!(back.safety_notes, sheet.safety_notes);
    assert!((back.estimated_time_secs - sheet.estimated_time_secs).abs() < 1e-9);
}
