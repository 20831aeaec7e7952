use camkit_core::{Motion, MotionType, Units};
use camkit_parser::{GcodeParser, DEFAULT_TOOL};

#[test]
fn test_sticky_coordinates_feed_and_spindle() {
    let program = "G21\nG90\nG0 X0 Y0 Z5\nM3 S12000\nG1 Z-1 F150\nX20\nY10 F600\nG0 Z5\n";
    let outcome = GcodeParser::new().parse(program);
    assert!(outcome.success);

    let points = outcome.toolpath.points();
    assert_eq!(points.len(), 5);

    assert_eq!(points[1].position(), [0.0, 0.0, -1.0]);
    assert_eq!(points[2].position(), [20.0, 0.0, -1.0]);
    assert_eq!(points[3].position(), [20.0, 10.0, -1.0]);

    assert_eq!(points[2].feed_rate, Some(150.0));
    assert_eq!(points[3].feed_rate, Some(600.0));
    assert_eq!(points[4].feed_rate, None);

    assert_eq!(points[0].spindle_speed, None);
    assert!(points[1..].iter().all(|p| p.spindle_speed == Some(12000.0)));
}

#[test]
fn test_point_kinds_and_counts() {
    let program = "G0 X0 Y0\nG1 X10 F100\nG2 X20 Y0 I5 J0\nG3 X10 Y0 R5\nG81 X5 Y5 Z-2 R1\nG80\nG4 P0.5\n";
    let outcome = GcodeParser::new().parse(program);
    let tp = &outcome.toolpath;

    assert_eq!(tp.count_of(MotionType::Rapid), 1);
    assert_eq!(tp.count_of(MotionType::Linear), 1);
    assert_eq!(tp.count_of(MotionType::Arc), 2);
    assert_eq!(tp.count_of(MotionType::Drill), 1);
    assert_eq!(tp.count_of(MotionType::Dwell), 1);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_arc_payload() {
    let outcome = GcodeParser::new().parse("G1 X0 Y0 F100\nG2 X10 Y0 I5 J0\n");
    let arc = &outcome.toolpath.points()[1];
    match arc.motion {
        Motion::Arc(params) => {
            assert_eq!(params.i, Some(5.0));
            assert_eq!(params.j, Some(0.0));
            assert_eq!(params.r, None);
        }
        _ => panic!("expected arc"),
    }
    assert_eq!(arc.feed_rate, Some(100.0));
}

#[test]
fn test_arc_without_center_warns_but_loads() {
    let outcome = GcodeParser::new().parse("G1 X0 F100\nG3 X5 Y5\n");
    assert_eq!(outcome.toolpath.len(), 2);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].line, Some(2));
}

#[test]
fn test_per_tool_segments() {
    let program = "G0 X0 Y0\nG1 X1 F100\nT2 M6\nG0 X5\nG1 X6\nT2\nG1 X7\nT3 M6\nT4 M6\nG1 X8\n";
    let outcome = GcodeParser::new().parse(program);

    let tools: Vec<Option<u32>> = outcome.toolpaths.iter().map(|t| t.tool_id).collect();
    assert_eq!(tools, vec![Some(DEFAULT_TOOL), Some(2), Some(4)]);
    assert_eq!(outcome.toolpaths[0].len(), 2);
    assert_eq!(outcome.toolpaths[1].len(), 3);
    assert_eq!(outcome.toolpaths[2].len(), 1);

    let total: usize = outcome.toolpaths.iter().map(|t| t.len()).sum();
    assert_eq!(total, outcome.toolpath.len());
    assert_eq!(outcome.toolpath.tool_id, None);
    assert!(outcome.toolpaths[1].iter().all(|p| p.tool_id == 2));

    let changes = outcome.tool_changes();
    assert_eq!(changes.len(), 3);
    assert_eq!(changes[0].from_tool, 1);
    assert_eq!(changes[0].to_tool, 2);
    assert_eq!(changes[2].to_tool, 4);
}

#[test]
fn test_single_tool_sets_flat_tool_id() {
    let outcome = GcodeParser::new()
        .with_initial_tool(5)
        .parse("G0 X0\nG1 X1 F100\n");
    assert_eq!(outcome.toolpath.tool_id, Some(5));
    assert_eq!(outcome.toolpaths.len(), 1);
}

#[test]
fn test_invalid_word_is_dropped_with_warning() {
    let outcome = GcodeParser::new().parse("G1 X1.2.3 Y4 F100\n");
    assert_eq!(outcome.toolpath.len(), 1);
    assert_eq!(outcome.toolpath.points()[0].position(), [0.0, 4.0, 0.0]);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].message.contains("'X'"));
}

#[test]
fn test_empty_and_garbage_input() {
    let outcome = GcodeParser::new().parse("");
    assert!(outcome.success);
    assert!(outcome.toolpath.is_empty());
    assert!(outcome.toolpaths.is_empty());

    let outcome = GcodeParser::new().parse("hello world\n???\n");
    assert!(outcome.success);
    assert!(outcome.toolpath.is_empty());
}

#[test]
fn test_units_reported() {
    assert_eq!(GcodeParser::new().parse("G20\nG1 X1 F10\n").units, Units::Inches);
    assert_eq!(GcodeParser::new().parse("G1 X1 F10\n").units, Units::Millimeters);
}

#[test]
fn test_machining_time_estimate() {
    // 60 mm at 600 mm/min cutting plus a 2 s dwell
    let outcome = GcodeParser::new().parse("G1 X60 F600\nG4 P2\n");
    let secs = outcome.estimate_machining_time();
    assert!((secs - 8.0).abs() < 1e-9, "got {}", secs);
}

#[test]
fn test_command_bounds_only_written_words() {
    let outcome = GcodeParser::new().parse("G0 X-5 Y2\nG1 X10 F100\nG1 Z-3\n");
    let bounds = outcome.command_bounds().unwrap();
    assert_eq!((bounds.min_x, bounds.max_x), (-5.0, 10.0));
    assert_eq!((bounds.min_y, bounds.max_y), (2.0, 2.0));
    assert_eq!((bounds.min_z, bounds.max_z), (-3.0, -3.0));

    assert!(GcodeParser::new().parse("M3 S100\n").command_bounds().is_none());
}
