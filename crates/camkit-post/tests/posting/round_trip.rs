use camkit_camtools::{generate, ContourOp, CutSettings, Operation};
use camkit_core::{MotionPoint, MotionType, Polyline2, Tool, ToolKind, Toolpath};
use camkit_parser::GcodeParser;
use camkit_post::PostProcessor;

fn square_path() -> Toolpath {
    let points = [
        MotionPoint::rapid(0.0, 0.0, 5.0),
        MotionPoint::rapid(10.0, 10.0, 5.0),
        MotionPoint::linear(10.0, 10.0, -1.5).with_feed(200.0),
        MotionPoint::linear(30.0, 10.0, -1.5).with_feed(600.0),
        MotionPoint::linear(30.0, 25.5, -1.5).with_feed(600.0),
        MotionPoint::linear(10.0, 25.5, -1.5).with_feed(600.0),
        MotionPoint::linear(10.0, 10.0, -1.5).with_feed(600.0),
        MotionPoint::rapid(10.0, 10.0, 5.0),
    ];
    Toolpath::from_points(
        points
            .into_iter()
            .map(|p| p.with_tool(1).with_spindle(10000.0))
            .collect(),
    )
}

#[test]
fn test_round_trip_positions_and_kinds() {
    let toolpath = square_path();
    for dialect in ["generic_3axis", "fanuc", "haas", "mach3", "linuxcnc", "grbl"] {
        let program = PostProcessor::new()
            .generate_gcode(&toolpath, &[], dialect)
            .unwrap();
        let parsed = GcodeParser::new().parse(&program);
        assert!(parsed.warnings.is_empty(), "{}: {:?}", dialect, parsed.warnings);

        // Two safety moves before the body, two return moves after it
        let points = parsed.toolpath.points();
        assert_eq!(points.len(), toolpath.len() + 4, "{}", dialect);
        for (original, reparsed) in toolpath.iter().zip(&points[2..]) {
            assert_eq!(original.position(), reparsed.position(), "{}", dialect);
            assert_eq!(original.kind(), reparsed.kind(), "{}", dialect);
        }
        assert_eq!(points[4].feed_rate, Some(200.0));
        assert_eq!(points[5].feed_rate, Some(600.0));
    }
}

#[test]
fn test_sticky_words_written_once() {
    let program = PostProcessor::new()
        .generate_gcode(&square_path(), &[], "generic_3axis")
        .unwrap();
    assert_eq!(program.matches("F600.000").count(), 1);
    assert_eq!(program.matches("S10000").count(), 1);
    assert_eq!(program.matches("T1 M6").count(), 1);
    assert_eq!(program.matches("G1 ").count(), 1);
}

#[test]
fn test_tool_change_between_runs() {
    let mut toolpath = square_path();
    let second: Vec<MotionPoint> = square_path()
        .into_points()
        .into_iter()
        .map(|p| p.with_tool(2).with_spindle(8000.0))
        .collect();
    toolpath.extend(second);

    let program = PostProcessor::new()
        .generate_gcode(&toolpath, &[], "grbl")
        .unwrap();
    let lines: Vec<&str> = program.lines().collect();
    let t2 = lines.iter().position(|l| *l == "T2 M6").unwrap();
    assert_eq!(lines[t2 + 1], "S8000");

    let parsed = GcodeParser::new().parse(&program);
    assert_eq!(parsed.toolpath.tool_ids(), vec![1, 2]);
}

#[test]
fn test_generated_contour_arcs_survive_posting() {
    let tool = Tool::new(1, ToolKind::EndMill, 6.0, 2).unwrap();
    let op = ContourOp::new(
        CutSettings::new(tool, 800.0, 12000.0),
        Polyline2::rectangle(10.0, 10.0, 30.0, 30.0),
        -2.0,
        2.0,
    );
    let operation = Operation::contour(op).unwrap();
    let toolpath = generate(&operation).unwrap();
    let program = PostProcessor::new()
        .generate_gcode(&toolpath, std::slice::from_ref(&operation), "linuxcnc")
        .unwrap();
    assert!(program.contains("(Tool Table)"));

    let parsed = GcodeParser::new().parse(&program);
    assert_eq!(
        parsed.toolpath.count_of(MotionType::Arc),
        toolpath.count_of(MotionType::Arc)
    );
    let last_cut = toolpath.iter().filter(|p| p.is_cutting()).last().unwrap();
    let reparsed = parsed.toolpath.iter().filter(|p| p.is_cutting()).last().unwrap();
    assert!((last_cut.x - reparsed.x).abs() < 1e-3);
    assert!((last_cut.y - reparsed.y).abs() < 1e-3);
}
