use camkit_parser::{optimize, GcodeParser, ParsedCommand};
use proptest::prelude::*;

#[test]
fn test_to_line_reparses_to_same_toolpath() {
    let program = "G21 G90\nG0 X0 Y0 Z5\nG1 Z-1.5 F120 S8000\nG2 X10 Y0 I5 J0\nG1 X10.125 Y-3\n";
    let first = GcodeParser::new().parse(program);
    let rendered: Vec<String> = first.commands.iter().map(ParsedCommand::to_line).collect();
    let second = GcodeParser::new().parse(&rendered.join("\n"));
    assert_eq!(first.toolpath.points().len(), second.toolpath.points().len());
    for (a, b) in first.toolpath.iter().zip(second.toolpath.iter()) {
        assert_eq!(a.position(), b.position());
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.feed_rate, b.feed_rate);
    }
}

#[test]
fn test_optimized_program_keeps_positions() {
    let program = "G0 X0 Y0\nG1 X10 Y0 F100\nG1 X10 Y10\nG1 X0 Y10\nG1 X0 Y0\n";
    let first = GcodeParser::new().parse(program);
    let lines: Vec<String> = optimize(&first.commands)
        .iter()
        .map(ParsedCommand::to_line)
        .collect();
    let second = GcodeParser::new().parse(&lines.join("\n"));
    let a: Vec<[f64; 3]> = first.toolpath.iter().map(|p| p.position()).collect();
    let b: Vec<[f64; 3]> = second.toolpath.iter().map(|p| p.position()).collect();
    assert_eq!(a, b);
}

proptest! {
    #[test]
    fn parse_never_panics(text in "\\PC{0,200}") {
        let outcome = GcodeParser::new().parse(&text);
        prop_assert!(outcome.success);
    }

    #[test]
    fn parse_never_panics_on_gcode_like_text(
        lines in prop::collection::vec("[GMXYZFSTIJKR#\\[\\] 0-9.\\-+*/=]{0,24}", 0..30)
    ) {
        let outcome = GcodeParser::new().parse(&lines.join("\n"));
        let total: usize = outcome.toolpaths.iter().map(|t| t.len()).sum();
        prop_assert_eq!(total, outcome.toolpath.len());
    }

    #[test]
    fn optimize_is_idempotent(
        moves in prop::collection::vec((0u8..2, -50i32..50, -50i32..50), 1..25)
    ) {
        let program: Vec<String> = moves
            .iter()
            .map(|(g, x, y)| format!("G{} X{} Y{} F100", g, x, y))
            .collect();
        let parsed = GcodeParser::new().parse(&program.join("\n"));
        let once = optimize(&parsed.commands);
        let twice = optimize(&once);
        prop_assert_eq!(once, twice);
    }
}
