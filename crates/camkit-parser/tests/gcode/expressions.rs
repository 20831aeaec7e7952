use camkit_parser::GcodeParser;

#[test]
fn test_variables_and_inline_expressions() {
    let program = "#1 = 10\n#2 = [#1 * 2]\nG1 X[#1 + 5] Y#2 F[#1 * 30]\n";
    let outcome = GcodeParser::new().parse(program);
    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);

    let point = &outcome.toolpath.points()[0];
    assert_eq!(point.position(), [15.0, 20.0, 0.0]);
    assert_eq!(point.feed_rate, Some(300.0));
}

#[test]
fn test_integer_division_is_fractional() {
    let outcome = GcodeParser::new().parse("G1 X[1/2] F100\n");
    assert_eq!(outcome.toolpath.points()[0].x, 0.5);
}

#[test]
fn test_nested_brackets() {
    let outcome = GcodeParser::new().parse("G1 X[[2 + 3] * [1 + 1]] F100\n");
    assert_eq!(outcome.toolpath.points()[0].x, 10.0);
}

#[test]
fn test_unresolved_variable_is_zero_with_warning() {
    let outcome = GcodeParser::new().parse("G1 X[#7 + 2] F100\n");
    assert_eq!(outcome.toolpath.points()[0].x, 2.0);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].message.contains("#7"));
}

#[test]
fn test_failed_expression_is_zero_with_warning() {
    let outcome = GcodeParser::new().parse("G1 X5 F100\nG1 Y[abc + 1]\n");
    let last = outcome.toolpath.last().unwrap();
    assert_eq!(last.position(), [5.0, 0.0, 0.0]);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].line, Some(2));
}
