use camkit_core::data::materials::WorkMaterial;
use camkit_core::data::tools::*;

#[test]
fn test_spindle_speed_formula() {
    let tool = Tool::with_cutting_data(2, ToolKind::EndMill, 6.0, 3, 120.0, 0.08).unwrap();
    // 120 * 1000 / (pi * 6) = 6366.2
    assert_eq!(tool.spindle_speed_for(WorkMaterial::Other), 6366.0);
    // 120 * 1.2 * 1000 / (pi * 6) = 7639.4
    assert_eq!(tool.spindle_speed_for(WorkMaterial::Aluminum), 7639.0);
}

#[test]
fn test_feed_rate_uses_rounded_rpm() {
    let tool = Tool::with_cutting_data(2, ToolKind::EndMill, 6.0, 3, 120.0, 0.08).unwrap();
    // 6366 * 3 * 0.08 = 1527.84
    assert_eq!(tool.feed_rate_for(WorkMaterial::Other), 1528.0);
}

#[test]
fn test_standard_library() {
    let library = ToolLibrary::standard();
    assert_eq!(library.len(), 8);
    assert_eq!(library.get_tools_by_kind(ToolKind::EndMill).len(), 3);
    assert_eq!(library.get_tools_by_kind(ToolKind::Drill).len(), 2);

    let ball = library.get_tool(4).unwrap();
    assert_eq!(ball.kind, ToolKind::BallNose);
    assert_eq!(ball.diameter, 6.0);

    let drill = library.get_tool(5).unwrap();
    assert_eq!(drill.material, ToolMaterial::HSS);
    assert_eq!(library.next_tool_number(), 9);
}

#[test]
fn test_library_add_replace_remove() {
    let mut library = ToolLibrary::new();
    assert!(library.is_empty());
    assert_eq!(library.next_tool_number(), 1);

    let tool = Tool::new(3, ToolKind::EndMill, 4.0, 2).unwrap();
    assert!(library.add_tool(tool.clone()).is_none());
    let replaced = library.add_tool(tool.clone().with_description("replacement"));
    assert_eq!(replaced, Some(tool));
    assert_eq!(library.get_tool(3).unwrap().description, "replacement");

    assert!(library.remove_tool(3).is_some());
    assert!(library.get_tool(3).is_none());
}

#[test]
fn test_search_by_diameter() {
    let library = ToolLibrary::standard();
    let small = library.search_by_diameter(2.0, 4.0);
    assert_eq!(small.len(), 2);
    assert!(small.iter().all(|t| t.diameter <= 4.0));
}

#[test]
fn test_tool_json_round_trip() {
    let tool = Tool::new(7, ToolKind::FaceMill, 25.0, 3).unwrap();
    let json = serde_json::to_string(&tool).unwrap();
    assert!(json.contains("\"kind\":\"face_mill\""));
    let back: Tool = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tool);
}
