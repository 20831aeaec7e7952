use camkit_camtools::CutSettings;
use camkit_core::{Tool, ToolKind};

pub fn end_mill(diameter: f64) -> CutSettings {
    let tool = Tool::new(1, ToolKind::EndMill, diameter, 2).unwrap();
    CutSettings::new(tool, 800.0, 12000.0)
}

pub fn drill_bit(id: u32, diameter: f64) -> CutSettings {
    let tool = Tool::new(id, ToolKind::Drill, diameter, 2).unwrap();
    CutSettings::new(tool, 150.0, 2500.0)
}

/// Distinct Z values of feed moves, deepest last
pub fn cut_levels(toolpath: &camkit_core::Toolpath) -> Vec<f64> {
    let mut levels: Vec<f64> = toolpath
        .iter()
        .filter(|p| p.is_cutting() && p.z < 0.0)
        .map(|p| p.z)
        .collect();
    levels.sort_by(|a, b| b.total_cmp(a));
    levels.dedup();
    levels
}
