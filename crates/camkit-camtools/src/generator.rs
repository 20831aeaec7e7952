//! Toolpath generation entry points
//!
//! [`generate`] dispatches on the operation variant. Every generated path
//! starts with a rapid to `(0, 0, clearance_z)` and carries the tool id,
//! spindle speed and feed rate on its points.

use rayon::prelude::*;
use tracing::info;

use camkit_core::{ArcParams, MotionPoint, Point2, Toolpath};

use crate::error::CamToolResult;
use crate::offset::PathVertex;
use crate::operation::{CutSettings, Operation};
use crate::{contour, drill, pocket};

/// Residue below which the last pass is snapped to the final depth
const LEVEL_EPSILON: f64 = 1e-9;

/// Z levels for stepping down to `depth`
///
/// Returns `-s, -2s, ...` with the last level clipped to `depth` exactly. A
/// zero depth gives a single pass at the surface.
pub fn depth_levels(depth: f64, step_down: f64) -> Vec<f64> {
    if depth >= 0.0 || step_down <= 0.0 || !step_down.is_finite() {
        return vec![depth.min(0.0)];
    }
    let mut levels = Vec::new();
    let mut pass = 1u32;
    loop {
        let z = -step_down * pass as f64;
        if z <= depth + LEVEL_EPSILON {
            levels.push(depth);
            return levels;
        }
        levels.push(z);
        pass += 1;
    }
}

/// Generate the toolpath for one operation
pub fn generate(operation: &Operation) -> CamToolResult<Toolpath> {
    operation.validate()?;
    let toolpath = match operation {
        Operation::Contour(op) => contour::generate_contour(op)?,
        Operation::Pocket(op) => pocket::generate_pocket(op)?,
        Operation::Drill(op) => drill::generate_drill(op)?,
    };
    info!(
        "Generated {} toolpath: {} points, {:.1} mm, tool T{}",
        operation.name(),
        toolpath.len(),
        toolpath.length(),
        operation.tool().id
    );
    Ok(toolpath)
}

/// Generate independent operations in parallel, results in input order
pub fn generate_all(operations: &[Operation]) -> Vec<CamToolResult<Toolpath>> {
    operations.par_iter().map(generate).collect()
}

/// Appends moves with the operation's tool, spindle and feed applied
pub(crate) struct PathBuilder {
    toolpath: Toolpath,
    tool_id: u32,
    feed_rate: f64,
    spindle_speed: f64,
    position: [f64; 3],
}

impl PathBuilder {
    /// Start a path with the initial rapid to `(0, 0, clearance_z)`
    pub(crate) fn start(cut: &CutSettings) -> Self {
        let mut builder = Self {
            toolpath: Toolpath::for_tool(cut.tool.id, cut.tool.diameter),
            tool_id: cut.tool.id,
            feed_rate: cut.feed_rate,
            spindle_speed: cut.spindle_speed,
            position: [0.0, 0.0, cut.clearance_z],
        };
        builder.rapid(0.0, 0.0, cut.clearance_z);
        builder
    }

    pub(crate) fn position(&self) -> [f64; 3] {
        self.position
    }

    pub(crate) fn xy(&self) -> Point2 {
        Point2::new(self.position[0], self.position[1])
    }

    fn push(&mut self, point: MotionPoint) {
        self.position = point.position();
        self.toolpath
            .push(point.with_tool(self.tool_id).with_spindle(self.spindle_speed));
    }

    pub(crate) fn rapid(&mut self, x: f64, y: f64, z: f64) {
        self.push(MotionPoint::rapid(x, y, z));
    }

    /// Rapid straight up (or down) to `z` at the current XY
    pub(crate) fn rapid_z(&mut self, z: f64) {
        let [x, y, _] = self.position;
        self.rapid(x, y, z);
    }

    pub(crate) fn linear(&mut self, x: f64, y: f64, z: f64) {
        let feed = self.feed_rate;
        self.linear_at(x, y, z, feed);
    }

    pub(crate) fn linear_at(&mut self, x: f64, y: f64, z: f64, feed: f64) {
        self.push(MotionPoint::linear(x, y, z).with_feed(feed));
    }

    pub(crate) fn dwell(&mut self, seconds: f64) {
        self.push(MotionPoint::dwell(self.position, seconds));
    }

    /// Follow a path at height `z`; the first vertex is reached with a linear move
    pub(crate) fn follow(&mut self, path: &[PathVertex], z: f64) {
        for vertex in path {
            match vertex.arc {
                Some(arc) => {
                    let [sx, sy, _] = self.position;
                    let params =
                        ArcParams::center(arc.direction, arc.center.x - sx, arc.center.y - sy);
                    let point = MotionPoint::arc(vertex.point.x, vertex.point.y, z, params)
                        .with_feed(self.feed_rate);
                    self.push(point);
                }
                None => self.linear(vertex.point.x, vertex.point.y, z),
            }
        }
    }

    pub(crate) fn finish(self) -> Toolpath {
        self.toolpath
    }
}
