//! Pocket clearing toolpaths
//!
//! Each depth level is entered with a helical ramp (or a plunge at half
//! feed), cleared with either a zigzag raster or concentric offset rings,
//! and finished with a rapid retract to the safe height.

use std::f64::consts::TAU;

use tracing::debug;

use camkit_core::{Point2, Polyline2, Toolpath};

use crate::error::{CamToolError, CamToolResult};
use crate::generator::{depth_levels, PathBuilder};
use crate::offset::{inset_rings, offset_closed, PathVertex};
use crate::operation::{HelixSettings, PocketOp, PocketPattern, RampStrategy};

/// Helix radius as a multiple of the tool diameter
pub const HELIX_RADIUS_FACTOR: f64 = 0.8;

const MAX_PASSES: usize = 100_000;
const MAX_RINGS: usize = 10_000;
const EPSILON: f64 = 1e-9;
/// Chord error allowed when scanning arcs of the inset region
const ARC_TOLERANCE: f64 = 1e-4;
const SCAN_NUDGE: f64 = 1e-7;
/// Shorter clearing passes are dropped
const MIN_PASS: f64 = 1e-6;

/// A straight clearing pass at constant Y
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pass {
    pub start: Point2,
    pub end: Point2,
}

/// Clearing moves for one level, already ordered
#[derive(Debug, Clone, PartialEq)]
enum Clearing {
    /// Raster rows; passes alternate direction row to row
    Rows(Vec<Vec<Pass>>),
    /// Closed loops, innermost first; each inner list is one ring
    Rings(Vec<Vec<Vec<PathVertex>>>),
}

impl Clearing {
    fn is_empty(&self) -> bool {
        match self {
            Clearing::Rows(rows) => rows.iter().all(Vec::is_empty),
            Clearing::Rings(rings) => rings.is_empty(),
        }
    }

    fn first_point(&self) -> Option<Point2> {
        match self {
            Clearing::Rows(rows) => rows.iter().flatten().next().map(|p| p.start),
            Clearing::Rings(rings) => rings
                .iter()
                .flatten()
                .next()
                .and_then(|path| path.first())
                .map(|v| v.point),
        }
    }
}

pub fn generate_pocket(op: &PocketOp) -> CamToolResult<Toolpath> {
    let inset = op.cut.tool_radius() + op.stock_to_leave;
    let step = op.step_distance();

    let clearing = match op.pattern {
        PocketPattern::Zigzag => Clearing::Rows(zigzag_passes(&op.boundary, inset, step)?),
        PocketPattern::Offset => {
            let mut rings = inset_rings(&op.boundary, inset, step, MAX_RINGS)?;
            rings.reverse();
            Clearing::Rings(
                rings
                    .iter()
                    .map(|ring| ring.iter().map(|l| l.to_path()).collect())
                    .collect(),
            )
        }
    };
    let start = match clearing.first_point() {
        Some(p) if !clearing.is_empty() => p,
        _ => {
            return Err(CamToolError::GeometryError(format!(
                "pocket is too narrow for a {} mm tool",
                op.cut.tool.diameter
            )))
        }
    };
    let center = op.boundary.centroid().ok_or_else(|| {
        CamToolError::GeometryError("pocket boundary has no points".to_string())
    })?;

    let safe_z = op.cut.safe_z;
    let helix_radius = op.cut.tool.diameter * HELIX_RADIUS_FACTOR;
    let mut builder = PathBuilder::start(&op.cut);
    let mut previous = 0.0;

    for level in depth_levels(op.depth, op.step_down) {
        debug!("Pocket level Z{:.3}", level);
        match op.ramp {
            RampStrategy::Helical => {
                helix(&mut builder, center, helix_radius, previous, level, &op.helix, safe_z)
            }
            RampStrategy::Plunge => {
                builder.rapid(start.x, start.y, safe_z);
                builder.linear_at(start.x, start.y, level, op.cut.feed_rate / 2.0);
            }
        }
        clear(&mut builder, &clearing, level, safe_z);
        builder.rapid_z(safe_z);
        previous = level;
    }

    Ok(builder.finish())
}

/// Helical ramp from `from_z` down to `to_z` around `center`
///
/// Makes `ceil(|to_z| / pitch)` revolutions (at least one) of straight
/// segments and ends back at `(center.x + radius, center.y)`.
fn helix(
    builder: &mut PathBuilder,
    center: Point2,
    radius: f64,
    from_z: f64,
    to_z: f64,
    settings: &HelixSettings,
    safe_z: f64,
) {
    let revolutions = ((to_z.abs() / settings.pitch).ceil() as u32).max(1);
    let per_rev = settings.segments_per_revolution;
    let total = revolutions * per_rev;

    builder.rapid(center.x + radius, center.y, safe_z);
    builder.linear(center.x + radius, center.y, from_z);
    for i in 1..=total {
        let angle = TAU * i as f64 / per_rev as f64;
        let z = from_z + (to_z - from_z) * i as f64 / total as f64;
        builder.linear(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
            z,
        );
    }
}

/// Move to `target` at `z`, cutting straight across or lifting over
fn link(builder: &mut PathBuilder, target: Point2, z: f64, safe_z: f64, lift: bool) {
    let [_, _, current_z] = builder.position();
    if builder.xy().distance_to(&target) < EPSILON && (current_z - z).abs() < EPSILON {
        return;
    }
    if lift {
        builder.rapid_z(safe_z);
        builder.rapid(target.x, target.y, safe_z);
    }
    builder.linear(target.x, target.y, z);
}

fn clear(builder: &mut PathBuilder, clearing: &Clearing, z: f64, safe_z: f64) {
    match clearing {
        Clearing::Rows(rows) => {
            let mut previous_len = 0;
            let mut first = true;
            for row in rows.iter().filter(|r| !r.is_empty()) {
                for (index, pass) in row.iter().enumerate() {
                    // Single passes on adjacent rows are linked with a stepover cut
                    let lift = !first && (index > 0 || row.len() > 1 || previous_len > 1);
                    link(builder, pass.start, z, safe_z, lift);
                    builder.linear(pass.end.x, pass.end.y, z);
                    first = false;
                }
                previous_len = row.len();
            }
        }
        Clearing::Rings(rings) => {
            let mut first = true;
            for ring in rings {
                for (index, path) in ring.iter().enumerate() {
                    let Some(start) = path.first() else {
                        continue;
                    };
                    link(builder, start.point, z, safe_z, !first && index > 0);
                    builder.follow(&path[1..], z);
                    first = false;
                }
            }
        }
    }
}

/// X intervals where the scanline at `y` is inside the region bounded by `edges`
fn scanline_intervals(edges: &[(Point2, Point2)], y: f64) -> Vec<(f64, f64)> {
    let mut xs: Vec<f64> = edges
        .iter()
        .filter(|(a, b)| (a.y <= y && y < b.y) || (b.y <= y && y < a.y))
        .map(|(a, b)| a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y))
        .collect();
    xs.sort_by(f64::total_cmp);
    xs.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Edges of the region whose points are at least `inset` from every wall
fn inset_region(boundary: &Polyline2, inset: f64) -> CamToolResult<Vec<(Point2, Point2)>> {
    let loops = offset_closed(boundary, -inset)?;
    Ok(loops
        .iter()
        .flat_map(|l| {
            let ring = Polyline2::closed(l.flattened(ARC_TOLERANCE));
            ring.segments().collect::<Vec<_>>()
        })
        .collect())
}

/// Raster passes over the part of the boundary at least `inset` from its walls
///
/// Rows run across the inset region from its lowest to its highest Y at
/// `step` spacing, with a final row on the upper limit. Odd rows run right
/// to left.
pub fn zigzag_passes(boundary: &Polyline2, inset: f64, step: f64) -> CamToolResult<Vec<Vec<Pass>>> {
    let edges = inset_region(boundary, inset)?;
    let span = edges.iter().map(|(a, _)| a.y).fold(None, |acc, y| match acc {
        Some((lo, hi)) => Some((f64::min(lo, y), f64::max(hi, y))),
        None => Some((y, y)),
    });
    let Some((low, high)) = span else {
        return Ok(Vec::new());
    };

    let mut ys = Vec::new();
    let mut y = low;
    while y <= high + EPSILON {
        ys.push(y.min(high));
        if ys.len() > MAX_PASSES {
            return Err(CamToolError::GenerationFailed(format!(
                "more than {} clearing rows",
                MAX_PASSES
            )));
        }
        y = low + step * ys.len() as f64;
    }
    if ys.last().is_some_and(|last| high - last > EPSILON) {
        ys.push(high);
    }

    let rows = ys
        .iter()
        .enumerate()
        .map(|(row, &y)| {
            // Rows on the region's top or bottom edge are sampled just inside it
            let y = y.clamp(low + SCAN_NUDGE, (high - SCAN_NUDGE).max(low + SCAN_NUDGE));
            let mut passes: Vec<Pass> = scanline_intervals(&edges, y)
                .into_iter()
                .filter(|(x0, x1)| x1 - x0 >= MIN_PASS)
                .map(|(x0, x1)| Pass {
                    start: Point2::new(x0, y),
                    end: Point2::new(x1, y),
                })
                .collect();
            if row % 2 == 1 {
                passes.reverse();
                for pass in &mut passes {
                    std::mem::swap(&mut pass.start, &mut pass.end);
                }
            }
            passes
        })
        .collect();
    Ok(rows)
}
