//! Contour (profile) toolpaths

use tracing::debug;

use camkit_core::{Point2, Polyline2, Toolpath};

use crate::error::{CamToolError, CamToolResult};
use crate::generator::{depth_levels, PathBuilder};
use crate::offset::{offset_closed, offset_open, OffsetLoop, PathVertex};
use crate::operation::{Compensation, ContourOp, LeadStrategy};

/// Which end of the path a lead move attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeadEnd {
    Start,
    End,
}

pub fn generate_contour(op: &ContourOp) -> CamToolResult<Toolpath> {
    let path = cut_path(op)?;
    let Some(first) = path.first() else {
        return Err(CamToolError::GeometryError(
            "contour produced an empty path".to_string(),
        ));
    };
    let start = first.point;

    let radius = op.cut.tool_radius();
    let centroid = op.geometry.centroid();
    let lead_in = lead_point(op.lead_in, &path, centroid, radius, LeadEnd::Start);
    let lead_out = lead_point(op.lead_out, &path, centroid, radius, LeadEnd::End);

    let mut builder = PathBuilder::start(&op.cut);
    for level in depth_levels(op.depth, op.step_down) {
        debug!("Contour pass at Z{:.3}", level);
        let entry = lead_in.unwrap_or(start);
        builder.rapid(entry.x, entry.y, op.cut.safe_z);
        builder.linear(entry.x, entry.y, level);
        if lead_in.is_some() {
            builder.linear(start.x, start.y, level);
        }
        builder.follow(&path[1..], level);
        if let Some(exit) = lead_out {
            builder.linear(exit.x, exit.y, level);
        }
        builder.rapid_z(op.cut.safe_z);
    }

    Ok(builder.finish())
}

/// The path the tool centre follows
///
/// Climb cutting with a clockwise (M3) spindle keeps the tool on the left of
/// travel: closed contours run clockwise for climb and counter-clockwise
/// otherwise. With computer compensation the tool sits outside a closed
/// contour, and on the left of travel for climb along an open one.
fn cut_path(op: &ContourOp) -> CamToolResult<Vec<PathVertex>> {
    let geometry = &op.geometry;
    let closed = geometry.closed && geometry.len() >= 3;
    let offset = op.cut.tool_radius() + op.stock_to_leave;

    let ring = match op.compensation {
        Compensation::Computer if closed => {
            let loops = offset_closed(geometry, offset)?;
            let ring = largest(loops).ok_or_else(|| {
                CamToolError::GeometryError("outside offset produced no loop".to_string())
            })?;
            start_near(ring, geometry)
        }
        Compensation::Computer => {
            let side = if op.climb { offset } else { -offset };
            let loops = offset_open(geometry, side)?;
            loops
                .into_iter()
                .max_by_key(OffsetLoop::len)
                .ok_or_else(|| {
                    CamToolError::GeometryError("open offset produced no path".to_string())
                })?
        }
        Compensation::Control | Compensation::None => OffsetLoop::from_polyline(geometry),
    };

    let ring = if closed {
        let ccw = ring.signed_area() > 0.0;
        if ccw == op.climb {
            ring.reversed()
        } else {
            ring
        }
    } else {
        ring
    };
    Ok(ring.to_path())
}

fn largest(loops: Vec<OffsetLoop>) -> Option<OffsetLoop> {
    loops.into_iter().max_by(|a, b| {
        a.signed_area()
            .abs()
            .total_cmp(&b.signed_area().abs())
    })
}

/// Rotate a closed loop so it starts at the vertex nearest the geometry's first point
fn start_near(ring: OffsetLoop, geometry: &Polyline2) -> OffsetLoop {
    let Some(target) = geometry.points.first() else {
        return ring;
    };
    let nearest = ring
        .vertices
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.point
                .distance_to(target)
                .total_cmp(&b.point.distance_to(target))
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    ring.rotated(nearest)
}

fn unit(dx: f64, dy: f64) -> Option<(f64, f64)> {
    let len = dx.hypot(dy);
    (len > 1e-12).then(|| (dx / len, dy / len))
}

/// Point `distance` away from the path start (or end) for a lead move
fn lead_point(
    strategy: LeadStrategy,
    path: &[PathVertex],
    centroid: Option<Point2>,
    distance: f64,
    end: LeadEnd,
) -> Option<Point2> {
    if path.len() < 2 {
        return None;
    }
    let (anchor, neighbour) = match end {
        LeadEnd::Start => (path[0].point, path[1].point),
        LeadEnd::End => (path[path.len() - 1].point, path[path.len() - 2].point),
    };
    // Direction of travel away from the anchor, out of the path
    let (tx, ty) = unit(anchor.x - neighbour.x, anchor.y - neighbour.y)?;

    let outward_normal = || {
        let (nx, ny) = (ty, -tx);
        match centroid {
            Some(c) if (anchor.x - c.x) * nx + (anchor.y - c.y) * ny < 0.0 => (-nx, -ny),
            _ => (nx, ny),
        }
    };

    let (dx, dy) = match strategy {
        LeadStrategy::None => return None,
        LeadStrategy::Tangent => (tx, ty),
        LeadStrategy::Perpendicular => outward_normal(),
        LeadStrategy::Radial => centroid
            .and_then(|c| unit(anchor.x - c.x, anchor.y - c.y))
            .unwrap_or_else(outward_normal),
    };
    Some(Point2::new(anchor.x + dx * distance, anchor.y + dy * distance))
}
