//! Polyline offsetting
//!
//! Thin layer over `cavalier_contours` that converts between [`Polyline2`]
//! and cavalier polylines, normalizes the offset side, and turns bulge
//! segments into arc moves with centre offsets.

use std::panic;

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use tracing::warn;

use camkit_core::{ArcDirection, Point2, Polyline2};

use crate::error::{CamToolError, CamToolResult};

/// Bulges smaller than this are treated as straight segments
const BULGE_EPSILON: f64 = 1e-9;

/// A vertex of an offset result; `bulge` describes the segment to the next vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetVertex {
    pub point: Point2,
    pub bulge: f64,
}

/// Arc move into a path vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcMove {
    pub direction: ArcDirection,
    pub center: Point2,
}

/// Target of one move along a path; `arc` is `None` for straight moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathVertex {
    pub point: Point2,
    pub arc: Option<ArcMove>,
}

impl PathVertex {
    pub fn line(point: Point2) -> Self {
        Self { point, arc: None }
    }
}

/// One polyline produced by an offset
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetLoop {
    pub vertices: Vec<OffsetVertex>,
    pub closed: bool,
}

impl OffsetLoop {
    fn from_cavalier(pline: &Polyline<f64>) -> Self {
        Self {
            vertices: pline
                .vertex_data
                .iter()
                .map(|v| OffsetVertex {
                    point: Point2::new(v.x, v.y),
                    bulge: v.bulge,
                })
                .collect(),
            closed: pline.is_closed(),
        }
    }

    /// Straight-edge loop with no arcs
    pub fn from_polyline(polyline: &Polyline2) -> Self {
        Self {
            vertices: polyline
                .points
                .iter()
                .map(|p| OffsetVertex {
                    point: *p,
                    bulge: 0.0,
                })
                .collect(),
            closed: polyline.closed,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Shoelace area over the vertices (arcs approximated by their chords)
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.vertices[i].point;
            let b = self.vertices[(i + 1) % n].point;
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    /// Same path travelled in the opposite direction
    pub fn reversed(&self) -> Self {
        let n = self.vertices.len();
        if n == 0 {
            return self.clone();
        }
        let vertices = if self.closed {
            (0..n)
                .map(|k| {
                    let index = (n - k) % n;
                    let incoming = (n + index - 1) % n;
                    OffsetVertex {
                        point: self.vertices[index].point,
                        bulge: -self.vertices[incoming].bulge,
                    }
                })
                .collect()
        } else {
            (0..n)
                .rev()
                .map(|index| OffsetVertex {
                    point: self.vertices[index].point,
                    bulge: if index > 0 {
                        -self.vertices[index - 1].bulge
                    } else {
                        0.0
                    },
                })
                .collect()
        };
        Self {
            vertices,
            closed: self.closed,
        }
    }

    /// Same loop starting at vertex `start`
    pub fn rotated(&self, start: usize) -> Self {
        let mut vertices = self.vertices.clone();
        if self.closed && !vertices.is_empty() {
            vertices.rotate_left(start % self.vertices.len());
        }
        Self {
            vertices,
            closed: self.closed,
        }
    }

    /// Moves along the loop, starting with the first vertex; closed loops end
    /// back at the first vertex
    pub fn to_path(&self) -> Vec<PathVertex> {
        let n = self.vertices.len();
        let Some(first) = self.vertices.first() else {
            return Vec::new();
        };
        let segments = if self.closed { n } else { n - 1 };
        let mut path = Vec::with_capacity(segments + 1);
        path.push(PathVertex::line(first.point));
        for i in 0..segments {
            let from = self.vertices[i];
            let to = self.vertices[(i + 1) % n].point;
            path.push(PathVertex {
                point: to,
                arc: arc_from_bulge(from.point, to, from.bulge),
            });
        }
        path
    }

    /// Vertices with bulge arcs replaced by chords that stay within
    /// `tolerance` of the arc
    pub fn flattened(&self, tolerance: f64) -> Vec<Point2> {
        let n = self.vertices.len();
        let segments = if self.closed { n } else { n.saturating_sub(1) };
        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            let from = self.vertices[i];
            points.push(from.point);
            if i >= segments {
                continue;
            }
            let to = self.vertices[(i + 1) % n].point;
            let Some(arc) = arc_from_bulge(from.point, to, from.bulge) else {
                continue;
            };
            let radius = arc.center.distance_to(&from.point);
            let sweep = 4.0 * from.bulge.atan();
            let max_step = if tolerance < radius {
                2.0 * (1.0 - tolerance / radius).acos()
            } else {
                sweep.abs()
            };
            let count = (sweep.abs() / max_step).ceil().max(1.0) as usize;
            let start = (from.point.y - arc.center.y).atan2(from.point.x - arc.center.x);
            for k in 1..count {
                let angle = start + sweep * k as f64 / count as f64;
                points.push(Point2::new(
                    arc.center.x + radius * angle.cos(),
                    arc.center.y + radius * angle.sin(),
                ));
            }
        }
        points
    }
}

/// Arc described by a bulge between two points, `None` for a straight segment
///
/// Positive bulge turns counter-clockwise. The centre lies on the chord's
/// perpendicular at `(1 - b²) / (4b)` chord lengths from the midpoint.
pub fn arc_from_bulge(start: Point2, end: Point2, bulge: f64) -> Option<ArcMove> {
    if bulge.abs() < BULGE_EPSILON || start.distance_to(&end) < BULGE_EPSILON {
        return None;
    }
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let k = (1.0 - bulge * bulge) / (4.0 * bulge);
    let center = Point2::new(
        (start.x + end.x) / 2.0 - dy * k,
        (start.y + end.y) / 2.0 + dx * k,
    );
    let direction = if bulge > 0.0 {
        ArcDirection::Ccw
    } else {
        ArcDirection::Cw
    };
    Some(ArcMove { direction, center })
}

/// Repeated vertices (including a closing copy of the first) are dropped
fn to_cavalier(polyline: &Polyline2) -> Polyline<f64> {
    const TOLERANCE: f64 = 1e-9;
    let mut points: Vec<Point2> = Vec::with_capacity(polyline.len());
    for p in &polyline.points {
        if points.last().is_some_and(|last| last.distance_to(p) < TOLERANCE) {
            continue;
        }
        points.push(*p);
    }
    if polyline.closed && points.len() > 1 {
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            if first.distance_to(last) < TOLERANCE {
                points.pop();
            }
        }
    }

    let mut pline = Polyline::new();
    for p in points {
        pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    pline.set_is_closed(polyline.closed);
    pline
}

fn run_offset(pline: &Polyline<f64>, distance: f64) -> CamToolResult<Vec<OffsetLoop>> {
    let result = panic::catch_unwind(panic::AssertUnwindSafe(|| pline.parallel_offset(distance)));
    match result {
        Ok(plines) => Ok(plines
            .iter()
            .map(OffsetLoop::from_cavalier)
            .filter(|l| !l.is_empty())
            .collect()),
        Err(_) => {
            warn!("Panic during parallel offset by {}", distance);
            Err(CamToolError::GeometryError(format!(
                "offset by {} failed",
                distance
            )))
        }
    }
}

/// Offset an open polyline; positive distances go to the left of travel
pub fn offset_open(polyline: &Polyline2, distance: f64) -> CamToolResult<Vec<OffsetLoop>> {
    let mut open = polyline.clone();
    open.closed = false;
    run_offset(&to_cavalier(&open), distance)
}

/// Offset a closed polygon; positive distances grow it, negative shrink it
///
/// Results are counter-clockwise. A shrink that consumes the polygon
/// returns an empty list.
pub fn offset_closed(polygon: &Polyline2, distance: f64) -> CamToolResult<Vec<OffsetLoop>> {
    let mut ccw = if polygon.is_counter_clockwise() {
        polygon.clone()
    } else {
        polygon.reversed()
    };
    ccw.closed = true;
    let base_area = ccw.signed_area();
    let pline = to_cavalier(&ccw);

    // Cavalier offsets a counter-clockwise loop inward for positive distances
    let mut loops = run_offset(&pline, -distance)?;
    if !offset_matches(&loops, base_area, distance) {
        loops = run_offset(&pline, distance)?;
    }

    Ok(loops
        .into_iter()
        .map(|l| if l.signed_area() < 0.0 { l.reversed() } else { l })
        .collect())
}

/// Whether the largest loop grew (or shrank) the way `distance` asks for
fn offset_matches(loops: &[OffsetLoop], base_area: f64, distance: f64) -> bool {
    let largest = loops
        .iter()
        .map(|l| l.signed_area().abs())
        .fold(None, |acc: Option<f64>, a| Some(acc.map_or(a, |m| m.max(a))));
    match largest {
        Some(area) if distance > 0.0 => area > base_area,
        Some(area) => area < base_area,
        None => distance < 0.0,
    }
}

/// Successive inward rings at `first`, `first + step`, ... until the polygon
/// is consumed or `max_rings` is reached
pub fn inset_rings(
    polygon: &Polyline2,
    first: f64,
    step: f64,
    max_rings: usize,
) -> CamToolResult<Vec<Vec<OffsetLoop>>> {
    let mut rings = Vec::new();
    let mut inset = first;
    while rings.len() < max_rings {
        let ring = offset_closed(polygon, -inset)?;
        if ring.is_empty() {
            break;
        }
        rings.push(ring);
        inset += step;
    }
    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polyline2 {
        Polyline2::rectangle(0.0, 0.0, 20.0, 20.0)
    }

    #[test]
    fn test_semicircle_bulge_center_is_midpoint() {
        let arc = arc_from_bulge(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), 1.0).unwrap();
        assert_eq!(arc.direction, ArcDirection::Ccw);
        assert!((arc.center.x - 5.0).abs() < 1e-12);
        assert!(arc.center.y.abs() < 1e-12);

        let arc = arc_from_bulge(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), -1.0).unwrap();
        assert_eq!(arc.direction, ArcDirection::Cw);
        assert!(arc_from_bulge(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), 0.0).is_none());
    }

    #[test]
    fn test_quarter_arc_center_equidistant() {
        let start = Point2::new(3.0, 1.0);
        let end = Point2::new(-2.0, 4.0);
        let arc = arc_from_bulge(start, end, 0.4142).unwrap();
        let r1 = arc.center.distance_to(&start);
        let r2 = arc.center.distance_to(&end);
        assert!((r1 - r2).abs() < 1e-9);
    }

    #[test]
    fn test_outward_offset_grows() {
        let loops = offset_closed(&square(), 2.0).unwrap();
        assert_eq!(loops.len(), 1);
        assert!(loops[0].signed_area() > 400.0);
        for v in &loops[0].vertices {
            assert!(v.point.x >= -2.0 - 1e-9 && v.point.x <= 22.0 + 1e-9);
        }
    }

    #[test]
    fn test_inward_offset_shrinks_and_vanishes() {
        let loops = offset_closed(&square(), -3.0).unwrap();
        assert_eq!(loops.len(), 1);
        assert!((loops[0].signed_area() - 196.0).abs() < 1e-6);

        assert!(offset_closed(&square(), -11.0).unwrap().is_empty());
    }

    #[test]
    fn test_clockwise_input_normalized() {
        let cw = square().reversed();
        let loops = offset_closed(&cw, -3.0).unwrap();
        assert!(loops[0].signed_area() > 0.0);
    }

    #[test]
    fn test_reversed_closed_loop() {
        let ring = OffsetLoop {
            vertices: vec![
                OffsetVertex { point: Point2::new(0.0, 0.0), bulge: 0.5 },
                OffsetVertex { point: Point2::new(1.0, 0.0), bulge: 0.0 },
                OffsetVertex { point: Point2::new(1.0, 1.0), bulge: -0.2 },
            ],
            closed: true,
        };
        let rev = ring.reversed();
        let points: Vec<Point2> = rev.vertices.iter().map(|v| v.point).collect();
        assert_eq!(
            points,
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(1.0, 0.0)]
        );
        // (0,0)->(1,1) was (1,1)->(0,0) with bulge -0.2
        assert_eq!(rev.vertices[0].bulge, 0.2);
        assert_eq!(rev.vertices[1].bulge, -0.0);
        assert_eq!(rev.vertices[2].bulge, -0.5);
        assert_eq!(rev.reversed(), ring);
    }

    #[test]
    fn test_inset_rings_stop_when_consumed() {
        let rings = inset_rings(&square(), 3.0, 2.0, 100).unwrap();
        // insets 3, 5, 7, 9 fit inside a 20 mm square; 11 does not
        assert_eq!(rings.len(), 4);
    }

    #[test]
    fn test_closed_path_returns_to_start() {
        let path = OffsetLoop::from_polyline(&square()).to_path();
        assert_eq!(path.len(), 5);
        assert_eq!(path.first().map(|v| v.point), path.last().map(|v| v.point));
    }

    #[test]
    fn test_flattened_semicircle_stays_on_arc() {
        let half = OffsetLoop {
            vertices: vec![
                OffsetVertex { point: Point2::new(0.0, 0.0), bulge: 1.0 },
                OffsetVertex { point: Point2::new(10.0, 0.0), bulge: 0.0 },
            ],
            closed: false,
        };
        let points = half.flattened(0.01);
        assert!(points.len() > 3);
        assert_eq!(points.first(), Some(&Point2::new(0.0, 0.0)));
        assert_eq!(points.last(), Some(&Point2::new(10.0, 0.0)));
        let center = Point2::new(5.0, 0.0);
        for p in &points {
            assert!((p.distance_to(&center) - 5.0).abs() < 1e-9);
            assert!(p.y <= 1e-9);
        }
        for pair in points.windows(2) {
            let mid = Point2::new((pair[0].x + pair[1].x) / 2.0, (pair[0].y + pair[1].y) / 2.0);
            assert!(5.0 - mid.distance_to(&center) <= 0.01 + 1e-9);
        }
    }

    #[test]
    fn test_flattened_straight_loop_unchanged() {
        let points = OffsetLoop::from_polyline(&square()).flattened(0.01);
        assert_eq!(points, square().points);
    }
}
