//! Travel ordering for point sets
//!
//! Only drill targets are reordered. Contour and pocket moves keep the order
//! their generators produced.

use camkit_core::Point2;

use crate::error::{CamToolError, CamToolResult};
use crate::operation::Operation;

/// Nearest-neighbour tour starting from the first point
///
/// Ties go to the point that appears first in the input.
pub fn optimize_point_order(points: &[Point2]) -> Vec<Point2> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut remaining: Vec<Point2> = rest.to_vec();
    let mut ordered = Vec::with_capacity(points.len());
    let mut current = first;
    ordered.push(first);

    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (index, point) in remaining.iter().enumerate() {
            let distance = current.distance_to(point);
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        current = remaining.remove(best);
        ordered.push(current);
    }
    ordered
}

/// Total XY travel visiting `points` in order from the origin
pub fn travel_distance(points: &[Point2]) -> f64 {
    let mut current = Point2::new(0.0, 0.0);
    points
        .iter()
        .map(|p| {
            let d = current.distance_to(p);
            current = *p;
            d
        })
        .sum()
}

/// Copy of a drill operation with its targets reordered
pub fn optimize_drill_operation(operation: &Operation) -> CamToolResult<Operation> {
    match operation {
        Operation::Drill(op) => {
            let mut op = op.clone();
            op.points = optimize_point_order(&op.points);
            Ok(Operation::Drill(op))
        }
        other => Err(CamToolError::InvalidParameters(format!(
            "only drill operations can be reordered, got {}",
            other.name()
        ))),
    }
}
