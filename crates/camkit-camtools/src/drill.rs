//! Drilling toolpaths
//!
//! Holes are drilled with explicit moves rather than canned cycles so the
//! same toolpath posts to every dialect. Peck drilling retracts to the
//! retract height after every peck, including the last, and then to the
//! clearance height before moving to the next hole.

use tracing::debug;

use camkit_core::Toolpath;

use crate::error::CamToolResult;
use crate::generator::{depth_levels, PathBuilder};
use crate::operation::DrillOp;

pub fn generate_drill(op: &DrillOp) -> CamToolResult<Toolpath> {
    let mut builder = PathBuilder::start(&op.cut);
    let pecking = op.peck_depth > 0.0;
    let pecks = if pecking {
        depth_levels(op.depth, op.peck_depth)
    } else {
        vec![op.depth]
    };

    for (hole, target) in op.points.iter().enumerate() {
        debug!("Drilling hole {} at X{:.3} Y{:.3}", hole + 1, target.x, target.y);
        builder.rapid(target.x, target.y, op.clearance);
        for (index, &z) in pecks.iter().enumerate() {
            builder.linear(target.x, target.y, z);
            if index + 1 == pecks.len() && op.dwell > 0.0 {
                builder.dwell(op.dwell);
            }
            if pecking {
                builder.rapid_z(op.retract);
            }
        }
        if !pecking || op.clearance != op.retract {
            builder.rapid_z(op.clearance);
        }
    }

    Ok(builder.finish())
}
