//! Route polyline simplification
//!
//! Drops interior points that barely change the travel direction, keeping
//! only directionally significant vertices. Pure function, no side effects.

use crate::cells::Vec2;

/// Dot-product threshold below which a vertex counts as a direction change
/// and is kept (~cos 5.7 degrees).
const KEEP_DOT: f32 = 0.995;

/// Simplify a path polyline. The first and last points are always kept; an
/// interior point survives only if its outgoing direction deviates from the
/// direction at the last kept vertex.
pub fn simplify_path(points: &[Vec2]) -> Vec<Vec2> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    let mut kept_dir = direction(&points[0], &points[1]);

    for i in 1..points.len() - 1 {
        let dir = direction(&points[i], &points[i + 1]);
        if dir.dot(&kept_dir) < KEEP_DOT {
            out.push(points[i]);
            kept_dir = dir;
        }
    }

    out.push(points[points.len() - 1]);
    out
}

fn direction(a: &Vec2, b: &Vec2) -> Vec2 {
    Vec2::new(b.x - a.x, b.y - a.y).normalize()
}
