//! Planar path offsetting along corner bisectors.
//!
//! Every vertex moves along the bisector of its two incident edge normals by
//! `distance / sin(θ/2)`, where `θ = π - acos(n·m)` is the corner angle.
//! Edge normals are the right-hand perpendiculars `(v.y, -v.x)`, so a
//! positive distance grows a counter-clockwise loop and shrinks a
//! clockwise one. Z is carried through unchanged.
//!
//! Degenerate corners never divide by zero:
//! - a zero-length incident edge contributes no normal, and the vertex moves
//!   perpendicular to the remaining edge;
//! - a fold-back corner, where the normals cancel, also moves perpendicular
//!   to the incoming edge;
//! - a vertex with no usable edge at all stays where it is.
//!
//! Sharp but not fully folded corners are miter-limited: the bisector
//! displacement never exceeds `MITER_LIMIT · |distance|`, so a near-180°
//! spike cannot throw its vertex arbitrarily far away.

use gcoord_math::{Point3, Tolerance, Vec2};
use std::f64::consts::PI;
use tracing::debug;

use crate::error::Result;
use crate::path::{Path, PathPoint};

/// Below this, a corner's half-angle sine or bisector length counts as zero.
const DEGENERATE_EPS: f64 = 1e-9;

/// Largest bisector displacement as a multiple of the offset distance.
const MITER_LIMIT: f64 = 10.0;

/// Offset `path` in the XY plane by a signed `distance`.
///
/// A path whose first and last positions coincide is treated as closed and
/// its neighbors wrap around; otherwise the end vertices see a mirrored
/// virtual neighbor. The result keeps vertex count, Z values, rotation,
/// tilt, kinematics and settings.
pub fn offset(path: &Path, distance: f64) -> Result<Path> {
    let positions: Vec<Point3> = path.points().iter().map(|p| p.position).collect();
    let n = positions.len();
    if n < 2 {
        return path.rebuild(path.points().to_vec());
    }

    let closed = n > 2 && Tolerance::DEFAULT.points_equal(&positions[0], &positions[n - 1]);
    let points = path
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let (prev, here, next) = neighbors(&positions, i, closed);
            let moved = offset_vertex(prev, here, next, distance, i);
            PathPoint::oriented(
                Point3::new(moved.x, moved.y, point.position.z),
                point.rotation,
                point.tilt,
            )
        })
        .collect();

    path.rebuild(points)
}

/// Previous, current and next vertex in the XY plane.
fn neighbors(positions: &[Point3], i: usize, closed: bool) -> (Vec2, Vec2, Vec2) {
    let xy = |p: &Point3| Vec2::new(p.x, p.y);
    let n = positions.len();
    if closed {
        // The last vertex duplicates the first.
        let m = n - 1;
        let here = xy(&positions[i % m]);
        let prev = xy(&positions[(i + m - 1) % m]);
        let next = xy(&positions[(i + 1) % m]);
        return (prev, here, next);
    }

    let here = xy(&positions[i]);
    let prev = if i == 0 {
        2.0 * here - xy(&positions[1])
    } else {
        xy(&positions[i - 1])
    };
    let next = if i == n - 1 {
        2.0 * here - xy(&positions[n - 2])
    } else {
        xy(&positions[i + 1])
    };
    (prev, here, next)
}

fn edge_normal(from: Vec2, to: Vec2) -> Option<Vec2> {
    let v = to - from;
    let length = v.norm();
    (length > DEGENERATE_EPS).then(|| Vec2::new(v.y, -v.x) / length)
}

fn offset_vertex(prev: Vec2, here: Vec2, next: Vec2, distance: f64, index: usize) -> Vec2 {
    let (n, m) = match (edge_normal(prev, here), edge_normal(here, next)) {
        (Some(n), Some(m)) => (n, m),
        (Some(single), None) | (None, Some(single)) => {
            debug!(vertex = index, "zero-length edge, single-edge offset");
            return here + single * distance;
        }
        (None, None) => {
            debug!(vertex = index, "isolated vertex left in place");
            return here;
        }
    };

    let phi = n.dot(&m).clamp(-1.0, 1.0).acos();
    let theta = PI - phi;
    let half_sine = (theta / 2.0).sin();
    let bisector = n + m;
    let bisector_length = bisector.norm();

    if half_sine < DEGENERATE_EPS || bisector_length < DEGENERATE_EPS {
        debug!(vertex = index, "fold-back corner, single-edge offset");
        return here + n * distance;
    }

    let scale = 1.0 / half_sine;
    if scale > MITER_LIMIT {
        debug!(vertex = index, scale, "sharp corner, miter limited");
    }
    here + bisector / bisector_length * (distance * scale.min(MITER_LIMIT))
}
