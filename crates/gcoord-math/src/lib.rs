#![warn(missing_docs)]

//! Math types for gcoord toolpaths.
//!
//! Thin wrappers around nalgebra providing the point, vector and rotation
//! types used by the kinematics profiles, plus the handful of geometry
//! utilities every other crate leans on: segment lengths, centroids and a
//! coincidence tolerance.

use nalgebra::{Matrix4, Rotation3, Vector2, Vector3};
use thiserror::Error;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A vector in the XY plane.
pub type Vec2 = Vector2<f64>;

/// A pure 3x3 rotation.
pub type Rot3 = Rotation3<f64>;

/// Errors from geometry utilities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Not enough points for the requested operation.
    #[error("need at least {needed} points, got {got}")]
    TooFewPoints {
        /// Minimum number of points required.
        needed: usize,
        /// Number of points supplied.
        got: usize,
    },
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Euclidean distances between consecutive points.
///
/// For `n` points this returns `n - 1` distances. Fewer than two points
/// is an error since there is no segment to measure.
pub fn segment_lengths(coords: &[Point3]) -> Result<Vec<f64>> {
    if coords.len() < 2 {
        return Err(GeometryError::TooFewPoints {
            needed: 2,
            got: coords.len(),
        });
    }
    Ok(coords.windows(2).map(|w| (w[1] - w[0]).norm()).collect())
}

/// Arithmetic mean of a point set, or `None` when empty.
pub fn centroid(coords: &[Point3]) -> Option<Point3> {
    if coords.is_empty() {
        return None;
    }
    let sum = coords.iter().fold(Vec3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / coords.len() as f64))
}

/// Linear interpolation between two points, `t` in `[0, 1]`.
pub fn lerp_point(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}

/// Rotation about the vertical (Z) axis by `angle` radians.
pub fn rotation_z(angle: f64) -> Rot3 {
    Rotation3::from_axis_angle(&Vector3::z_axis(), angle)
}

/// Rotation about the Y axis by `angle` radians.
pub fn rotation_y(angle: f64) -> Rot3 {
    Rotation3::from_axis_angle(&Vector3::y_axis(), angle)
}

/// Rotation about the X axis by `angle` radians.
pub fn rotation_x(angle: f64) -> Rot3 {
    Rotation3::from_axis_angle(&Vector3::x_axis(), angle)
}

/// The surface normal carried by a rotation: its third column, i.e. where
/// the build axis `+Z` ends up.
pub fn normal_of(rotation: &Rot3) -> Vec3 {
    rotation.matrix().column(2).into_owned()
}

/// A 4x4 affine transformation used for whole-path moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying homogeneous matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vec3::new(dx, dy, dz)),
        }
    }

    /// Per-axis scale by `(sx, sy, sz)`.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz)),
        }
    }

    /// Wrap a rotation.
    pub fn rotation(rotation: &Rot3) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
        }
    }

    /// Roll/pitch/yaw rotation `Rz(yaw) * Ry(pitch) * Rx(roll)`.
    pub fn roll_pitch_yaw(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self::rotation(&(rotation_z(yaw) * rotation_y(pitch) * rotation_x(roll)))
    }

    /// Compose: the result applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        self.matrix.transform_point(p)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
}

impl Tolerance {
    /// Default toolpath tolerance (1e-6 mm).
    pub const DEFAULT: Self = Self { linear: 1e-6 };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_segment_lengths() {
        let coords = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        ];
        let d = segment_lengths(&coords).unwrap();
        assert_eq!(d.len(), 2);
        assert_relative_eq!(d[0], 3f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(d[1], 3f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_segment_lengths_too_few() {
        let err = segment_lengths(&[Point3::origin()]).unwrap_err();
        assert_eq!(err, GeometryError::TooFewPoints { needed: 2, got: 1 });
        assert!(segment_lengths(&[]).is_err());
    }

    #[test]
    fn test_segment_lengths_coincident() {
        let p = Point3::new(4.0, 5.0, 6.0);
        let d = segment_lengths(&[p, p]).unwrap();
        assert_eq!(d, vec![0.0]);
    }

    #[test]
    fn test_centroid() {
        let square = [
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(2.0, 2.0, 1.0),
            Point3::new(0.0, 2.0, 1.0),
        ];
        let c = centroid(&square).unwrap();
        assert_relative_eq!(c, Point3::new(1.0, 1.0, 1.0), epsilon = 1e-12);
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn test_rotation_z_90() {
        let p = rotation_z(PI / 2.0) * Point3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_normal_of_tilt() {
        // Tilting +Z about Y by 90° lays it along +X.
        let n = normal_of(&rotation_y(PI / 2.0));
        assert_relative_eq!(n, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(normal_of(&Rot3::identity()), Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_transform_compose() {
        // translate first, then scale: origin -> (1,0,0) -> (2,0,0)
        let t = Transform::scale(2.0, 2.0, 2.0).then(&Transform::translation(1.0, 0.0, 0.0));
        let p = t.apply_point(&Point3::origin());
        assert_relative_eq!(p, Point3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_roll_pitch_yaw_yaw_only() {
        let t = Transform::roll_pitch_yaw(0.0, 0.0, PI / 2.0);
        let p = t.apply_point(&Point3::new(1.0, 0.0, 3.0));
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        assert!(tol.points_equal(&a, &Point3::new(1.0 + 1e-7, 2.0, 3.0)));
        assert!(!tol.points_equal(&a, &Point3::new(1.001, 2.0, 3.0)));
    }
}
