//! Whole-path affine moves.
//!
//! Each function returns a new path rebuilt through the same kinematics, so
//! machine-space data is recomputed. Rotation/tilt intent and settings are
//! carried over unchanged.

use gcoord_math::{rotation_z, Transform};

use crate::collection::PathCollection;
use crate::error::Result;
use crate::path::Path;

/// A rigid move: translate by `(x, y, z)`, then rotate by
/// `Rz(yaw)·Ry(pitch)·Rx(roll)` about the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    /// Translation along X (mm).
    pub x: f64,
    /// Translation along Y (mm).
    pub y: f64,
    /// Translation along Z (mm).
    pub z: f64,
    /// Rotation about X (radians).
    pub roll: f64,
    /// Rotation about Y (radians).
    pub pitch: f64,
    /// Rotation about Z (radians).
    pub yaw: f64,
}

impl Motion {
    /// Pure translation.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            ..Default::default()
        }
    }

    fn transform(&self) -> Transform {
        Transform::roll_pitch_yaw(self.roll, self.pitch, self.yaw)
            .then(&Transform::translation(self.x, self.y, self.z))
    }
}

/// Scale positions per axis about the origin.
pub fn stretch(path: &Path, sx: f64, sy: f64, sz: f64) -> Result<Path> {
    let t = Transform::scale(sx, sy, sz);
    path.map_positions(|p| t.apply_point(p))
}

/// Rotate positions in the XY plane: `x' = cos θ·x + sin θ·y`,
/// `y' = -sin θ·x + cos θ·y`.
pub fn rotate_xy(path: &Path, theta: f64) -> Result<Path> {
    let t = Transform::rotation(&rotation_z(-theta));
    path.map_positions(|p| t.apply_point(p))
}

/// Apply `motion` to every position of `path`.
pub fn move_path(path: &Path, motion: &Motion) -> Result<Path> {
    let t = motion.transform();
    path.map_positions(|p| t.apply_point(p))
}

/// Apply `motion` to every member; the result is re-ordered.
pub fn move_collection(collection: &PathCollection, motion: &Motion) -> Result<PathCollection> {
    let paths = collection
        .iter()
        .map(|path| move_path(path, motion))
        .collect::<Result<Vec<_>>>()?;
    Ok(PathCollection::new(paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::Kinematics;
    use approx::assert_relative_eq;
    use gcoord_math::Point3;
    use std::f64::consts::PI;

    fn line() -> Path {
        Path::from_xyz_oriented(
            &[1.0, 2.0],
            &[0.0, 1.0],
            &[0.5, 0.5],
            &[0.3, 0.3],
            &[0.0, 0.1],
            &Kinematics::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_stretch() {
        let p = stretch(&line(), 2.0, 3.0, 4.0).unwrap();
        assert_relative_eq!(p.points()[1].position, Point3::new(4.0, 3.0, 2.0), epsilon = 1e-12);
        assert_eq!(p.points()[1].tilt, 0.1);
    }

    #[test]
    fn test_rotate_xy_is_clockwise() {
        let p = rotate_xy(&line(), PI / 2.0).unwrap();
        // (1, 0) -> (0, -1); (2, 1) -> (1, -2)
        assert_relative_eq!(p.points()[0].position, Point3::new(0.0, -1.0, 0.5), epsilon = 1e-12);
        assert_relative_eq!(p.points()[1].position, Point3::new(1.0, -2.0, 0.5), epsilon = 1e-12);
        assert_eq!(p.points()[0].rotation, 0.3);
    }

    #[test]
    fn test_move_translates_then_rotates() {
        let motion = Motion {
            x: 1.0,
            yaw: PI / 2.0,
            ..Default::default()
        };
        let p = move_path(&line(), &motion).unwrap();
        // (1, 0, 0.5) + (1, 0, 0) = (2, 0, 0.5), then yaw 90° -> (0, 2, 0.5)
        assert_relative_eq!(p.points()[0].position, Point3::new(0.0, 2.0, 0.5), epsilon = 1e-12);
        assert_relative_eq!(*p.start_coord(), Point3::new(0.0, 2.0, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn test_move_collection() {
        let a = line();
        let b = move_path(&line(), &Motion::translation(10.0, 0.0, 0.0)).unwrap();
        let moved =
            move_collection(&PathCollection::new(vec![a, b]), &Motion::translation(0.0, 0.0, 1.0))
                .unwrap();
        assert_eq!(moved.len(), 2);
        for path in &moved {
            assert_relative_eq!(path.points()[0].position.z, 1.5, epsilon = 1e-12);
        }
    }
}
