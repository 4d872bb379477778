//! Plain gantry kinematics.

use gcoord_math::Vec3;
use serde::{Deserialize, Serialize};

use super::{passthrough_coords, straight_segment_extrusion, KinematicsModel, MachinePath};
use crate::config::PrintSettings;
use crate::path::{Path, PathPoint};

/// Cartesian machine: logical space is machine space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cartesian;

impl KinematicsModel for Cartesian {
    fn transform(&self, points: &[PathPoint]) -> MachinePath {
        MachinePath {
            coords: passthrough_coords(points),
            normals: vec![Vec3::z(); points.len()],
            sub_segment_counts: None,
        }
    }

    fn extrusion(&self, path: &Path, settings: &PrintSettings) -> Vec<f64> {
        straight_segment_extrusion(path, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::Kinematics;
    use approx::assert_relative_eq;
    use gcoord_math::Point3;

    fn square(side: f64) -> Path {
        let x = [0.0, side, side, 0.0, 0.0];
        let y = [0.0, 0.0, side, side, 0.0];
        let z = [0.2; 5];
        Path::from_xyz(&x, &y, &z, &Kinematics::default()).unwrap()
    }

    #[test]
    fn test_square_extrusion() {
        let path = square(10.0);
        let e = Cartesian.extrusion(&path, &PrintSettings::default());
        assert_eq!(e.len(), 4);
        for value in e {
            // 4·0.4·0.2·10 / (π·1.75²)
            assert_relative_eq!(value, 0.332_601, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_extrusion_proportional_to_length() {
        let settings = PrintSettings::default();
        let short = Cartesian.extrusion(&square(10.0), &settings);
        let long = Cartesian.extrusion(&square(20.0), &settings);
        for (a, b) in short.iter().zip(&long) {
            assert_relative_eq!(*b, 2.0 * a, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_extrusion_multiplier() {
        let settings = PrintSettings {
            extrusion_multiplier: 2.0,
            ..Default::default()
        };
        let e = Cartesian.extrusion(&square(10.0), &settings);
        assert_relative_eq!(e[0], 2.0 * 0.332_601, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_is_identity() {
        let path = square(10.0);
        assert_eq!(path.machine_coords().len(), 5);
        assert_eq!(path.machine_coords()[2], Point3::new(10.0, 10.0, 0.2));
        assert!(path.normals().iter().all(|n| *n == Vec3::z()));
        assert!(path.sub_segment_counts().is_none());
    }

    #[test]
    fn test_emit_motion() {
        let path = square(10.0);
        let lines = Cartesian.emit_motion(&path, &PrintSettings::default(), 5);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "G1 F5000 X110.00000 Y100.00000 Z0.20000 E0.33260");
    }

    #[test]
    fn test_single_point_has_no_segments() {
        let path = Path::from_xyz(&[1.0], &[2.0], &[3.0], &Kinematics::default()).unwrap();
        let settings = PrintSettings::default();
        assert!(Cartesian.extrusion(&path, &settings).is_empty());
        assert!(Cartesian.emit_motion(&path, &settings, 5).is_empty());
    }

    #[test]
    fn test_coincident_points_extrude_nothing() {
        let path =
            Path::from_xyz(&[1.0, 1.0], &[2.0, 2.0], &[3.0, 3.0], &Kinematics::default()).unwrap();
        assert_eq!(Cartesian.extrusion(&path, &PrintSettings::default()), vec![0.0]);
    }
}
