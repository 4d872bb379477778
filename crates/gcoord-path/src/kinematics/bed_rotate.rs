//! Rotating bed kinematics.

use gcoord_math::rotation_z;
use serde::{Deserialize, Serialize};

use super::{arc_segment_extrusion, subdivide, AxisWord, KinematicsModel, MachinePath};
use crate::config::PrintSettings;
use crate::path::{Path, PathPoint};

/// The bed spins about Z. A point printed at logical `(x, y)` with the bed
/// at angle `rot` lands at `Rz(-rot)·(x, y)` in the bed frame, so a segment
/// whose rotation changes traces an arc on the bed and is subdivided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BedRotate {
    /// Axis letter for the bed rotation.
    pub rot_code: String,
    /// Added to every emitted rotation value.
    pub rot_offset: f64,
    /// Maximum machine-space sub-segment length (mm).
    pub div_distance: f64,
}

impl Default for BedRotate {
    fn default() -> Self {
        Self {
            rot_code: "C".into(),
            rot_offset: 0.0,
            div_distance: 0.5,
        }
    }
}

impl KinematicsModel for BedRotate {
    fn transform(&self, points: &[PathPoint]) -> MachinePath {
        subdivide(points, self.div_distance, |rot, _tilt| rotation_z(-rot))
    }

    fn extrusion(&self, path: &Path, settings: &PrintSettings) -> Vec<f64> {
        arc_segment_extrusion(path, settings)
    }

    fn axis_words(&self, point: &PathPoint) -> Vec<AxisWord> {
        vec![AxisWord::new(&self.rot_code, point.rotation + self.rot_offset)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::{stadium_extrusion, Kinematics, PRE_SAMPLES};
    use approx::assert_relative_eq;
    use gcoord_math::{Point3, Vec3};
    use proptest::prelude::*;
    use std::f64::consts::PI;

    fn quarter_turn(div_distance: f64) -> Path {
        let k = Kinematics::BedRotate(BedRotate {
            div_distance,
            ..Default::default()
        });
        Path::from_xyz_oriented(
            &[0.0, 50.0],
            &[0.0, 0.0],
            &[0.0, 0.0],
            &[0.0, PI / 2.0],
            &[0.0, 0.0],
            &k,
        )
        .unwrap()
    }

    #[test]
    fn test_quarter_turn_subdivision_count() {
        let path = quarter_turn(0.5);

        // Same coarse estimate, computed by hand.
        let mut arc = 0.0;
        let mut prev = Point3::origin();
        for k in 1..=PRE_SAMPLES {
            let t = k as f64 / PRE_SAMPLES as f64;
            let theta = t * PI / 2.0;
            let p = Point3::new(50.0 * t * theta.cos(), -50.0 * t * theta.sin(), 0.0);
            arc += (p - prev).norm();
            prev = p;
        }
        let expected = (arc / 0.5).ceil() as usize;

        let counts = path.sub_segment_counts().unwrap();
        assert_eq!(counts, &[expected][..]);
        assert!(expected > 100);
        assert_eq!(path.machine_coords().len(), expected + 1);
    }

    #[test]
    fn test_end_point_in_bed_frame() {
        let path = quarter_turn(0.5);
        // (50, 0) seen from a bed turned 90° sits at (0, -50).
        assert_relative_eq!(*path.end_coord(), Point3::new(0.0, -50.0, 0.0), epsilon = 1e-9);
        assert!(path.normals().iter().all(|n| (n - Vec3::z()).norm() < 1e-12));
        assert_eq!(path.normals().len(), path.machine_coords().len());
    }

    #[test]
    fn test_no_rotation_is_straight() {
        let model = BedRotate {
            div_distance: 0.3,
            ..Default::default()
        };
        let k = Kinematics::BedRotate(model.clone());
        let path = Path::from_xyz(&[0.0, 3.0], &[0.0, 4.0], &[0.0, 0.0], &k).unwrap();
        assert_eq!(path.sub_segment_counts().unwrap(), &[17][..]);

        let settings = PrintSettings::default();
        let e = model.extrusion(&path, &settings);
        assert_eq!(e.len(), 1);
        assert_relative_eq!(e[0], stadium_extrusion(5.0, &settings), epsilon = 1e-12);
    }

    #[test]
    fn test_arc_extrusion_exceeds_chord() {
        let settings = PrintSettings::default();
        let path = quarter_turn(0.5);
        let e = BedRotate::default().extrusion(&path, &settings);
        assert!(e[0] > stadium_extrusion(50.0, &settings));
    }

    #[test]
    fn test_multiplier_does_not_scale_stadium_extrusion() {
        let k = Kinematics::BedRotate(BedRotate::default());
        let path = Path::from_xyz(&[0.0, 10.0], &[0.0, 0.0], &[0.0, 0.0], &k).unwrap();
        let settings = PrintSettings {
            extrusion_multiplier: 2.0,
            ..Default::default()
        };
        let e = BedRotate::default().extrusion(&path, &settings);
        // 4·((0.4 - 0.2)·0.2 + π·0.1²)·10 / (π·1.75²)
        assert_relative_eq!(e[0], 0.296_913, epsilon = 1e-6);
    }

    #[test]
    fn test_emit_motion_uses_rotation() {
        let k = BedRotate {
            rot_offset: 0.5,
            ..Default::default()
        };
        let path = quarter_turn(0.5);
        let lines = k.emit_motion(&path, &PrintSettings::default(), 4);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("G1 F5000 X150.0000 Y100.0000 Z0.0000 C2.0708 E"));
    }

    #[test]
    fn test_coincident_points() {
        let k = Kinematics::BedRotate(BedRotate::default());
        let path = Path::from_xyz(&[1.0, 1.0, 2.0], &[0.0, 0.0, 0.0], &[0.0; 3], &k).unwrap();
        let counts = path.sub_segment_counts().unwrap();
        assert_eq!(counts[0], 0);
        let e = BedRotate::default().extrusion(&path, &PrintSettings::default());
        assert_eq!(e.len(), 2);
        assert_eq!(e[0], 0.0);
        assert!(e[1] > 0.0);
    }

    proptest! {
        #[test]
        fn prop_counts_cover_machine_coords(
            xs in prop::collection::vec(-50.0f64..50.0, 2..6),
            rot_step in -1.0f64..1.0,
        ) {
            let n = xs.len();
            let ys: Vec<f64> = xs.iter().map(|x| x * 0.5 + 3.0).collect();
            let rots: Vec<f64> = (0..n).map(|i| i as f64 * rot_step).collect();
            let k = Kinematics::BedRotate(BedRotate::default());
            let path = Path::from_xyz_oriented(&xs, &ys, &vec![0.0; n], &rots, &vec![0.0; n], &k).unwrap();
            let counts = path.sub_segment_counts().unwrap();
            prop_assert_eq!(counts.len(), n - 1);
            prop_assert_eq!(counts.iter().sum::<usize>() + 1, path.machine_coords().len());
            prop_assert_eq!(path.normals().len(), path.machine_coords().len());
        }

        #[test]
        fn prop_finer_division_never_fewer_points(
            div in 0.1f64..2.0,
            factor in 0.1f64..1.0,
            turn in 0.0f64..3.0,
        ) {
            let build = |d: f64| {
                let k = Kinematics::BedRotate(BedRotate { div_distance: d, ..Default::default() });
                Path::from_xyz_oriented(&[5.0, 20.0], &[0.0, 10.0], &[0.0, 0.0], &[0.0, turn], &[0.0, 0.0], &k).unwrap()
            };
            let coarse = build(div);
            let fine = build(div * factor);
            let coarse_total: usize = coarse.sub_segment_counts().unwrap().iter().sum();
            let fine_total: usize = fine.sub_segment_counts().unwrap().iter().sum();
            prop_assert!(fine_total >= coarse_total);
        }
    }
}
