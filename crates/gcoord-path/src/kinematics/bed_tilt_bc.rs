//! Tilting + rotating bed kinematics (B tilt about Y, C rotation about Z).

use gcoord_math::{rotation_y, rotation_z};
use serde::{Deserialize, Serialize};

use super::{arc_segment_extrusion, subdivide, AxisWord, KinematicsModel, MachinePath};
use crate::config::PrintSettings;
use crate::path::{Path, PathPoint};

/// The bed tilts about Y and then rotates about Z. Logical points map to
/// the bed frame through `Rz(-rot)·Ry(-tilt)`; the third column of that
/// matrix is the local surface normal, recorded at every sub-point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BedTiltBc {
    /// Axis letter for the tilt value.
    pub tilt_code: String,
    /// Axis letter for the rotation value.
    pub rot_code: String,
    /// Added to every emitted tilt value.
    pub tilt_offset: f64,
    /// Added to every emitted rotation value.
    pub rot_offset: f64,
    /// Maximum machine-space sub-segment length (mm).
    pub div_distance: f64,
}

impl Default for BedTiltBc {
    fn default() -> Self {
        Self {
            tilt_code: "B".into(),
            rot_code: "C".into(),
            tilt_offset: 0.0,
            rot_offset: 0.0,
            div_distance: 0.5,
        }
    }
}

impl KinematicsModel for BedTiltBc {
    fn transform(&self, points: &[PathPoint]) -> MachinePath {
        subdivide(points, self.div_distance, |rot, tilt| {
            rotation_z(-rot) * rotation_y(-tilt)
        })
    }

    fn extrusion(&self, path: &Path, settings: &PrintSettings) -> Vec<f64> {
        arc_segment_extrusion(path, settings)
    }

    fn axis_words(&self, point: &PathPoint) -> Vec<AxisWord> {
        vec![
            AxisWord::new(&self.tilt_code, point.tilt + self.tilt_offset),
            AxisWord::new(&self.rot_code, point.rotation + self.rot_offset),
        ]
    }
}
