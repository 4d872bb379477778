//! Tilting nozzle over a fixed bed.

use gcoord_math::{normal_of, rotation_y, rotation_z};
use serde::{Deserialize, Serialize};

use super::{passthrough_coords, straight_segment_extrusion, AxisWord, KinematicsModel, MachinePath};
use crate::config::PrintSettings;
use crate::path::{Path, PathPoint};

/// Nozzle tilt kinematics. Positions pass through unchanged; the surface
/// normal at each point follows the nozzle orientation `Rz(rot)·Ry(tilt)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NozzleTilt {
    /// Axis letter for the tilt value.
    pub tilt_code: String,
    /// Axis letter for the rotation value.
    pub rot_code: String,
    /// Added to every emitted tilt value.
    pub tilt_offset: f64,
    /// Added to every emitted rotation value.
    pub rot_offset: f64,
}

impl Default for NozzleTilt {
    fn default() -> Self {
        Self {
            tilt_code: "B".into(),
            rot_code: "A".into(),
            tilt_offset: 0.0,
            rot_offset: 0.0,
        }
    }
}

impl KinematicsModel for NozzleTilt {
    fn transform(&self, points: &[PathPoint]) -> MachinePath {
        let normals = points
            .iter()
            .map(|p| normal_of(&(rotation_z(p.rotation) * rotation_y(p.tilt))))
            .collect();
        MachinePath {
            coords: passthrough_coords(points),
            normals,
            sub_segment_counts: None,
        }
    }

    fn extrusion(&self, path: &Path, settings: &PrintSettings) -> Vec<f64> {
        straight_segment_extrusion(path, settings)
    }

    fn axis_words(&self, point: &PathPoint) -> Vec<AxisWord> {
        vec![
            AxisWord::new(&self.tilt_code, point.tilt + self.tilt_offset),
            AxisWord::new(&self.rot_code, point.rotation + self.rot_offset),
        ]
    }
}
