//! Kinematics profiles.
//!
//! A profile maps a path's logical points (position plus rotation/tilt
//! intent) into machine space, computes the filament to extrude for each
//! logical segment, and renders one motion line per segment.
//!
//! # Variants
//!
//! - [`Cartesian`] - machine space is logical space, normals point up.
//! - [`NozzleTilt`] - positions pass through, normals follow the nozzle.
//! - [`BedRotate`] - rotating bed; segments are subdivided along the true arc.
//! - [`BedTiltBc`] - tilting (B) and rotating (C) bed; subdivided, with a
//!   normal at every sub-point.
//!
//! Subdivision is two-pass: a fixed [`PRE_SAMPLES`]-step walk estimates the
//! bed-frame arc length of a segment, then the segment is re-sampled at
//! `ceil(arc / div_distance)` steps. Cost is linear in the number of emitted
//! sub-points. The pre-sample estimate is a heuristic without an error bound.

mod bed_rotate;
mod bed_tilt_bc;
mod cartesian;
mod nozzle_tilt;

pub use bed_rotate::BedRotate;
pub use bed_tilt_bc::BedTiltBc;
pub use cartesian::Cartesian;
pub use nozzle_tilt::NozzleTilt;

use gcoord_math::{lerp_point, normal_of, segment_lengths, Point3, Rot3, Vec3};
use std::f64::consts::PI;
use tracing::debug;

use crate::config::{KinematicsKind, PrintSettings};
use crate::error::{PathError, Result};
use crate::path::{Path, PathPoint};

/// Number of coarse samples used to estimate a segment's bed-frame arc length.
pub const PRE_SAMPLES: usize = 10;

/// Machine-space data derived from a path's logical points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachinePath {
    /// Machine-space coordinates.
    pub coords: Vec<Point3>,
    /// Surface normal at each coordinate.
    pub normals: Vec<Vec3>,
    /// For subdividing profiles: how many machine sub-segments stand in for
    /// each logical segment.
    pub sub_segment_counts: Option<Vec<usize>>,
}

/// A machine axis value attached to a motion command, e.g. `C1.5708`.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisWord {
    /// Axis letter code.
    pub code: String,
    /// Value, offset included.
    pub value: f64,
}

impl AxisWord {
    /// Create an axis word.
    pub fn new(code: &str, value: f64) -> Self {
        Self {
            code: code.to_string(),
            value,
        }
    }
}

/// The capability set every kinematics variant provides.
pub trait KinematicsModel {
    /// Map logical points into machine space.
    fn transform(&self, points: &[PathPoint]) -> MachinePath;

    /// Filament length per logical segment (`points.len() - 1` values).
    fn extrusion(&self, path: &Path, settings: &PrintSettings) -> Vec<f64>;

    /// Extra machine axis values for a target point.
    fn axis_words(&self, _point: &PathPoint) -> Vec<AxisWord> {
        Vec::new()
    }

    /// One `G1` line per logical segment.
    fn emit_motion(&self, path: &Path, settings: &PrintSettings, decimals: usize) -> Vec<String> {
        let extrusion = self.extrusion(path, settings);
        path.points()
            .iter()
            .skip(1)
            .zip(extrusion)
            .map(|(point, e)| {
                motion_line(
                    "G1",
                    settings.print_speed,
                    &emitted_position(point, settings),
                    &self.axis_words(point),
                    Some(e),
                    decimals,
                )
            })
            .collect()
    }
}

/// The active kinematics profile, fixed when a path is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Kinematics {
    /// Plain gantry.
    Cartesian(Cartesian),
    /// Tilting nozzle over a fixed bed.
    NozzleTilt(NozzleTilt),
    /// Rotating bed.
    BedRotate(BedRotate),
    /// Tilting + rotating bed.
    BedTiltBc(BedTiltBc),
}

impl Default for Kinematics {
    fn default() -> Self {
        Kinematics::Cartesian(Cartesian)
    }
}

impl Kinematics {
    fn model(&self) -> &dyn KinematicsModel {
        match self {
            Kinematics::Cartesian(k) => k,
            Kinematics::NozzleTilt(k) => k,
            Kinematics::BedRotate(k) => k,
            Kinematics::BedTiltBc(k) => k,
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> KinematicsKind {
        match self {
            Kinematics::Cartesian(_) => KinematicsKind::Cartesian,
            Kinematics::NozzleTilt(_) => KinematicsKind::NozzleTilt,
            Kinematics::BedRotate(_) => KinematicsKind::BedRotate,
            Kinematics::BedTiltBc(_) => KinematicsKind::BedTiltBc,
        }
    }

    /// Reject parameters the transform cannot work with.
    pub fn validate(&self) -> Result<()> {
        let (section, div_distance) = match self {
            Kinematics::BedRotate(k) => ("bed_rotate", k.div_distance),
            Kinematics::BedTiltBc(k) => ("bed_tilt_bc", k.div_distance),
            Kinematics::Cartesian(_) | Kinematics::NozzleTilt(_) => return Ok(()),
        };
        if div_distance.is_finite() && div_distance > 0.0 {
            Ok(())
        } else {
            Err(PathError::InvalidConfig(format!(
                "{section}.div_distance must be positive, got {div_distance}"
            )))
        }
    }

    /// Map logical points into machine space.
    pub fn transform(&self, points: &[PathPoint]) -> MachinePath {
        self.model().transform(points)
    }

    /// Filament length per logical segment.
    pub fn extrusion(&self, path: &Path, settings: &PrintSettings) -> Vec<f64> {
        self.model().extrusion(path, settings)
    }

    /// Extra machine axis values for a target point.
    pub fn axis_words(&self, point: &PathPoint) -> Vec<AxisWord> {
        self.model().axis_words(point)
    }

    /// Relative axis motion from one point to another; offsets cancel.
    pub fn axis_deltas(&self, from: &PathPoint, to: &PathPoint) -> Vec<AxisWord> {
        let start = self.axis_words(from);
        self.axis_words(to)
            .into_iter()
            .zip(start)
            .map(|(end, begin)| AxisWord {
                value: end.value - begin.value,
                code: end.code,
            })
            .collect()
    }

    /// One motion line per logical segment.
    pub fn emit_motion(&self, path: &Path, settings: &PrintSettings, decimals: usize) -> Vec<String> {
        self.model().emit_motion(path, settings, decimals)
    }
}

/// Format a value with `decimals` fraction digits, folding negative zero.
pub fn format_value(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}

/// Render a single move: `{command} F.. X.. Y.. Z.. [axes] [E..]`.
pub fn motion_line(
    command: &str,
    feed: f64,
    target: &Point3,
    axes: &[AxisWord],
    extrusion: Option<f64>,
    decimals: usize,
) -> String {
    let mut line = format!(
        "{command} F{} X{} Y{} Z{}",
        format_value(feed, 0),
        format_value(target.x, decimals),
        format_value(target.y, decimals),
        format_value(target.z, decimals),
    );
    for axis in axes {
        line.push(' ');
        line.push_str(&axis.code);
        line.push_str(&format_value(axis.value, decimals));
    }
    if let Some(e) = extrusion {
        line.push_str(" E");
        line.push_str(&format_value(e, decimals));
    }
    line
}

/// Where the linear axes are commanded for a point: logical position plus
/// the X/Y origin.
pub fn emitted_position(point: &PathPoint, settings: &PrintSettings) -> Point3 {
    Point3::new(
        point.position.x + settings.x_origin,
        point.position.y + settings.y_origin,
        point.position.z,
    )
}

/// Positions copied straight from the logical points.
pub(crate) fn passthrough_coords(points: &[PathPoint]) -> Vec<Point3> {
    points.iter().map(|p| p.position).collect()
}

/// Rectangular bead model: `4·d·h·L / (π·D²) · k`.
pub(crate) fn rectangular_extrusion(length: f64, settings: &PrintSettings) -> f64 {
    let numerator = 4.0 * settings.nozzle_diameter * settings.layer_height * length;
    let denominator = PI * settings.filament_diameter.powi(2);
    numerator / denominator * settings.extrusion_multiplier
}

/// Stadium bead model: rectangle `(d - h)·h` capped by two half circles of
/// diameter `h`, giving `4·A·L / (π·D²)`. The extrusion multiplier does not
/// apply here.
pub(crate) fn stadium_extrusion(length: f64, settings: &PrintSettings) -> f64 {
    let h = settings.layer_height;
    let area = ((settings.nozzle_diameter - h) * h + PI * (h / 2.0).powi(2)).max(0.0);
    4.0 * area * length / (PI * settings.filament_diameter.powi(2))
}

/// Rectangular extrusion over straight machine-space segments.
pub(crate) fn straight_segment_extrusion(path: &Path, settings: &PrintSettings) -> Vec<f64> {
    segment_lengths(path.machine_coords())
        .unwrap_or_default()
        .into_iter()
        .map(|length| rectangular_extrusion(length, settings))
        .collect()
}

/// Stadium extrusion over each logical segment's sub-segment arc length.
pub(crate) fn arc_segment_extrusion(path: &Path, settings: &PrintSettings) -> Vec<f64> {
    sub_segment_arc_lengths(path.machine())
        .into_iter()
        .map(|length| stadium_extrusion(length, settings))
        .collect()
}

/// Sum machine sub-segment lengths back into one length per logical segment.
pub(crate) fn sub_segment_arc_lengths(machine: &MachinePath) -> Vec<f64> {
    let Some(counts) = machine.sub_segment_counts.as_ref() else {
        return segment_lengths(&machine.coords).unwrap_or_default();
    };
    let mut lengths = Vec::with_capacity(counts.len());
    let mut idx = 0;
    for &count in counts {
        let end = (idx + count).min(machine.coords.len().saturating_sub(1));
        let arc: f64 = machine.coords[idx..=end]
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .sum();
        lengths.push(arc);
        idx = end;
    }
    lengths
}

/// Two-pass subdivision shared by the bed kinematics.
///
/// `frame(rotation, tilt)` maps a logical position into machine space at
/// the given axis angles. Position, rotation and tilt are interpolated
/// linearly along each logical segment.
pub(crate) fn subdivide<F>(points: &[PathPoint], div_distance: f64, frame: F) -> MachinePath
where
    F: Fn(f64, f64) -> Rot3,
{
    let sample = |a: &PathPoint, b: &PathPoint, t: f64| -> (Point3, Rot3) {
        let position = lerp_point(&a.position, &b.position, t);
        let rotation = a.rotation + (b.rotation - a.rotation) * t;
        let tilt = a.tilt + (b.tilt - a.tilt) * t;
        let r = frame(rotation, tilt);
        (r * position, r)
    };

    let mut coords = Vec::new();
    let mut normals = Vec::new();
    let mut counts = Vec::with_capacity(points.len().saturating_sub(1));

    let Some(first) = points.first() else {
        return MachinePath::default();
    };
    let (start, r0) = sample(first, first, 0.0);
    coords.push(start);
    normals.push(normal_of(&r0));

    for (index, w) in points.windows(2).enumerate() {
        let (a, b) = (&w[0], &w[1]);

        // Coarse pass: estimate the bed-frame arc length.
        let mut arc = 0.0;
        let mut prev = sample(a, b, 0.0).0;
        for k in 1..=PRE_SAMPLES {
            let p = sample(a, b, k as f64 / PRE_SAMPLES as f64).0;
            arc += (p - prev).norm();
            prev = p;
        }

        let count = if arc.is_finite() && arc > 0.0 {
            (arc / div_distance).ceil() as usize
        } else {
            0
        };
        debug!(segment = index, arc, count, "subdivided segment");

        for k in 1..=count {
            let (p, r) = sample(a, b, k as f64 / count as f64);
            coords.push(p);
            normals.push(normal_of(&r));
        }
        counts.push(count);
    }

    MachinePath {
        coords,
        normals,
        sub_segment_counts: Some(counts),
    }
}
