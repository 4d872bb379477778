//! The path entity: logical points plus the machine-space data derived from
//! them by the active kinematics profile.

use gcoord_math::{centroid, Point3, Vec3};

use crate::config::PrintSettings;
use crate::error::{PathError, Result};
use crate::kinematics::{Kinematics, MachinePath};
use crate::settings::{PathSettings, Setting};

/// One logical point: a position with rotation/tilt intent (radians).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    /// Position in logical space.
    pub position: Point3,
    /// Rotation about the build axis.
    pub rotation: f64,
    /// Tilt.
    pub tilt: f64,
}

impl PathPoint {
    /// A point with zero rotation and tilt.
    pub fn new(position: Point3) -> Self {
        Self::oriented(position, 0.0, 0.0)
    }

    /// A point with explicit rotation and tilt.
    pub fn oriented(position: Point3, rotation: f64, tilt: f64) -> Self {
        Self {
            position,
            rotation,
            tilt,
        }
    }
}

/// An ordered toolpath.
///
/// The kinematics transform runs once in [`Path::new`]; the machine-space
/// data is read-only afterwards. Only the settings layers may change.
///
/// Invariants:
/// - `points` is non-empty, so `machine_coords` is non-empty too.
/// - `machine_coords().len() == normals().len()`.
/// - Without subdivision, `machine_coords().len() == len()`.
/// - With subdivision, `sub_segment_counts().len() == len() - 1` and the
///   counts sum to `machine_coords().len() - 1`.
#[derive(Debug, Clone)]
pub struct Path {
    points: Vec<PathPoint>,
    kinematics: Kinematics,
    machine: MachinePath,
    start: Point3,
    end: Point3,
    center: Point3,
    /// Overrides set on this path; these win over everything else.
    pub settings: PathSettings,
    inherited: PathSettings,
}

impl Path {
    /// Build a path and run the kinematics transform.
    pub fn new(points: Vec<PathPoint>, kinematics: &Kinematics) -> Result<Self> {
        if points.is_empty() {
            return Err(PathError::EmptyPath);
        }
        kinematics.validate()?;

        let machine = kinematics.transform(&points);
        let start = machine.coords.first().copied().ok_or(PathError::EmptyPath)?;
        let end = machine.coords.last().copied().ok_or(PathError::EmptyPath)?;
        let center = centroid(&machine.coords).ok_or(PathError::EmptyPath)?;

        Ok(Self {
            points,
            kinematics: kinematics.clone(),
            machine,
            start,
            end,
            center,
            settings: PathSettings::default(),
            inherited: PathSettings::default(),
        })
    }

    /// Build from coordinate arrays with zero rotation and tilt.
    pub fn from_xyz(x: &[f64], y: &[f64], z: &[f64], kinematics: &Kinematics) -> Result<Self> {
        let zeros = vec![0.0; x.len()];
        Self::from_xyz_oriented(x, y, z, &zeros, &zeros, kinematics)
    }

    /// Build from coordinate arrays plus per-point rotation and tilt.
    ///
    /// All arrays must have the same length as `x`.
    pub fn from_xyz_oriented(
        x: &[f64],
        y: &[f64],
        z: &[f64],
        rotation: &[f64],
        tilt: &[f64],
        kinematics: &Kinematics,
    ) -> Result<Self> {
        let expected = x.len();
        for (axis, len) in [
            ("y", y.len()),
            ("z", z.len()),
            ("rotation", rotation.len()),
            ("tilt", tilt.len()),
        ] {
            if len != expected {
                return Err(PathError::LengthMismatch {
                    axis,
                    expected,
                    got: len,
                });
            }
        }

        let points = (0..expected)
            .map(|i| PathPoint::oriented(Point3::new(x[i], y[i], z[i]), rotation[i], tilt[i]))
            .collect();
        Self::new(points, kinematics)
    }

    /// Replace the path's own overrides.
    pub fn with_settings(mut self, settings: PathSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set one override on this path.
    pub fn set(&mut self, setting: Setting) {
        self.settings.set(setting);
    }

    /// Store a value broadcast by an owning collection.
    pub(crate) fn inherit(&mut self, setting: Setting) {
        self.inherited.set(setting);
    }

    /// Values broadcast by the owning collection.
    pub fn inherited_settings(&self) -> &PathSettings {
        &self.inherited
    }

    /// Resolve path > collection > `defaults`.
    pub fn resolve_settings(&self, defaults: &PrintSettings) -> PrintSettings {
        self.settings.or(&self.inherited).resolve(defaults)
    }

    /// Logical points in print order.
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// The kinematics profile this path was built with.
    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    /// All derived machine-space data.
    pub fn machine(&self) -> &MachinePath {
        &self.machine
    }

    /// Machine-space coordinates.
    pub fn machine_coords(&self) -> &[Point3] {
        &self.machine.coords
    }

    /// Surface normal at each machine coordinate.
    pub fn normals(&self) -> &[Vec3] {
        &self.machine.normals
    }

    /// Sub-segments per logical segment, for subdividing kinematics.
    pub fn sub_segment_counts(&self) -> Option<&[usize]> {
        self.machine.sub_segment_counts.as_deref()
    }

    /// First machine coordinate.
    pub fn start_coord(&self) -> &Point3 {
        &self.start
    }

    /// Last machine coordinate.
    pub fn end_coord(&self) -> &Point3 {
        &self.end
    }

    /// Centroid of the machine coordinates.
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// First logical point.
    pub fn first_point(&self) -> &PathPoint {
        &self.points[0]
    }

    /// Last logical point.
    pub fn last_point(&self) -> &PathPoint {
        &self.points[self.points.len() - 1]
    }

    /// Number of logical points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a path holds at least one point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of logical segments.
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Filament length per logical segment under the resolved settings.
    pub fn extrusion(&self, defaults: &PrintSettings) -> Result<Vec<f64>> {
        let settings = self.resolve_settings(defaults);
        settings.validate()?;
        Ok(self.kinematics.extrusion(self, &settings))
    }

    /// Motion lines for this path, one per logical segment.
    pub fn motion_lines(&self, defaults: &PrintSettings, decimals: usize) -> Result<Vec<String>> {
        let settings = self.resolve_settings(defaults);
        settings.validate()?;
        Ok(self.kinematics.emit_motion(self, &settings, decimals))
    }

    /// A new path over `points` with the same kinematics and settings.
    pub(crate) fn rebuild(&self, points: Vec<PathPoint>) -> Result<Self> {
        let mut path = Self::new(points, &self.kinematics)?;
        path.settings = self.settings.clone();
        path.inherited = self.inherited.clone();
        Ok(path)
    }

    /// A new path with every position mapped through `f`. Rotation and tilt
    /// are kept.
    pub(crate) fn map_positions<F>(&self, f: F) -> Result<Self>
    where
        F: Fn(&Point3) -> Point3,
    {
        let points = self
            .points
            .iter()
            .map(|p| PathPoint::oriented(f(&p.position), p.rotation, p.tilt))
            .collect();
        self.rebuild(points)
    }
}
