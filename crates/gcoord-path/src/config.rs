//! Machine and print configuration.
//!
//! The document is plain serde data. Every section carries `#[serde(default)]`
//! so a partial JSON file only needs the values that differ from the stock
//! machine.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{PathError, Result};
use crate::kinematics::{BedRotate, BedTiltBc, Cartesian, Kinematics, NozzleTilt};

/// Global print defaults. Every path setting falls back to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintSettings {
    /// Nozzle diameter (mm).
    pub nozzle_diameter: f64,
    /// Filament diameter (mm).
    pub filament_diameter: f64,
    /// Layer height (mm).
    pub layer_height: f64,
    /// Extruding feed rate (mm/min).
    pub print_speed: f64,
    /// Travel feed rate (mm/min).
    pub travel_speed: f64,
    /// X offset added to every emitted coordinate (mm).
    pub x_origin: f64,
    /// Y offset added to every emitted coordinate (mm).
    pub y_origin: f64,
    /// Part cooling fan PWM value (0-255).
    pub fan_speed: f64,
    /// Nozzle temperature (°C).
    pub nozzle_temperature: f64,
    /// Bed temperature (°C).
    pub bed_temperature: f64,
    /// Retract filament before travel moves.
    pub retraction: bool,
    /// Retraction length (mm of filament).
    pub retraction_distance: f64,
    /// Length restored after travel (mm of filament).
    pub unretraction_distance: f64,
    /// Lift the nozzle during travel moves.
    pub z_hop: bool,
    /// Lift height (mm).
    pub z_hop_distance: f64,
    /// Scale factor on computed extrusion.
    pub extrusion_multiplier: f64,
    /// Raw text emitted before a path's motion lines.
    pub before_gcode: Option<String>,
    /// Raw text emitted after a path's motion lines.
    pub after_gcode: Option<String>,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            nozzle_diameter: 0.4,
            filament_diameter: 1.75,
            layer_height: 0.2,
            print_speed: 5000.0,
            travel_speed: 10000.0,
            x_origin: 100.0,
            y_origin: 100.0,
            fan_speed: 255.0,
            nozzle_temperature: 200.0,
            bed_temperature: 50.0,
            retraction: false,
            retraction_distance: 2.0,
            unretraction_distance: 2.0,
            z_hop: false,
            z_hop_distance: 3.0,
            extrusion_multiplier: 1.0,
            before_gcode: None,
            after_gcode: None,
        }
    }
}

impl PrintSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("nozzle_diameter", self.nozzle_diameter),
            ("filament_diameter", self.filament_diameter),
            ("layer_height", self.layer_height),
            ("print_speed", self.print_speed),
            ("travel_speed", self.travel_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PathError::InvalidSettings(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("extrusion_multiplier", self.extrusion_multiplier),
            ("retraction_distance", self.retraction_distance),
            ("unretraction_distance", self.unretraction_distance),
            ("z_hop_distance", self.z_hop_distance),
            ("fan_speed", self.fan_speed),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PathError::InvalidSettings(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if !(self.x_origin.is_finite() && self.y_origin.is_finite()) {
            return Err(PathError::InvalidSettings("origin must be finite".into()));
        }
        Ok(())
    }
}

/// The machine geometry families understood by the kinematics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KinematicsKind {
    /// Plain gantry.
    Cartesian,
    /// Nozzle tilts and rotates over a fixed bed.
    NozzleTilt,
    /// Bed rotates about the vertical axis.
    BedRotate,
    /// Bed tilts about Y, then rotates about Z.
    BedTiltBc,
}

impl KinematicsKind {
    /// Canonical configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            KinematicsKind::Cartesian => "Cartesian",
            KinematicsKind::NozzleTilt => "NozzleTilt",
            KinematicsKind::BedRotate => "BedRotate",
            KinematicsKind::BedTiltBc => "BedTiltBC",
        }
    }
}

impl FromStr for KinematicsKind {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Cartesian" => Ok(KinematicsKind::Cartesian),
            "NozzleTilt" => Ok(KinematicsKind::NozzleTilt),
            "BedRotate" => Ok(KinematicsKind::BedRotate),
            "BedTiltBC" => Ok(KinematicsKind::BedTiltBc),
            other => Err(PathError::UnsupportedKinematics(other.to_string())),
        }
    }
}

impl std::fmt::Display for KinematicsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Build volume (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BedSize {
    /// X extent.
    pub x: f64,
    /// Y extent.
    pub y: f64,
    /// Z extent.
    pub z: f64,
}

impl Default for BedSize {
    fn default() -> Self {
        Self {
            x: 200.0,
            y: 200.0,
            z: 205.0,
        }
    }
}

impl BedSize {
    /// Check if a machine position is within the build volume.
    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        (0.0..=self.x).contains(&x) && (0.0..=self.y).contains(&y) && (0.0..=self.z).contains(&z)
    }
}

/// Hardware description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hardware {
    /// Kinematics variant name: `Cartesian`, `NozzleTilt`, `BedRotate` or `BedTiltBC`.
    pub kinematics: String,
    /// Build volume.
    pub bed_size: BedSize,
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            kinematics: KinematicsKind::Cartesian.name().to_string(),
            bed_size: BedSize::default(),
        }
    }
}

/// Per-variant kinematics parameters. Only the selected variant's block is used.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicsParams {
    /// Nozzle tilt parameters.
    pub nozzle_tilt: NozzleTilt,
    /// Bed tilt (B) + rotate (C) parameters.
    pub bed_tilt_bc: BedTiltBc,
    /// Rotating bed parameters.
    pub bed_rotate: BedRotate,
}

/// Complete machine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Global print defaults.
    pub print: PrintSettings,
    /// Hardware description.
    pub hardware: Hardware,
    /// Per-variant kinematics parameters.
    pub kinematics: KinematicsParams,
}

impl MachineConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MachineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate print defaults and the selected kinematics.
    pub fn validate(&self) -> Result<()> {
        self.print.validate()?;
        self.kinematics().map(|_| ())
    }

    /// The selected kinematics variant name, parsed.
    pub fn kinematics_kind(&self) -> Result<KinematicsKind> {
        self.hardware.kinematics.parse()
    }

    /// Build the selected kinematics profile.
    pub fn kinematics(&self) -> Result<Kinematics> {
        let kinematics = match self.kinematics_kind()? {
            KinematicsKind::Cartesian => Kinematics::Cartesian(Cartesian),
            KinematicsKind::NozzleTilt => Kinematics::NozzleTilt(self.kinematics.nozzle_tilt.clone()),
            KinematicsKind::BedRotate => Kinematics::BedRotate(self.kinematics.bed_rotate.clone()),
            KinematicsKind::BedTiltBc => Kinematics::BedTiltBc(self.kinematics.bed_tilt_bc.clone()),
        };
        kinematics.validate()?;
        Ok(kinematics)
    }
}
