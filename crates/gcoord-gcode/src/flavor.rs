//! Firmware dialects for the program's start and end blocks.

use gcoord_math::Point3;
use gcoord_path::kinematics::format_value;
use gcoord_path::{BedSize, PrintSettings};
use serde::{Deserialize, Serialize};

/// Upper bound on the final nozzle lift (mm).
const END_LIFT: f64 = 10.0;

/// G-code flavor (dialect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GcodeFlavor {
    /// Marlin firmware.
    #[default]
    Marlin,
    /// Klipper firmware.
    Klipper,
    /// RepRap firmware.
    RepRap,
}

impl GcodeFlavor {
    /// Homing and extruder reset. Heating follows from the print settings.
    pub fn start_block(&self) -> Vec<String> {
        let mut lines = vec!["G28".to_string()];
        if *self == GcodeFlavor::Klipper {
            lines.push("BED_MESH_CALIBRATE".into());
        }
        lines.push("G92 E0".into());
        lines
    }

    /// Shutdown after the last path.
    ///
    /// `last` is the final emitted nozzle position and `print` the settings of
    /// the last path. The block switches heaters and fan off, retracts by the
    /// path's retraction distance, lifts the nozzle without leaving the build
    /// volume, parks at the back of the bed and releases the motors.
    pub fn end_block(
        &self,
        bed: &BedSize,
        print: &PrintSettings,
        last: &Point3,
        decimals: usize,
    ) -> Vec<String> {
        let value = |v: f64| format_value(v, decimals);
        let mut lines = match self {
            GcodeFlavor::Klipper => vec!["TURN_OFF_HEATERS".to_string(), "M107".into()],
            GcodeFlavor::Marlin => vec!["M104 S0".into(), "M140 S0".into(), "M107".into()],
            GcodeFlavor::RepRap => vec!["M104 S0".into(), "M140 S0".into(), "M106 S0".into()],
        };

        lines.push("G91".into());
        if print.retraction_distance > 0.0 {
            lines.push(format!("G1 E-{}", value(print.retraction_distance)));
        }
        let lift = (bed.z - last.z).clamp(0.0, END_LIFT);
        if lift > 0.0 {
            lines.push(format!("G0 F{} Z{}", format_value(print.travel_speed, 0), value(lift)));
        }
        lines.push("G90".into());
        lines.push(format!(
            "G0 F{} X{} Y{}",
            format_value(print.travel_speed, 0),
            value(0.0),
            value(bed.y)
        ));
        lines.push("M84".into());
        lines
    }
}
