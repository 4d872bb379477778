//! Motion program emitter.

use gcoord_math::Point3;
use gcoord_path::kinematics::{emitted_position, format_value, motion_line};
use gcoord_path::{flatten, BedSize, MachineConfig, Path, PathError, PrintItem, PrintSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::flavor::GcodeFlavor;

/// Errors from program generation.
#[derive(Error, Debug)]
pub enum GcodeError {
    /// A path or its resolved settings were rejected.
    #[error(transparent)]
    Path(#[from] PathError),

    /// There is nothing to print.
    #[error("no paths to emit")]
    EmptyProgram,
}

/// Result type for program generation.
pub type Result<T> = std::result::Result<T, GcodeError>;

/// Output options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcodeSettings {
    /// Dialect for the start and end blocks.
    pub flavor: GcodeFlavor,
    /// Replaces the flavor's start block.
    pub start_gcode: Option<String>,
    /// Replaces the flavor's end block.
    pub end_gcode: Option<String>,
    /// Fraction digits for coordinates, axis values and extrusion.
    pub decimals: usize,
}

impl Default for GcodeSettings {
    fn default() -> Self {
        Self {
            flavor: GcodeFlavor::Marlin,
            start_gcode: None,
            end_gcode: None,
            decimals: 5,
        }
    }
}

/// Counters for one generated program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramStats {
    /// Lines written, start and end blocks included.
    pub line_count: usize,
    /// Paths printed.
    pub path_count: usize,
    /// Travel blocks between paths.
    pub travel_count: usize,
    /// Filament extruded over all paths (mm).
    pub total_extrusion: f64,
}

/// Writes a program for a sequence of paths.
///
/// Paths carry their own kinematics; the generator only needs the global
/// print defaults and the bed volume from the machine config.
pub struct GcodeGenerator {
    defaults: PrintSettings,
    bed: BedSize,
    settings: GcodeSettings,
    output: Vec<String>,
    stats: ProgramStats,
}

impl GcodeGenerator {
    /// Create a generator for `config`.
    pub fn new(config: &MachineConfig, settings: GcodeSettings) -> Self {
        Self {
            defaults: config.print.clone(),
            bed: config.hardware.bed_size,
            settings,
            output: Vec::new(),
            stats: ProgramStats::default(),
        }
    }

    /// Generate the full program.
    pub fn generate(&mut self, items: &[PrintItem]) -> Result<String> {
        let paths = flatten(items);
        let Some(first) = paths.first() else {
            return Err(GcodeError::EmptyProgram);
        };
        self.defaults.validate()?;

        self.output.clear();
        self.stats = ProgramStats::default();

        self.write_start();
        self.write_initial_settings();

        let first_settings = first.resolve_settings(&self.defaults);
        self.emit(motion_line(
            "G0",
            first_settings.travel_speed,
            &emitted_position(first.first_point(), &first_settings),
            &first.kinematics().axis_words(first.first_point()),
            None,
            self.settings.decimals,
        ));

        let mut previous: Option<(&Path, PrintSettings)> = None;
        for (index, &path) in paths.iter().enumerate() {
            let settings = path.resolve_settings(&self.defaults);
            settings.validate()?;

            if let Some((prev, prev_settings)) = &previous {
                self.write_travel(prev, prev_settings, path, &settings);
            }
            self.write_path(index, path, &settings);
            previous = Some((path, settings));
        }

        if let Some((last, last_settings)) = &previous {
            self.write_end(last, last_settings);
        }

        self.stats.path_count = paths.len();
        self.stats.line_count = self.output.len();
        info!(
            paths = self.stats.path_count,
            lines = self.stats.line_count,
            extrusion = self.stats.total_extrusion,
            "generated program"
        );

        let mut program = self.output.join("\n");
        program.push('\n');
        Ok(program)
    }

    /// Generate the program and return its counters alongside.
    pub fn generate_with_stats(&mut self, items: &[PrintItem]) -> Result<(String, ProgramStats)> {
        let program = self.generate(items)?;
        Ok((program, self.stats.clone()))
    }

    /// Counters from the last successful run.
    pub fn stats(&self) -> &ProgramStats {
        &self.stats
    }

    fn emit(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    fn emit_block(&mut self, block: &str) {
        for line in block.lines() {
            self.emit(line);
        }
    }

    fn value(&self, v: f64) -> String {
        format_value(v, self.settings.decimals)
    }

    fn write_start(&mut self) {
        match self.settings.start_gcode.clone() {
            Some(custom) => self.emit_block(&custom),
            None => {
                for line in self.settings.flavor.start_block() {
                    self.emit(line);
                }
            }
        }
    }

    /// Custom end text, or the flavor's shutdown from where `last` finished.
    fn write_end(&mut self, last: &Path, settings: &PrintSettings) {
        if let Some(custom) = self.settings.end_gcode.clone() {
            self.emit_block(&custom);
            return;
        }
        let position = emitted_position(last.last_point(), settings);
        let block = self
            .settings
            .flavor
            .end_block(&self.bed, settings, &position, self.settings.decimals);
        for line in block {
            self.emit(line);
        }
    }

    fn write_initial_settings(&mut self) {
        let bed = format_value(self.defaults.bed_temperature, 0);
        let nozzle = format_value(self.defaults.nozzle_temperature, 0);
        let fan = format_value(self.defaults.fan_speed, 0);
        self.emit(format!("M140 S{bed}"));
        self.emit(format!("M104 S{nozzle}"));
        self.emit(format!("M190 S{bed}"));
        self.emit(format!("M109 S{nozzle}"));
        self.emit(format!("M106 S{fan}"));
        self.emit("G90");
        self.emit("M83");
    }

    /// Setting changes, pre-path text, motion, post-path text.
    fn write_path(&mut self, index: usize, path: &Path, settings: &PrintSettings) {
        self.write_setting_deltas(settings);

        if let Some(text) = &settings.before_gcode {
            self.emit_block(text);
        }

        let kinematics = path.kinematics();
        let out_of_bed = path
            .points()
            .iter()
            .filter(|p| !self.in_bed(&emitted_position(p, settings)))
            .count();
        if out_of_bed > 0 {
            warn!(path = index, points = out_of_bed, "coordinates outside the bed volume");
        }

        let extrusion: f64 = kinematics.extrusion(path, settings).iter().sum();
        self.stats.total_extrusion += extrusion;

        let lines = kinematics.emit_motion(path, settings, self.settings.decimals);
        debug!(
            path = index,
            kinematics = %kinematics.kind(),
            lines = lines.len(),
            extrusion,
            "emitted path"
        );
        for line in lines {
            self.emit(line);
        }

        if let Some(text) = &settings.after_gcode {
            self.emit_block(text);
        }
    }

    /// Heater and fan commands for every value that differs from the global
    /// defaults. A path back at the default sends nothing, so the printer keeps
    /// the last override until a later path changes it.
    fn write_setting_deltas(&mut self, settings: &PrintSettings) {
        let changes = [
            ("M104", settings.nozzle_temperature, self.defaults.nozzle_temperature),
            ("M140", settings.bed_temperature, self.defaults.bed_temperature),
            ("M106", settings.fan_speed, self.defaults.fan_speed),
        ];
        for (code, value, default) in changes {
            if value != default {
                self.emit(format!("{code} S{}", format_value(value, 0)));
            }
        }
    }

    /// Relative travel from the end of `from` to the start of `to`.
    ///
    /// Retraction and Z-hop follow the finishing path; the feed rate follows
    /// the next one.
    fn write_travel(
        &mut self,
        from: &Path,
        from_settings: &PrintSettings,
        to: &Path,
        to_settings: &PrintSettings,
    ) {
        let start = emitted_position(from.last_point(), from_settings);
        let target = emitted_position(to.first_point(), to_settings);
        let delta = Point3::from(target - start);
        let feed = to_settings.travel_speed;
        let feed_word = format_value(feed, 0);

        self.emit("G91");
        if from_settings.retraction {
            let line = format!("G1 E-{}", self.value(from_settings.retraction_distance));
            self.emit(line);
        }
        if from_settings.z_hop {
            let line = format!("G0 F{feed_word} Z{}", self.value(from_settings.z_hop_distance));
            self.emit(line);
        }

        let axes = to
            .kinematics()
            .axis_deltas(from.last_point(), to.first_point());
        self.emit(motion_line("G0", feed, &delta, &axes, None, self.settings.decimals));

        if from_settings.z_hop {
            let line = format!("G0 F{feed_word} Z-{}", self.value(from_settings.z_hop_distance));
            self.emit(line);
        }
        if from_settings.retraction {
            let line = format!("G1 E{}", self.value(from_settings.unretraction_distance));
            self.emit(line);
        }
        self.emit("G90");
        self.emit("M83");

        self.stats.travel_count += 1;
    }

    fn in_bed(&self, p: &Point3) -> bool {
        self.bed.contains(p.x, p.y, p.z)
    }
}

/// Generate a program in one call.
pub fn generate_gcode(
    config: &MachineConfig,
    settings: GcodeSettings,
    items: &[PrintItem],
) -> Result<String> {
    GcodeGenerator::new(config, settings).generate(items)
}
