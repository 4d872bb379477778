//! Per-path setting overrides.
//!
//! A path carries two override layers: values set on the path itself and
//! values broadcast to it by the collection that owns it. Resolution is
//! path, then collection, then the global [`PrintSettings`].

use serde::{Deserialize, Serialize};

use crate::config::PrintSettings;

/// Optional overrides for every print setting. `None` means inherit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Nozzle diameter (mm).
    pub nozzle_diameter: Option<f64>,
    /// Filament diameter (mm).
    pub filament_diameter: Option<f64>,
    /// Layer height (mm).
    pub layer_height: Option<f64>,
    /// Extruding feed rate (mm/min).
    pub print_speed: Option<f64>,
    /// Travel feed rate (mm/min).
    pub travel_speed: Option<f64>,
    /// X origin offset (mm).
    pub x_origin: Option<f64>,
    /// Y origin offset (mm).
    pub y_origin: Option<f64>,
    /// Fan PWM value.
    pub fan_speed: Option<f64>,
    /// Nozzle temperature (°C).
    pub nozzle_temperature: Option<f64>,
    /// Bed temperature (°C).
    pub bed_temperature: Option<f64>,
    /// Retract before travel.
    pub retraction: Option<bool>,
    /// Retraction length (mm).
    pub retraction_distance: Option<f64>,
    /// Un-retraction length (mm).
    pub unretraction_distance: Option<f64>,
    /// Lift during travel.
    pub z_hop: Option<bool>,
    /// Lift height (mm).
    pub z_hop_distance: Option<f64>,
    /// Extrusion scale factor.
    pub extrusion_multiplier: Option<f64>,
    /// Raw text before the path.
    pub before_gcode: Option<String>,
    /// Raw text after the path.
    pub after_gcode: Option<String>,
}

/// One setting assignment, used to override a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    /// Nozzle diameter (mm).
    NozzleDiameter(f64),
    /// Filament diameter (mm).
    FilamentDiameter(f64),
    /// Layer height (mm).
    LayerHeight(f64),
    /// Extruding feed rate (mm/min).
    PrintSpeed(f64),
    /// Travel feed rate (mm/min).
    TravelSpeed(f64),
    /// X origin offset (mm).
    XOrigin(f64),
    /// Y origin offset (mm).
    YOrigin(f64),
    /// Fan PWM value.
    FanSpeed(f64),
    /// Nozzle temperature (°C).
    NozzleTemperature(f64),
    /// Bed temperature (°C).
    BedTemperature(f64),
    /// Retract before travel.
    Retraction(bool),
    /// Retraction length (mm).
    RetractionDistance(f64),
    /// Un-retraction length (mm).
    UnretractionDistance(f64),
    /// Lift during travel.
    ZHop(bool),
    /// Lift height (mm).
    ZHopDistance(f64),
    /// Extrusion scale factor.
    ExtrusionMultiplier(f64),
    /// Raw text before the path.
    BeforeGcode(String),
    /// Raw text after the path.
    AfterGcode(String),
}

impl Setting {
    /// Field name, as used in config documents.
    pub fn name(&self) -> &'static str {
        match self {
            Setting::NozzleDiameter(_) => "nozzle_diameter",
            Setting::FilamentDiameter(_) => "filament_diameter",
            Setting::LayerHeight(_) => "layer_height",
            Setting::PrintSpeed(_) => "print_speed",
            Setting::TravelSpeed(_) => "travel_speed",
            Setting::XOrigin(_) => "x_origin",
            Setting::YOrigin(_) => "y_origin",
            Setting::FanSpeed(_) => "fan_speed",
            Setting::NozzleTemperature(_) => "nozzle_temperature",
            Setting::BedTemperature(_) => "bed_temperature",
            Setting::Retraction(_) => "retraction",
            Setting::RetractionDistance(_) => "retraction_distance",
            Setting::UnretractionDistance(_) => "unretraction_distance",
            Setting::ZHop(_) => "z_hop",
            Setting::ZHopDistance(_) => "z_hop_distance",
            Setting::ExtrusionMultiplier(_) => "extrusion_multiplier",
            Setting::BeforeGcode(_) => "before_gcode",
            Setting::AfterGcode(_) => "after_gcode",
        }
    }
}

impl PathSettings {
    /// Store one override.
    pub fn set(&mut self, setting: Setting) {
        match setting {
            Setting::NozzleDiameter(v) => self.nozzle_diameter = Some(v),
            Setting::FilamentDiameter(v) => self.filament_diameter = Some(v),
            Setting::LayerHeight(v) => self.layer_height = Some(v),
            Setting::PrintSpeed(v) => self.print_speed = Some(v),
            Setting::TravelSpeed(v) => self.travel_speed = Some(v),
            Setting::XOrigin(v) => self.x_origin = Some(v),
            Setting::YOrigin(v) => self.y_origin = Some(v),
            Setting::FanSpeed(v) => self.fan_speed = Some(v),
            Setting::NozzleTemperature(v) => self.nozzle_temperature = Some(v),
            Setting::BedTemperature(v) => self.bed_temperature = Some(v),
            Setting::Retraction(v) => self.retraction = Some(v),
            Setting::RetractionDistance(v) => self.retraction_distance = Some(v),
            Setting::UnretractionDistance(v) => self.unretraction_distance = Some(v),
            Setting::ZHop(v) => self.z_hop = Some(v),
            Setting::ZHopDistance(v) => self.z_hop_distance = Some(v),
            Setting::ExtrusionMultiplier(v) => self.extrusion_multiplier = Some(v),
            Setting::BeforeGcode(v) => self.before_gcode = Some(v),
            Setting::AfterGcode(v) => self.after_gcode = Some(v),
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, setting: Setting) -> Self {
        self.set(setting);
        self
    }

    /// Layer `self` over `lower`: fields set here win.
    pub fn or(&self, lower: &PathSettings) -> PathSettings {
        PathSettings {
            nozzle_diameter: self.nozzle_diameter.or(lower.nozzle_diameter),
            filament_diameter: self.filament_diameter.or(lower.filament_diameter),
            layer_height: self.layer_height.or(lower.layer_height),
            print_speed: self.print_speed.or(lower.print_speed),
            travel_speed: self.travel_speed.or(lower.travel_speed),
            x_origin: self.x_origin.or(lower.x_origin),
            y_origin: self.y_origin.or(lower.y_origin),
            fan_speed: self.fan_speed.or(lower.fan_speed),
            nozzle_temperature: self.nozzle_temperature.or(lower.nozzle_temperature),
            bed_temperature: self.bed_temperature.or(lower.bed_temperature),
            retraction: self.retraction.or(lower.retraction),
            retraction_distance: self.retraction_distance.or(lower.retraction_distance),
            unretraction_distance: self.unretraction_distance.or(lower.unretraction_distance),
            z_hop: self.z_hop.or(lower.z_hop),
            z_hop_distance: self.z_hop_distance.or(lower.z_hop_distance),
            extrusion_multiplier: self.extrusion_multiplier.or(lower.extrusion_multiplier),
            before_gcode: self.before_gcode.clone().or_else(|| lower.before_gcode.clone()),
            after_gcode: self.after_gcode.clone().or_else(|| lower.after_gcode.clone()),
        }
    }

    /// Fill every unset field from the global defaults.
    pub fn resolve(&self, defaults: &PrintSettings) -> PrintSettings {
        PrintSettings {
            nozzle_diameter: self.nozzle_diameter.unwrap_or(defaults.nozzle_diameter),
            filament_diameter: self.filament_diameter.unwrap_or(defaults.filament_diameter),
            layer_height: self.layer_height.unwrap_or(defaults.layer_height),
            print_speed: self.print_speed.unwrap_or(defaults.print_speed),
            travel_speed: self.travel_speed.unwrap_or(defaults.travel_speed),
            x_origin: self.x_origin.unwrap_or(defaults.x_origin),
            y_origin: self.y_origin.unwrap_or(defaults.y_origin),
            fan_speed: self.fan_speed.unwrap_or(defaults.fan_speed),
            nozzle_temperature: self.nozzle_temperature.unwrap_or(defaults.nozzle_temperature),
            bed_temperature: self.bed_temperature.unwrap_or(defaults.bed_temperature),
            retraction: self.retraction.unwrap_or(defaults.retraction),
            retraction_distance: self.retraction_distance.unwrap_or(defaults.retraction_distance),
            unretraction_distance: self
                .unretraction_distance
                .unwrap_or(defaults.unretraction_distance),
            z_hop: self.z_hop.unwrap_or(defaults.z_hop),
            z_hop_distance: self.z_hop_distance.unwrap_or(defaults.z_hop_distance),
            extrusion_multiplier: self
                .extrusion_multiplier
                .unwrap_or(defaults.extrusion_multiplier),
            before_gcode: self
                .before_gcode
                .clone()
                .or_else(|| defaults.before_gcode.clone()),
            after_gcode: self
                .after_gcode
                .clone()
                .or_else(|| defaults.after_gcode.clone()),
        }
    }
}
