#![warn(missing_docs)]

//! Motion program generation for gcoord toolpaths.
//!
//! Walks an ordered sequence of paths and collections and writes the
//! instruction stream: start block, initial printer state, per-path motion
//! from each path's kinematics profile, travel blocks between paths with
//! retraction and Z-hop, and the end block.
//!
//! # Example
//!
//! ```ignore
//! use gcoord_gcode::{generate_gcode, GcodeSettings};
//! use gcoord_path::{MachineConfig, Path, PrintItem};
//!
//! let config = MachineConfig::default();
//! let kinematics = config.kinematics()?;
//! let path = Path::from_xyz(&[0.0, 10.0], &[0.0, 0.0], &[0.2, 0.2], &kinematics)?;
//!
//! let program = generate_gcode(&config, GcodeSettings::default(), &[PrintItem::from(path)])?;
//! std::fs::write("output.gcode", program)?;
//! ```

pub mod flavor;
pub mod gcode;

pub use flavor::GcodeFlavor;
pub use gcode::{generate_gcode, GcodeError, GcodeGenerator, GcodeSettings, ProgramStats, Result};
pub use gcoord_path::{flatten, PrintItem};
