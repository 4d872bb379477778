#![warn(missing_docs)]

//! Toolpath model and multi-axis kinematics for gcoord.
//!
//! A [`Path`] is built from logical points (positions plus rotation/tilt
//! intent) and immediately mapped into machine space by its [`Kinematics`]
//! profile. Paths group into a [`PathCollection`], which orders its members
//! to shorten travel and broadcasts shared settings. [`offset`] and the
//! [`transform`] helpers derive new paths from existing ones.
//!
//! # Example
//!
//! ```ignore
//! use gcoord_path::{MachineConfig, Path, PathCollection, Setting};
//!
//! let config = MachineConfig::from_json_str(r#"{"hardware": {"kinematics": "BedRotate"}}"#)?;
//! let kinematics = config.kinematics()?;
//!
//! let wall = Path::from_xyz(&[0.0, 10.0], &[0.0, 0.0], &[0.2, 0.2], &kinematics)?;
//! let mut layer = PathCollection::new(vec![wall]);
//! layer.apply_to_all(Setting::FanSpeed(0.0));
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod kinematics;
pub mod offset;
pub mod path;
pub mod settings;
pub mod transform;

pub use collection::{flatten, PathCollection, PrintItem};
pub use config::{BedSize, Hardware, KinematicsKind, KinematicsParams, MachineConfig, PrintSettings};
pub use error::{PathError, Result};
pub use kinematics::{
    AxisWord, BedRotate, BedTiltBc, Cartesian, Kinematics, KinematicsModel, MachinePath, NozzleTilt,
};
pub use offset::offset;
pub use path::{Path, PathPoint};
pub use settings::{PathSettings, Setting};
pub use transform::{move_collection, move_path, rotate_xy, stretch, Motion};
