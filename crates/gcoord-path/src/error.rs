//! Error types for path construction and kinematics.

use thiserror::Error;

/// Errors that can occur while building or transforming paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// A path needs at least one point.
    #[error("path has no points")]
    EmptyPath,

    /// Coordinate arrays disagree in length.
    #[error("{axis} has {got} values, expected {expected}")]
    LengthMismatch {
        /// Name of the offending array.
        axis: &'static str,
        /// Length of the reference (x) array.
        expected: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// The configured kinematics variant does not exist.
    #[error("unsupported kinematics variant: {0:?} (expected Cartesian, NozzleTilt, BedRotate or BedTiltBC)")]
    UnsupportedKinematics(String),

    /// Resolved print settings are unusable.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Kinematics or hardware configuration is unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Config document could not be parsed.
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for path operations.
pub type Result<T> = std::result::Result<T, PathError>;
