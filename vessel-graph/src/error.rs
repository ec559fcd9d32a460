//! Error types for vessel-graph

use crate::config::ConfigLoadError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// vessel-graph error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Voxel buffer length does not match the requested shape
    #[error("Volume size mismatch: shape {shape:?} needs {expected} voxels, got {actual}")]
    SizeMismatch {
        /// Requested (z, y, x) shape
        shape: [usize; 3],
        /// Voxel count implied by the shape
        expected: usize,
        /// Voxel count supplied
        actual: usize,
    },

    /// Foreground touches the outer face of the volume
    #[error("Volume has foreground on its outer border; pad it with zeros first")]
    MissingBorder,

    /// A coordinate falls outside the volume
    #[error("Point ({z}, {y}, {x}) is outside volume of shape {shape:?}")]
    PointOutOfBounds {
        /// Z index
        z: usize,
        /// Y index
        y: usize,
        /// X index
        x: usize,
        /// Volume (z, y, x) shape
        shape: [usize; 3],
    },

    /// Per-point attribute count differs from the point count
    #[error("Length mismatch: {points} points but {values} {what}")]
    LengthMismatch {
        /// Number of points
        points: usize,
        /// Number of attribute values
        values: usize,
        /// Attribute name
        what: &'static str,
    },

    /// A vertex id does not exist in the graph
    #[error("Unknown vertex id {0}")]
    UnknownVertex(usize),

    /// A parallel partition task failed; nothing was applied
    #[error("{stage} partition failed: {reason}")]
    Partition {
        /// Cleanup stage that was running
        stage: &'static str,
        /// Failure detail
        reason: String,
    },

    /// Resolution components must be finite and positive
    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigLoadError),
}
