//! Vessel radius estimation.
//!
//! Radii are the mean of the four nearest background voxels around each
//! skeleton point, measured with a [`CorrectionLut`] that accounts for
//! voxel faces. The search window is capped at the table size so fully
//! solid neighborhoods terminate.

mod estimator;
mod lut;

pub use estimator::{RadiusEstimates, RadiusEstimator, estimate_radii, point_radius};
pub use lut::{CorrectionLut, DEFAULT_LUT_SIZE};
