//! Binary voxel volumes and their preparation for thinning.
//!
//! Raw segmentation volumes are binarized, cropped to the foreground
//! bounding box and surrounded by a one-voxel background border before
//! thinning. [`PreparedVolume::offset`] restores source coordinates.

mod binary;
mod prepare;

pub use binary::BinaryVolume;
pub use prepare::{PreparedVolume, prepare_volume};
