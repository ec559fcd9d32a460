//! Core types for the vessel-graph library.
//!
//! All spatial types use (z, y, x) axis order, matching the row-major
//! layout of voxel volumes.
//!
//! ## Types
//!
//! - [`VoxelCoord`]: Integer voxel indices for volume access
//! - [`Point3`]: Continuous coordinates in voxel units
//! - [`Resolution`]: Physical spacing per voxel along each axis

mod point;
mod resolution;

pub use point::{Point3, VoxelCoord};
pub use resolution::Resolution;
