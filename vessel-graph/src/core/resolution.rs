//! Physical voxel spacing.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Physical size of one voxel along each axis, in (z, y, x) order
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Spacing along z
    pub z: f64,
    /// Spacing along y
    pub y: f64,
    /// Spacing along x
    pub x: f64,
}

impl Default for Resolution {
    fn default() -> Self {
        Self::unit()
    }
}

impl Resolution {
    /// Create a resolution from (z, y, x) spacings
    pub fn new(z: f64, y: f64, x: f64) -> Self {
        Self { z, y, x }
    }

    /// Same spacing on every axis
    pub fn isotropic(spacing: f64) -> Self {
        Self::new(spacing, spacing, spacing)
    }

    /// Unit spacing, used for visualization radii
    pub fn unit() -> Self {
        Self::isotropic(1.0)
    }

    /// Build from user-facing (x, y, z) order
    pub fn from_xyz(xyz: [f64; 3]) -> Self {
        Self::new(xyz[2], xyz[1], xyz[0])
    }

    /// Spacing along axis 0 (z), 1 (y) or 2 (x)
    #[inline]
    pub fn axis(&self, axis: usize) -> f64 {
        match axis {
            0 => self.z,
            1 => self.y,
            _ => self.x,
        }
    }

    /// Smallest spacing
    pub fn min(&self) -> f64 {
        self.z.min(self.y).min(self.x)
    }

    /// Reject non-finite or non-positive spacings
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("z", self.z), ("y", self.y), ("x", self.x)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::InvalidResolution(format!(
                    "{} spacing must be finite and positive, got {}",
                    name, v
                )));
            }
        }
        Ok(())
    }
}
