//! Voxel index and physical coordinate types.
//!
//! All coordinates use (z, y, x) order, matching the row-major layout of
//! [`crate::volume::BinaryVolume`].

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use super::Resolution;

/// Voxel coordinates (integer array indices)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct VoxelCoord {
    /// Z index (slice)
    pub z: usize,
    /// Y index (row)
    pub y: usize,
    /// X index (column)
    pub x: usize,
}

impl VoxelCoord {
    /// Create a new voxel coordinate
    #[inline]
    pub fn new(z: usize, y: usize, x: usize) -> Self {
        Self { z, y, x }
    }

    /// Coordinate shifted by a signed (z, y, x) step, or `None` if it would go negative
    #[inline]
    pub fn offset(&self, dz: isize, dy: isize, dx: isize) -> Option<VoxelCoord> {
        Some(VoxelCoord::new(
            self.z.checked_add_signed(dz)?,
            self.y.checked_add_signed(dy)?,
            self.x.checked_add_signed(dx)?,
        ))
    }

    /// Chebyshev distance (max axis distance), the 26-connectivity metric
    #[inline]
    pub fn chebyshev_distance(&self, other: &VoxelCoord) -> usize {
        self.z
            .abs_diff(other.z)
            .max(self.y.abs_diff(other.y))
            .max(self.x.abs_diff(other.x))
    }

    /// Convert to a continuous point
    #[inline]
    pub fn to_point(self) -> Point3 {
        Point3::new(self.z as f64, self.y as f64, self.x as f64)
    }
}

/// Continuous 3D coordinates in voxel units (f64)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    /// Z coordinate
    pub z: f64,
    /// Y coordinate
    pub y: f64,
    /// X coordinate
    pub x: f64,
}

impl Point3 {
    /// Create a new point
    #[inline]
    pub fn new(z: f64, y: f64, x: f64) -> Self {
        Self { z, y, x }
    }

    /// Coordinate along axis 0 (z), 1 (y) or 2 (x)
    #[inline]
    pub fn axis(&self, axis: usize) -> f64 {
        match axis {
            0 => self.z,
            1 => self.y,
            _ => self.x,
        }
    }

    /// Euclidean distance in voxel units
    #[inline]
    pub fn distance(&self, other: &Point3) -> f64 {
        (*self - *other).norm()
    }

    /// Euclidean distance after scaling each axis by the resolution
    #[inline]
    pub fn physical_distance(&self, other: &Point3, resolution: &Resolution) -> f64 {
        (*self - *other).scaled(resolution).norm()
    }

    /// Scale each axis by the matching resolution component
    #[inline]
    pub fn scaled(&self, resolution: &Resolution) -> Point3 {
        Point3::new(
            self.z * resolution.z,
            self.y * resolution.y,
            self.x * resolution.x,
        )
    }

    /// Vector length
    #[inline]
    pub fn norm(&self) -> f64 {
        (self.z * self.z + self.y * self.y + self.x * self.x).sqrt()
    }

    /// Centroid of a set of points, `None` when empty
    pub fn mean_of<I>(points: I) -> Option<Point3>
    where
        I: IntoIterator<Item = Point3>,
    {
        let mut sum = Point3::default();
        let mut count = 0usize;
        for p in points {
            sum = sum + p;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Point3::new(sum.z / n, sum.y / n, sum.x / n))
    }
}

impl Add for Point3 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point3::new(self.z + other.z, self.y + other.y, self.x + other.x)
    }
}

impl Sub for Point3 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point3::new(self.z - other.z, self.y - other.y, self.x - other.x)
    }
}
