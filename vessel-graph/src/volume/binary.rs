//! Dense binary voxel storage.

use rayon::prelude::*;

use crate::core::VoxelCoord;
use crate::error::{Error, Result};

/// Dense 3D occupancy volume in row-major (z, y, x) layout.
///
/// Every stored value is 0 (background) or 1 (foreground). Construction
/// from arbitrary values binarizes them (any non-zero value is foreground).
///
/// ```text
/// index = (z * ny + y) * nx + x
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryVolume {
    shape: [usize; 3],
    data: Vec<u8>,
}

impl BinaryVolume {
    /// Create an all-background volume
    pub fn new(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: vec![0; shape[0] * shape[1] * shape[2]],
        }
    }

    /// Wrap a raw buffer, binarizing every value
    pub fn from_vec(shape: [usize; 3], mut data: Vec<u8>) -> Result<Self> {
        let expected = shape[0] * shape[1] * shape[2];
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        data.par_iter_mut().for_each(|v| *v = u8::from(*v != 0));
        Ok(Self { shape, data })
    }

    /// Build from foreground coordinates
    pub fn from_coords(shape: [usize; 3], coords: &[VoxelCoord]) -> Result<Self> {
        let mut volume = Self::new(shape);
        for &c in coords {
            if !volume.contains(c) {
                return Err(Error::PointOutOfBounds {
                    z: c.z,
                    y: c.y,
                    x: c.x,
                    shape,
                });
            }
            volume.set(c, true);
        }
        Ok(volume)
    }

    /// Volume shape as (z, y, x)
    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Total number of voxels
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Raw 0/1 buffer
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// True if the coordinate lies inside the volume
    #[inline]
    pub fn contains(&self, c: VoxelCoord) -> bool {
        c.z < self.shape[0] && c.y < self.shape[1] && c.x < self.shape[2]
    }

    /// Linear index of an in-bounds coordinate
    #[inline]
    pub fn index(&self, c: VoxelCoord) -> usize {
        (c.z * self.shape[1] + c.y) * self.shape[2] + c.x
    }

    /// Coordinate of a linear index
    #[inline]
    pub fn coord(&self, index: usize) -> VoxelCoord {
        let plane = self.shape[1] * self.shape[2];
        let z = index / plane;
        let rem = index % plane;
        VoxelCoord::new(z, rem / self.shape[2], rem % self.shape[2])
    }

    /// Foreground test; out-of-bounds reads are background
    #[inline]
    pub fn get(&self, c: VoxelCoord) -> bool {
        self.contains(c) && self.data[self.index(c)] != 0
    }

    /// Foreground test with signed coordinates; out-of-bounds reads are background
    #[inline]
    pub fn get_signed(&self, z: isize, y: isize, x: isize) -> bool {
        if z < 0 || y < 0 || x < 0 {
            return false;
        }
        self.get(VoxelCoord::new(z as usize, y as usize, x as usize))
    }

    /// Set or clear a voxel. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, c: VoxelCoord, value: bool) {
        if self.contains(c) {
            let i = self.index(c);
            self.data[i] = u8::from(value);
        }
    }

    /// Number of foreground voxels
    pub fn foreground_count(&self) -> usize {
        self.data.par_iter().filter(|&&v| v != 0).count()
    }

    /// True if there is no foreground
    pub fn is_empty(&self) -> bool {
        !self.data.par_iter().any(|&v| v != 0)
    }

    /// Foreground coordinates in row-major order
    pub fn foreground_coords(&self) -> Vec<VoxelCoord> {
        let plane = self.shape[1] * self.shape[2];
        if plane == 0 {
            return Vec::new();
        }
        self.data
            .par_chunks(plane)
            .enumerate()
            .flat_map_iter(|(z, slice)| {
                let nx = self.shape[2];
                slice
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| **v != 0)
                    .map(move |(i, _)| VoxelCoord::new(z, i / nx, i % nx))
            })
            .collect()
    }

    /// Inclusive bounding box of the foreground, `None` when empty
    pub fn bounding_box(&self) -> Option<(VoxelCoord, VoxelCoord)> {
        let mut min = VoxelCoord::new(usize::MAX, usize::MAX, usize::MAX);
        let mut max = VoxelCoord::new(0, 0, 0);
        let mut found = false;
        for c in self.foreground_coords() {
            found = true;
            min = VoxelCoord::new(min.z.min(c.z), min.y.min(c.y), min.x.min(c.x));
            max = VoxelCoord::new(max.z.max(c.z), max.y.max(c.y), max.x.max(c.x));
        }
        found.then_some((min, max))
    }

    /// Copy of the inclusive box `[min, max]`
    pub fn cropped(&self, min: VoxelCoord, max: VoxelCoord) -> Result<Self> {
        for c in [min, max] {
            if !self.contains(c) {
                return Err(Error::PointOutOfBounds {
                    z: c.z,
                    y: c.y,
                    x: c.x,
                    shape: self.shape,
                });
            }
        }
        let shape = [max.z - min.z + 1, max.y - min.y + 1, max.x - min.x + 1];
        let mut out = Self::new(shape);
        for z in 0..shape[0] {
            for y in 0..shape[1] {
                let src = self.index(VoxelCoord::new(min.z + z, min.y + y, min.x));
                let dst = out.index(VoxelCoord::new(z, y, 0));
                out.data[dst..dst + shape[2]].copy_from_slice(&self.data[src..src + shape[2]]);
            }
        }
        Ok(out)
    }

    /// Copy surrounded by `pad` background voxels on every face
    pub fn padded(&self, pad: usize) -> Self {
        let shape = [
            self.shape[0] + 2 * pad,
            self.shape[1] + 2 * pad,
            self.shape[2] + 2 * pad,
        ];
        let mut out = Self::new(shape);
        if self.data.is_empty() {
            return out;
        }
        for z in 0..self.shape[0] {
            for y in 0..self.shape[1] {
                let src = self.index(VoxelCoord::new(z, y, 0));
                let dst = out.index(VoxelCoord::new(z + pad, y + pad, pad));
                out.data[dst..dst + self.shape[2]]
                    .copy_from_slice(&self.data[src..src + self.shape[2]]);
            }
        }
        out
    }

    /// True if every voxel on the outer faces is background
    pub fn has_zero_border(&self) -> bool {
        let [nz, ny, nx] = self.shape;
        self.foreground_coords().iter().all(|c| {
            c.z > 0 && c.y > 0 && c.x > 0 && c.z + 1 < nz && c.y + 1 < ny && c.x + 1 < nx
        })
    }
}
