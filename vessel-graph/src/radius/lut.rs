//! Corrected-distance lookup table.

use log::debug;
use rayon::prelude::*;

use crate::core::Resolution;

/// Default table edge length (voxels); also the radius search cap
pub const DEFAULT_LUT_SIZE: usize = 150;

/// Corrected physical distance for every non-negative voxel offset.
///
/// Distances are measured to the nearest face of the background voxel
/// rather than its center where that matters: an offset along a single
/// axis is shortened by half a voxel on that axis. Every other offset uses
/// the plain Euclidean distance.
///
/// ```text
/// lut[z][y][x] = z*rz - rz/2              (only z non-zero, same for y, x)
///              = |(z*rz, y*ry, x*rx)|     (otherwise)
/// ```
#[derive(Clone, Debug)]
pub struct CorrectionLut {
    size: usize,
    resolution: Resolution,
    data: Vec<f64>,
}

impl CorrectionLut {
    /// Build the table for a resolution
    pub fn build(resolution: Resolution, size: usize) -> Self {
        let size = size.max(1);
        let plane = size * size;
        let mut data = vec![0.0; plane * size];
        data.par_chunks_mut(plane)
            .enumerate()
            .for_each(|(z, slice)| {
                for y in 0..size {
                    for x in 0..size {
                        slice[y * size + x] = corrected_distance(&resolution, [z, y, x]);
                    }
                }
            });
        debug!(
            "[RadiusLut] built {}^3 table for resolution ({}, {}, {})",
            size, resolution.z, resolution.y, resolution.x
        );
        Self {
            size,
            resolution,
            data,
        }
    }

    /// Table built with the default size
    pub fn with_resolution(resolution: Resolution) -> Self {
        Self::build(resolution, DEFAULT_LUT_SIZE)
    }

    /// Table edge length
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Resolution the table was built for
    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Corrected distance for an absolute (z, y, x) offset.
    ///
    /// Offsets beyond the table clamp to the last entry on that axis.
    #[inline]
    pub fn get(&self, dz: usize, dy: usize, dx: usize) -> f64 {
        let last = self.size - 1;
        let (z, y, x) = (dz.min(last), dy.min(last), dx.min(last));
        self.data[(z * self.size + y) * self.size + x]
    }

    /// Value assigned when the search window is exhausted
    #[inline]
    pub fn boundary_value(&self) -> f64 {
        let last = self.size - 1;
        self.get(last, last, last)
    }
}

fn corrected_distance(resolution: &Resolution, offset: [usize; 3]) -> f64 {
    let scaled = [
        offset[0] as f64 * resolution.z,
        offset[1] as f64 * resolution.y,
        offset[2] as f64 * resolution.x,
    ];
    let mut axes = (0..3).filter(|&a| offset[a] != 0);
    match (axes.next(), axes.next()) {
        (Some(axis), None) => scaled[axis] - resolution.axis(axis) / 2.0,
        _ => scaled.iter().map(|v| v * v).sum::<f64>().sqrt(),
    }
}
