//! 3x3x3 neighborhood tests: endpoint, Euler invariance, simple point.

use crate::core::VoxelCoord;
use crate::volume::BinaryVolume;

use super::tables::{
    CELL_OCTANTS, CENTER, EULER_LUT, EULER_OCTANTS, LABEL_OCTANTS, cube_to_neighborhood,
};

/// Occupancy of a 3x3x3 neighborhood packed into the low 27 bits.
///
/// Bit `i` is neighborhood cell `i` (see [`super::tables`] for the numbering).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighborhood(u32);

impl Neighborhood {
    /// Wrap a raw bitmask
    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        Self(bits & ((1 << 27) - 1))
    }

    /// Read the neighborhood of `c`. Cells outside the volume are background.
    pub fn gather(volume: &BinaryVolume, c: VoxelCoord) -> Self {
        let (z, y, x) = (c.z as isize, c.y as isize, c.x as isize);
        let mut bits = 0u32;
        for dz in -1..=1isize {
            for dx in -1..=1isize {
                for dy in -1..=1isize {
                    if volume.get_signed(z + dz, y + dy, x + dx) {
                        bits |= 1 << Self::cell_index(dz, dy, dx);
                    }
                }
            }
        }
        Self(bits)
    }

    /// Neighborhood index of a (dz, dy, dx) step
    #[inline]
    pub const fn cell_index(dz: isize, dy: isize, dx: isize) -> usize {
        ((dz + 1) * 9 + (dx + 1) * 3 + (dy + 1)) as usize
    }

    /// Raw bits
    #[inline]
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Occupancy of one cell
    #[inline]
    pub fn is_set(&self, cell: usize) -> bool {
        self.0 & (1 << cell) != 0
    }

    /// Number of foreground voxels among the 26 neighbors
    #[inline]
    pub fn neighbor_count(&self) -> u32 {
        (self.0 & !(1 << CENTER)).count_ones()
    }

    /// At most one foreground neighbor. Endpoints are never deleted.
    #[inline]
    pub fn is_endpoint(&self) -> bool {
        self.neighbor_count() <= 1
    }

    /// Deleting the center leaves the Euler characteristic unchanged
    pub fn is_euler_invariant(&self) -> bool {
        let mut euler = 0i32;
        for octant in EULER_OCTANTS.iter() {
            let mut n = 1usize;
            for (j, &cell) in octant.iter().enumerate() {
                if self.is_set(cell) {
                    n |= 1 << (7 - j);
                }
            }
            euler += EULER_LUT[n >> 1] as i32;
        }
        euler == 0
    }

    /// Deleting the center keeps the foreground neighbors in one
    /// 26-connected component.
    ///
    /// Components are labeled by an explicit octant worklist: visiting an
    /// octant claims its unvisited foreground cells, and each claimed cell
    /// queues every octant that contains it.
    pub fn is_simple(&self) -> bool {
        let mut cube = 0u32;
        for cell in 0..26 {
            if self.is_set(cube_to_neighborhood(cell)) {
                cube |= 1 << cell;
            }
        }

        let mut components = 0;
        let mut stack: Vec<usize> = Vec::with_capacity(8);
        while cube != 0 {
            if components == 1 {
                return false;
            }
            components += 1;

            let seed = cube.trailing_zeros() as usize;
            cube &= !(1 << seed);
            let mut queued = CELL_OCTANTS[seed];
            stack.extend((0..8).filter(|o| queued & (1 << o) != 0));

            while let Some(octant) = stack.pop() {
                for &cell in LABEL_OCTANTS[octant].iter() {
                    if cube & (1 << cell) == 0 {
                        continue;
                    }
                    cube &= !(1 << cell);
                    let fresh = CELL_OCTANTS[cell] & !queued;
                    queued |= fresh;
                    stack.extend((0..8).filter(|o| fresh & (1 << o) != 0));
                }
            }
        }
        true
    }

    /// Candidate test for deletion (border condition checked by the caller)
    #[inline]
    pub fn is_deletable(&self) -> bool {
        !self.is_endpoint() && self.is_euler_invariant() && self.is_simple()
    }
}
