//! Fixed lookup tables for Lee '94 thinning.
//!
//! Neighborhood cells are numbered 0..27 as
//! `(dz + 1) * 9 + (dx + 1) * 3 + (dy + 1)`; the center voxel is 13.
//! The 26-cell cube used for connectivity labeling drops the center, so
//! cube cell `i` is neighborhood cell `i` for `i < 13` and `i + 1` above.

/// Neighborhood index of the center voxel
pub const CENTER: usize = 13;

/// Border directions in erosion order: (dz, dy, dx)
///
/// West, East, Down, Up, South, North.
pub const DIRECTIONS: [[isize; 3]; 6] = [
    [0, 0, -1],
    [0, 0, 1],
    [0, 1, 0],
    [0, -1, 0],
    [1, 0, 0],
    [-1, 0, 0],
];

// ============================================================================
// Euler characteristic
// ============================================================================

/// Euler characteristic change per octant configuration.
///
/// Octant bytes always have bit 0 set (the center voxel), so only odd
/// entries exist; the table is indexed by `byte >> 1`.
pub const EULER_LUT: [i8; 128] = [
    1, -1, -1, 1, -3, -1, -1, 1, -1, 1, 1, -1, 3, 1, 1, -1, //
    -3, -1, 3, 1, 1, -1, 3, 1, -1, 1, 1, -1, 3, 1, 1, -1, //
    -3, 3, -1, 1, 1, 3, -1, 1, -1, 1, 1, -1, 3, 1, 1, -1, //
    1, 3, 3, 1, 5, 3, 3, 1, -1, 1, 1, -1, 3, 1, 1, -1, //
    -7, -1, -1, 1, -3, -1, -1, 1, -1, 1, 1, -1, 3, 1, 1, -1, //
    -3, -1, 3, 1, 1, -1, 3, 1, -1, 1, 1, -1, 3, 1, 1, -1, //
    -3, 3, -1, 1, 1, 3, -1, 1, -1, 1, 1, -1, 3, 1, 1, -1, //
    1, 3, 3, 1, 5, 3, 3, 1, -1, 1, 1, -1, 3, 1, 1, -1, //
];

/// The eight 2x2x2 octants around the center, as neighborhood indices.
///
/// Entry `j` sets bit `7 - j` of the octant byte.
/// Order: SWU, SEU, NWU, NEU, SWB, SEB, NWB, NEB.
pub const EULER_OCTANTS: [[usize; 7]; 8] = [
    [24, 25, 15, 16, 21, 22, 12],
    [26, 23, 17, 14, 25, 22, 16],
    [18, 21, 9, 12, 19, 22, 10],
    [20, 23, 19, 22, 11, 14, 10],
    [6, 15, 7, 16, 3, 12, 4],
    [8, 7, 17, 16, 5, 4, 14],
    [0, 9, 3, 12, 1, 10, 4],
    [2, 1, 11, 10, 5, 4, 14],
];

// ============================================================================
// Connectivity labeling
// ============================================================================

/// Octant cells over the 26-cell cube (center removed).
pub const LABEL_OCTANTS: [[usize; 7]; 8] = [
    [0, 1, 3, 4, 9, 10, 12],
    [1, 4, 10, 2, 5, 11, 13],
    [3, 4, 12, 6, 7, 14, 15],
    [4, 5, 13, 7, 15, 8, 16],
    [9, 10, 12, 17, 18, 20, 21],
    [10, 11, 13, 18, 21, 19, 22],
    [12, 14, 15, 20, 21, 23, 24],
    [13, 15, 16, 21, 22, 24, 25],
];

/// For each cube cell, a bitmask of the octants containing it
pub const CELL_OCTANTS: [u8; 26] = build_cell_octants();

const fn build_cell_octants() -> [u8; 26] {
    let mut masks = [0u8; 26];
    let mut o = 0;
    while o < 8 {
        let mut j = 0;
        while j < 7 {
            masks[LABEL_OCTANTS[o][j]] |= 1 << o;
            j += 1;
        }
        o += 1;
    }
    masks
}

/// Neighborhood index of a cube cell
#[inline]
pub const fn cube_to_neighborhood(cell: usize) -> usize {
    if cell < CENTER { cell } else { cell + 1 }
}
