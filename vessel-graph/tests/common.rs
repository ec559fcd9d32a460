//! Test utilities for vessel-graph.
//!
//! This module provides synthetic vessel volumes and skeletons.

#![allow(dead_code)]

use std::collections::BTreeSet;

use vessel_graph::radius::RadiusEstimates;
use vessel_graph::{BinaryVolume, VoxelCoord};

/// Volume just large enough to hold `points` plus a one-voxel margin.
pub fn volume_of(points: &[VoxelCoord]) -> BinaryVolume {
    let mut shape = [1usize; 3];
    for p in points {
        shape[0] = shape[0].max(p.z + 2);
        shape[1] = shape[1].max(p.y + 2);
        shape[2] = shape[2].max(p.x + 2);
    }
    BinaryVolume::from_coords(shape, points).unwrap()
}

/// Cylinder along x with a disk cross-section of `radius`, x in `1..=length`.
///
/// The axis runs through z = y = radius + 1.
pub fn tube_points(length: usize, radius: usize) -> Vec<VoxelCoord> {
    let c = radius as isize + 1;
    let r2 = (radius * radius) as isize;
    let mut points = Vec::new();
    for z in 0..(2 * radius + 3) {
        for y in 0..(2 * radius + 3) {
            let (dz, dy) = (z as isize - c, y as isize - c);
            if dz * dz + dy * dy <= r2 {
                for x in 1..=length {
                    points.push(VoxelCoord::new(z, y, x));
                }
            }
        }
    }
    points
}

/// Tube of `length` along x with a side branch of the same radius leaving
/// its middle along +y for `length / 2` voxels.
pub fn tee_points(length: usize, radius: usize) -> Vec<VoxelCoord> {
    let c = radius as isize + 1;
    let r2 = (radius * radius) as isize;
    let mid = (length / 2 + 1) as isize;
    let mut points: BTreeSet<VoxelCoord> = tube_points(length, radius).into_iter().collect();
    for z in 0..(2 * radius + 3) as isize {
        for x in (mid - radius as isize)..=(mid + radius as isize) {
            let (dz, dx) = (z - c, x - mid);
            if dz * dz + dx * dx <= r2 {
                for y in c..=(c + (length / 2) as isize) {
                    points.insert(VoxelCoord::new(z as usize, y as usize, x as usize));
                }
            }
        }
    }
    points.into_iter().collect()
}

/// Square annulus `thick` voxels deep: an `outer` square with a centered
/// `inner` square hole, starting at (1, 1, 1).
pub fn ring_points(outer: usize, inner: usize, thick: usize) -> Vec<VoxelCoord> {
    let m = (outer - inner) / 2;
    let mut points = Vec::new();
    for z in 1..=thick {
        for y in 0..outer {
            for x in 0..outer {
                let hole = (m..outer - m).contains(&y) && (m..outer - m).contains(&x);
                if !hole {
                    points.push(VoxelCoord::new(z, y + 1, x + 1));
                }
            }
        }
    }
    points
}

/// Solid `n`^3 block starting at (1, 1, 1).
pub fn cube_points(n: usize) -> Vec<VoxelCoord> {
    let mut points = Vec::new();
    for z in 1..=n {
        for y in 1..=n {
            for x in 1..=n {
                points.push(VoxelCoord::new(z, y, x));
            }
        }
    }
    points
}

/// One-voxel-wide line of `n` voxels along x at z = y = 2.
pub fn line_points(n: usize) -> Vec<VoxelCoord> {
    (0..n).map(|x| VoxelCoord::new(2, 2, x + 2)).collect()
}

/// Skeleton of a four-way crossing whose center thinned into a 2x2x2 block.
///
/// Four 20-voxel arms leave the block in the z = 10 plane, each from a
/// different block voxel.
pub fn x_shape_points() -> Vec<VoxelCoord> {
    const S: isize = 12;
    let mut points = BTreeSet::new();
    let mut add = |z: isize, y: isize, x: isize| {
        points.insert(VoxelCoord::new(z as usize, (y + S) as usize, (x + S) as usize));
    };
    for z in 10..12 {
        for y in 10..12 {
            for x in 10..12 {
                add(z, y, x);
            }
        }
    }
    for i in 0..20 {
        add(10, 10, 12 + i);
        add(10, 11, 9 - i);
        add(10, 12 + i, 11);
        add(10, 9 - i, 10);
    }
    points.into_iter().collect()
}

/// Shape of a volume that holds `points` with a one-voxel margin.
pub fn shape_of(points: &[VoxelCoord]) -> [usize; 3] {
    volume_of(points).shape()
}

/// Same radius for every point.
pub fn uniform_radii(n: usize, radius: f64) -> RadiusEstimates {
    RadiusEstimates {
        radii: vec![radius; n],
        visual_radii: None,
    }
}
