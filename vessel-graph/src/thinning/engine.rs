//! Iterative directional thinning.

use log::{debug, trace};
use rayon::prelude::*;

use crate::core::VoxelCoord;
use crate::error::{Error, Result};
use crate::volume::BinaryVolume;

use super::neighborhood::Neighborhood;
use super::tables::DIRECTIONS;

/// Outcome of thinning a volume
#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    /// Remaining foreground voxels in row-major order
    pub points: Vec<VoxelCoord>,
    /// Full six-direction cycles run (including the final no-op cycle)
    pub cycles: usize,
    /// Voxels deleted
    pub removed: usize,
}

impl Skeleton {
    /// Number of skeleton voxels
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if nothing survived (empty input)
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Thin `volume` in place to a one-voxel-wide skeleton.
///
/// Each cycle erodes in the six axis directions. Every sub-iteration first
/// collects deletion candidates from the unchanged volume in parallel, then
/// deletes them one at a time, re-checking connectivity against the volume
/// as it stands at that moment. Cycles repeat until one deletes nothing.
///
/// The volume must have a background border (see
/// [`crate::volume::prepare_volume`]).
pub fn thin(volume: &mut BinaryVolume) -> Result<Skeleton> {
    if !volume.has_zero_border() {
        return Err(Error::MissingBorder);
    }

    let mut points = volume.foreground_coords();
    let initial = points.len();
    let mut cycles = 0;

    loop {
        let before = points.len();
        for dir in DIRECTIONS.iter() {
            let candidates = select_candidates(volume, &points, dir);
            if candidates.is_empty() {
                continue;
            }
            let deleted = apply_candidates(volume, &points, &candidates);
            trace!(
                "[Thinning] cycle {} dir {:?}: {} candidates, {} deleted",
                cycles,
                dir,
                candidates.len(),
                deleted.len()
            );
            if !deleted.is_empty() {
                let mut keep = vec![true; points.len()];
                for &i in deleted.iter() {
                    keep[i] = false;
                }
                let mut flags = keep.into_iter();
                points.retain(|_| flags.next().unwrap_or(true));
            }
        }
        cycles += 1;
        debug!(
            "[Thinning] cycle {}: {} points remaining",
            cycles,
            points.len()
        );
        if points.len() == before {
            break;
        }
    }

    Ok(Skeleton {
        removed: initial - points.len(),
        points,
        cycles,
    })
}

/// Thin a copy of `volume` and return its skeleton
pub fn skeletonize(volume: &BinaryVolume) -> Result<Skeleton> {
    let mut work = volume.clone();
    thin(&mut work)
}

/// Phase 1: indices of border points in direction `dir` that pass every
/// deletion test against the current (unmodified) volume.
fn select_candidates(
    volume: &BinaryVolume,
    points: &[VoxelCoord],
    dir: &[isize; 3],
) -> Vec<usize> {
    points
        .par_iter()
        .enumerate()
        .filter(|(_, p)| {
            let (z, y, x) = (p.z as isize, p.y as isize, p.x as isize);
            !volume.get_signed(z + dir[0], y + dir[1], x + dir[2])
        })
        .filter(|(_, p)| Neighborhood::gather(volume, **p).is_deletable())
        .map(|(i, _)| i)
        .collect()
}

/// Phase 2: delete candidates sequentially, skipping any whose neighborhood
/// stopped being simple because of an earlier deletion in this phase.
fn apply_candidates(
    volume: &mut BinaryVolume,
    points: &[VoxelCoord],
    candidates: &[usize],
) -> Vec<usize> {
    let mut deleted = Vec::with_capacity(candidates.len());
    for &i in candidates {
        let p = points[i];
        if Neighborhood::gather(volume, p).is_simple() {
            volume.set(p, false);
            deleted.push(i);
        }
    }
    deleted
}
