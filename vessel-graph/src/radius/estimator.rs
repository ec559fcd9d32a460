//! Local radius search around skeleton points.

use log::debug;
use rayon::prelude::*;

use crate::core::{Resolution, VoxelCoord};
use crate::volume::BinaryVolume;

use super::lut::CorrectionLut;

/// Background voxels averaged per radius
const SAMPLES: usize = 4;

/// Radii for a skeleton, one per point
#[derive(Clone, Debug, Default)]
pub struct RadiusEstimates {
    /// Radii in physical units
    pub radii: Vec<f64>,
    /// Radii in voxel units, when requested
    pub visual_radii: Option<Vec<f64>>,
}

/// Radius estimator holding the correction tables it searches with.
#[derive(Clone, Debug)]
pub struct RadiusEstimator {
    lut: CorrectionLut,
    visual_lut: Option<CorrectionLut>,
}

impl RadiusEstimator {
    /// Estimator for physical radii only
    pub fn new(resolution: Resolution, search_limit: usize) -> Self {
        Self {
            lut: CorrectionLut::build(resolution, search_limit),
            visual_lut: None,
        }
    }

    /// Also estimate unit-resolution radii for visualization
    pub fn with_visual_radii(mut self) -> Self {
        self.visual_lut = Some(CorrectionLut::build(Resolution::unit(), self.lut.size()));
        self
    }

    /// Physical correction table
    pub fn lut(&self) -> &CorrectionLut {
        &self.lut
    }

    /// Estimate radii for every point against the un-thinned volume
    pub fn estimate(&self, volume: &BinaryVolume, points: &[VoxelCoord]) -> RadiusEstimates {
        let radii = estimate_radii(volume, points, &self.lut);
        let visual_radii = self
            .visual_lut
            .as_ref()
            .map(|lut| estimate_radii(volume, points, lut));
        RadiusEstimates {
            radii,
            visual_radii,
        }
    }
}

/// Corrected radius of every point, in parallel.
///
/// For each point a cubic window grows one voxel at a time. As soon as it
/// holds at least four background voxels, their corrected distances are
/// looked up and the four smallest are averaged. If the window reaches the
/// table size (or covers the whole volume) first, the point gets
/// [`CorrectionLut::boundary_value`].
pub fn estimate_radii(
    volume: &BinaryVolume,
    points: &[VoxelCoord],
    lut: &CorrectionLut,
) -> Vec<f64> {
    let radii: Vec<f64> = points
        .par_iter()
        .map(|&p| point_radius(volume, p, lut))
        .collect();
    debug!("[Radius] estimated {} radii", radii.len());
    radii
}

/// Radius of a single point
pub fn point_radius(volume: &BinaryVolume, p: VoxelCoord, lut: &CorrectionLut) -> f64 {
    let shape = volume.shape();
    let center = [p.z, p.y, p.x];
    let mut distances: Vec<f64> = Vec::with_capacity(32);

    for i in 0..lut.size() {
        let lo = center.map(|c| c.saturating_sub(i));
        let hi = [
            (p.z + i).min(shape[0].saturating_sub(1)),
            (p.y + i).min(shape[1].saturating_sub(1)),
            (p.x + i).min(shape[2].saturating_sub(1)),
        ];

        for_each_shell_voxel(center, i, lo, hi, |c| {
            if !volume.get(c) {
                distances.push(lut.get(
                    c.z.abs_diff(p.z),
                    c.y.abs_diff(p.y),
                    c.x.abs_diff(p.x),
                ));
            }
        });

        if distances.len() >= SAMPLES {
            distances.sort_by(f64::total_cmp);
            return distances[..SAMPLES].iter().sum::<f64>() / SAMPLES as f64;
        }

        let covers_volume = lo == [0, 0, 0] && (0..3).all(|a| hi[a] + 1 >= shape[a]);
        if covers_volume {
            break;
        }
    }
    lut.boundary_value()
}

/// Visit voxels at Chebyshev distance exactly `i` from `center`, clipped
/// to the inclusive box `[lo, hi]`.
fn for_each_shell_voxel<F>(
    center: [usize; 3],
    i: usize,
    lo: [usize; 3],
    hi: [usize; 3],
    mut f: F,
) where
    F: FnMut(VoxelCoord),
{
    let on_shell = |v: usize, c: usize| v.abs_diff(c) == i;
    for z in lo[0]..=hi[0] {
        let z_face = on_shell(z, center[0]);
        for y in lo[1]..=hi[1] {
            if z_face || on_shell(y, center[1]) {
                for x in lo[2]..=hi[2] {
                    f(VoxelCoord::new(z, y, x));
                }
            } else {
                if center[2] >= i && center[2] - i >= lo[2] {
                    f(VoxelCoord::new(z, y, center[2] - i));
                }
                if i > 0 && center[2] + i <= hi[2] {
                    f(VoxelCoord::new(z, y, center[2] + i));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn solid(shape: [usize; 3]) -> BinaryVolume {
        let n = shape[0] * shape[1] * shape[2];
        BinaryVolume::from_vec(shape, vec![1; n]).unwrap()
    }

    #[test]
    fn test_shell_counts() {
        let mut count = 0;
        for_each_shell_voxel([5, 5, 5], 0, [5, 5, 5], [5, 5, 5], |_| count += 1);
        assert_eq!(count, 1);

        count = 0;
        for_each_shell_voxel([5, 5, 5], 1, [4, 4, 4], [6, 6, 6], |_| count += 1);
        assert_eq!(count, 26);

        count = 0;
        for_each_shell_voxel([5, 5, 5], 2, [3, 3, 3], [7, 7, 7], |_| count += 1);
        assert_eq!(count, 125 - 27);

        // Clipped at the low corner
        count = 0;
        for_each_shell_voxel([0, 0, 0], 1, [0, 0, 0], [1, 1, 1], |_| count += 1);
        assert_eq!(count, 7);
    }

    #[test]
    fn test_line_radius() {
        // Single voxel line: the 4 face neighbors across the line are background
        let mut v = BinaryVolume::new([3, 3, 5]);
        for x in 0..5 {
            v.set(VoxelCoord::new(1, 1, x), true);
        }
        let lut = CorrectionLut::build(Resolution::isotropic(1.0), 10);
        let r = point_radius(&v, VoxelCoord::new(1, 1, 2), &lut);
        assert_relative_eq!(r, 0.5);
    }

    #[test]
    fn test_tube_radius() {
        // 3x3 square cross-section: nearest background lies 2 voxels away on 4 faces
        let mut v = BinaryVolume::new([5, 5, 9]);
        for z in 1..4 {
            for y in 1..4 {
                for x in 0..9 {
                    v.set(VoxelCoord::new(z, y, x), true);
                }
            }
        }
        let lut = CorrectionLut::build(Resolution::isotropic(2.0), 10);
        let r = point_radius(&v, VoxelCoord::new(2, 2, 4), &lut);
        assert_relative_eq!(r, 3.0);
    }

    #[test]
    fn test_solid_volume_gets_boundary_value() {
        let v = solid([4, 4, 4]);
        let lut = CorrectionLut::build(Resolution::isotropic(1.0), 6);
        let r = point_radius(&v, VoxelCoord::new(1, 1, 1), &lut);
        assert_relative_eq!(r, lut.boundary_value());
    }

    #[test]
    fn test_estimator_visual_radii() {
        let mut v = BinaryVolume::new([3, 3, 5]);
        for x in 0..5 {
            v.set(VoxelCoord::new(1, 1, x), true);
        }
        let points = v.foreground_coords();
        let estimator = RadiusEstimator::new(Resolution::isotropic(3.0), 10).with_visual_radii();
        let est = estimator.estimate(&v, &points);
        assert_eq!(est.radii.len(), 5);
        assert_relative_eq!(est.radii[2], 1.5);
        assert_relative_eq!(est.visual_radii.unwrap()[2], 0.5);
    }
}
