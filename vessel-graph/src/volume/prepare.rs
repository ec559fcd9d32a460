//! Volume preparation: binarize, crop to the foreground, pad.

use log::debug;

use crate::error::Result;

use super::BinaryVolume;

/// A cropped, zero-padded volume plus the shift back to source coordinates.
#[derive(Clone, Debug)]
pub struct PreparedVolume {
    /// Cropped volume with a one-voxel background border
    pub volume: BinaryVolume,
    /// Add to a padded index to get the source-volume coordinate
    /// (bounding-box minima minus the pad)
    pub offset: [isize; 3],
}

impl PreparedVolume {
    /// True if the source had no foreground
    pub fn is_empty(&self) -> bool {
        self.volume.len() == 0
    }
}

/// Crop `raw` to its foreground bounding box and add a one-voxel zero border.
///
/// An empty input produces an empty (zero-sized) volume rather than an error.
pub fn prepare_volume(raw: &BinaryVolume) -> Result<PreparedVolume> {
    let Some((min, max)) = raw.bounding_box() else {
        debug!("[Volume] no foreground, producing empty volume");
        return Ok(PreparedVolume {
            volume: BinaryVolume::new([0, 0, 0]),
            offset: [0, 0, 0],
        });
    };

    let cropped = raw.cropped(min, max)?;
    let volume = cropped.padded(1);
    debug!(
        "[Volume] cropped {:?} -> {:?}, padded to {:?}",
        raw.shape(),
        cropped.shape(),
        volume.shape()
    );

    Ok(PreparedVolume {
        volume,
        offset: [
            min.z as isize - 1,
            min.y as isize - 1,
            min.x as isize - 1,
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VoxelCoord;

    #[test]
    fn test_prepare_crops_and_pads() {
        let raw = BinaryVolume::from_coords(
            [10, 10, 10],
            &[VoxelCoord::new(4, 5, 6), VoxelCoord::new(4, 5, 7)],
        )
        .unwrap();
        let prepared = prepare_volume(&raw).unwrap();
        assert_eq!(prepared.volume.shape(), [3, 3, 4]);
        assert_eq!(prepared.offset, [3, 4, 5]);
        assert!(prepared.volume.get(VoxelCoord::new(1, 1, 1)));
        assert!(prepared.volume.has_zero_border());
    }

    #[test]
    fn test_prepare_touching_origin() {
        let raw = BinaryVolume::from_coords([2, 2, 2], &[VoxelCoord::new(0, 0, 0)]).unwrap();
        let prepared = prepare_volume(&raw).unwrap();
        assert_eq!(prepared.offset, [-1, -1, -1]);
    }

    #[test]
    fn test_prepare_empty() {
        let prepared = prepare_volume(&BinaryVolume::new([4, 4, 4])).unwrap();
        assert!(prepared.is_empty());
        assert!(prepared.volume.foreground_coords().is_empty());
    }
}
