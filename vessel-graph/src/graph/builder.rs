//! Skeleton-to-graph assembly by 26-connectivity.

use log::debug;
use rayon::prelude::*;

use crate::core::{Point3, VoxelCoord};
use crate::error::{Error, Result};
use crate::radius::RadiusEstimates;

use super::types::{Vertex, VesselGraph};

/// Forward half of the 26-neighborhood as (dz, dy, dx).
///
/// Every adjacent pair is seen from exactly one of its two voxels.
pub const HALF_NEIGHBORHOOD: [[isize; 3]; 13] = [
    [1, 1, -1],
    [1, 1, 0],
    [1, 1, 1],
    [0, 1, -1],
    [0, 1, 0],
    [0, 1, 1],
    [1, 0, -1],
    [1, 0, 0],
    [1, 0, 1],
    [0, 0, 1],
    [1, -1, -1],
    [1, -1, 0],
    [1, -1, 1],
];

/// Build the centerline graph of a skeleton.
///
/// One vertex per point (in input order) positioned at `point + offset`,
/// one edge per 26-adjacent pair.
///
/// # Arguments
/// * `points` - Skeleton voxels, indices into a volume of `shape`
/// * `radii` - One radius (and optional visual radius) per point
/// * `shape` - Shape of the volume the points index
/// * `offset` - Shift from volume indices to source coordinates
pub fn build_graph(
    points: &[VoxelCoord],
    radii: &RadiusEstimates,
    shape: [usize; 3],
    offset: [isize; 3],
) -> Result<VesselGraph> {
    if radii.radii.len() != points.len() {
        return Err(Error::LengthMismatch {
            points: points.len(),
            values: radii.radii.len(),
            what: "radii",
        });
    }
    if let Some(visual) = &radii.visual_radii
        && visual.len() != points.len()
    {
        return Err(Error::LengthMismatch {
            points: points.len(),
            values: visual.len(),
            what: "visual radii",
        });
    }

    let lookup = index_lookup(points, shape)?;
    let edges = discover_edges(points, &lookup, shape);

    let shift = Point3::new(offset[0] as f64, offset[1] as f64, offset[2] as f64);
    let mut graph = VesselGraph::new();
    for (i, p) in points.iter().enumerate() {
        graph.add_vertex(Vertex {
            coords: p.to_point() + shift,
            radius: radii.radii[i],
            visual_radius: radii.visual_radii.as_ref().map(|v| v[i]),
        });
    }
    for (a, b) in edges {
        graph.add_edge(a, b)?;
    }

    debug!(
        "[GraphBuilder] {} vertices, {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Dense volume of point index + 1 (0 = empty)
fn index_lookup(points: &[VoxelCoord], shape: [usize; 3]) -> Result<Vec<u32>> {
    let mut lookup = vec![0u32; shape[0] * shape[1] * shape[2]];
    for (i, p) in points.iter().enumerate() {
        if p.z >= shape[0] || p.y >= shape[1] || p.x >= shape[2] {
            return Err(Error::PointOutOfBounds {
                z: p.z,
                y: p.y,
                x: p.x,
                shape,
            });
        }
        lookup[(p.z * shape[1] + p.y) * shape[2] + p.x] = i as u32 + 1;
    }
    Ok(lookup)
}

fn discover_edges(
    points: &[VoxelCoord],
    lookup: &[u32],
    shape: [usize; 3],
) -> Vec<(usize, usize)> {
    points
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, p)| {
            HALF_NEIGHBORHOOD.iter().filter_map(move |o| {
                let q = p.offset(o[0], o[1], o[2])?;
                if q.z >= shape[0] || q.y >= shape[1] || q.x >= shape[2] {
                    return None;
                }
                match lookup[(q.z * shape[1] + q.y) * shape[2] + q.x] {
                    0 => None,
                    j => Some((i, j as usize - 1)),
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_radii(n: usize) -> RadiusEstimates {
        RadiusEstimates {
            radii: vec![1.0; n],
            visual_radii: None,
        }
    }

    #[test]
    fn test_half_neighborhood_covers_26() {
        let mut all: Vec<[isize; 3]> = HALF_NEIGHBORHOOD.to_vec();
        all.extend(HALF_NEIGHBORHOOD.iter().map(|o| [-o[0], -o[1], -o[2]]));
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 26);
        assert!(!all.contains(&[0, 0, 0]));
    }

    #[test]
    fn test_three_voxel_line() {
        let points = vec![
            VoxelCoord::new(1, 1, 1),
            VoxelCoord::new(1, 1, 2),
            VoxelCoord::new(1, 1, 3),
        ];
        let g = build_graph(&points, &unit_radii(3), [3, 3, 5], [0, 0, 0]).unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(1, 2));
        assert!(!g.has_edge(0, 2));
    }

    #[test]
    fn test_diagonal_cube_is_complete() {
        let mut points = Vec::new();
        for z in 1..3 {
            for y in 1..3 {
                for x in 1..3 {
                    points.push(VoxelCoord::new(z, y, x));
                }
            }
        }
        let g = build_graph(&points, &unit_radii(8), [4, 4, 4], [0, 0, 0]).unwrap();
        assert_eq!(g.edge_count(), 28);
        assert!(g.degrees().iter().all(|&d| d == 7));
    }

    #[test]
    fn test_offset_applied() {
        let points = vec![VoxelCoord::new(1, 1, 1)];
        let g = build_graph(&points, &unit_radii(1), [3, 3, 3], [9, -1, 4]).unwrap();
        let c = g.coords(0);
        assert_eq!((c.z, c.y, c.x), (10.0, 0.0, 5.0));
    }

    #[test]
    fn test_radius_count_mismatch() {
        let points = vec![VoxelCoord::new(1, 1, 1)];
        let err = build_graph(&points, &unit_radii(2), [3, 3, 3], [0, 0, 0]).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { .. }));
    }

    #[test]
    fn test_empty_skeleton() {
        let g = build_graph(&[], &unit_radii(0), [0, 0, 0], [0, 0, 0]).unwrap();
        assert!(g.is_empty());
    }
}
