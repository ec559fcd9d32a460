//! Dangling segment pruning.

use log::{debug, info};
use rayon::prelude::*;

use crate::core::Resolution;
use crate::error::Result;
use crate::graph::{GraphEdits, GraphType, VesselGraph};

use super::chunk_size;
use super::length::segment_length;
use super::segments::{dangling_path, isolate_segments};

/// Threshold of the second centerline pass, which only removes
/// single-vertex spurs left behind by the first
pub const SPUR_LENGTH: f64 = 1.01;

/// Segments removed per pass
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Dangling segments removed by the main pass
    pub segments: usize,
    /// Single-vertex spurs removed by the second pass
    pub spurs: usize,
}

/// Remove dangling end segments shorter than `prune_length`.
///
/// Does nothing when `prune_length` is not positive.
///
/// * Centerlines: segments are chains of degree < 3 vertices with one
///   degree-1 end, measured from the end to the attaching vertex. A second
///   pass removes single-vertex spurs shorter than [`SPUR_LENGTH`].
/// * Branches: degree-1 vertices attached to a vertex of degree >= 2 whose
///   edge length attribute is below the threshold are removed. Isolated
///   pairs are left to [`super::filter`].
pub fn prune(
    graph: &mut VesselGraph,
    graph_type: GraphType,
    prune_length: f64,
    resolution: &Resolution,
    smoothing: bool,
) -> Result<PruneReport> {
    let mut report = PruneReport::default();
    if prune_length <= 0.0 || graph.is_empty() {
        return Ok(report);
    }

    match graph_type {
        GraphType::Centerlines => {
            report.segments =
                prune_centerline_pass(graph, prune_length, resolution, smoothing, false)?;
            report.spurs = prune_centerline_pass(graph, SPUR_LENGTH, resolution, smoothing, true)?;
        }
        GraphType::Branches => {
            report.segments = prune_branch_endpoints(graph, prune_length, resolution)?;
        }
    }

    info!(
        "[Prune] removed {} segments and {} spurs",
        report.segments, report.spurs
    );
    Ok(report)
}

fn prune_centerline_pass(
    graph: &mut VesselGraph,
    threshold: f64,
    resolution: &Resolution,
    smoothing: bool,
    single_vertex_only: bool,
) -> Result<usize> {
    let segments: Vec<Vec<usize>> = isolate_segments(graph, 3)
        .into_iter()
        .filter(|s| !single_vertex_only || s.len() == 1)
        .collect();
    debug!(
        "[Prune] {} candidate segments below {:.3}",
        segments.len(),
        threshold
    );

    let snapshot: &VesselGraph = graph;
    let parts: Vec<Result<(GraphEdits, usize)>> = segments
        .par_chunks(chunk_size(segments.len()))
        .map(|part| {
            let mut edits = GraphEdits::new();
            let mut pruned = 0;
            for segment in part {
                let Some(path) = dangling_path(snapshot, segment)? else {
                    continue;
                };
                if segment_length(snapshot, &path, resolution, smoothing) < threshold {
                    edits.removed_vertices.extend_from_slice(segment);
                    pruned += 1;
                }
            }
            Ok((edits, pruned))
        })
        .collect();

    let mut edits = GraphEdits::new();
    let mut pruned = 0;
    for part in parts {
        let (part_edits, part_pruned) = part?;
        edits.merge(part_edits);
        pruned += part_pruned;
    }
    graph.apply(edits)?;
    Ok(pruned)
}

fn prune_branch_endpoints(
    graph: &mut VesselGraph,
    threshold: f64,
    resolution: &Resolution,
) -> Result<usize> {
    let mut edits = GraphEdits::new();
    for v in 0..graph.vertex_count() {
        if graph.degree(v) != 1 {
            continue;
        }
        let Some(neighbor) = graph.neighbors(v).next() else {
            continue;
        };
        if graph.degree(neighbor) < 2 {
            continue;
        }
        if let Some(length) = graph.edge_length(v, neighbor, resolution)
            && length < threshold
        {
            edits.removed_vertices.push(v);
        }
    }
    let pruned = edits.removed_vertices.len();
    graph.apply(edits)?;
    Ok(pruned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point3;
    use crate::graph::{Edge, Vertex};

    /// Straight trunk of `2 * trunk + 1` vertices along x with a branch of
    /// `arm` vertices leaving the middle vertex along y.
    fn tee(trunk: usize, arm: usize) -> (VesselGraph, usize) {
        let mut g = VesselGraph::new();
        for x in 0..(2 * trunk + 1) {
            g.add_vertex(Vertex::new(Point3::new(0.0, 0.0, x as f64), 1.0));
        }
        for x in 1..(2 * trunk + 1) {
            g.add_edge(x - 1, x).unwrap();
        }
        let junction = trunk;
        let mut prev = junction;
        for y in 1..=arm {
            let v = g.add_vertex(Vertex::new(Point3::new(0.0, y as f64, trunk as f64), 1.0));
            g.add_edge(prev, v).unwrap();
            prev = v;
        }
        (g, junction)
    }

    #[test]
    fn test_zero_length_disables() {
        let (mut g, _) = tee(10, 3);
        let report = prune(&mut g, GraphType::Centerlines, 0.0, &Resolution::unit(), true).unwrap();
        assert_eq!(report, PruneReport::default());
        assert_eq!(g.vertex_count(), 24);
    }

    #[test]
    fn test_short_arm_pruned_to_branch_point() {
        // Arm of 4 vertices: 4 steps from its tip to the junction
        let (mut g, junction) = tee(20, 4);
        let report = prune(&mut g, GraphType::Centerlines, 4.5, &Resolution::unit(), true).unwrap();
        assert_eq!(report.segments, 1);
        assert_eq!(g.vertex_count(), 41);
        assert_eq!(g.degree(junction), 2);
    }

    #[test]
    fn test_long_arm_kept() {
        let (mut g, _) = tee(20, 4);
        let report = prune(&mut g, GraphType::Centerlines, 3.5, &Resolution::unit(), true).unwrap();
        assert_eq!(report.segments, 0);
        assert_eq!(g.vertex_count(), 45);
    }

    #[test]
    fn test_resolution_scales_length() {
        let (mut g, _) = tee(20, 4);
        // 4 voxel steps at 2 units each = 8
        let res = Resolution::isotropic(2.0);
        prune(&mut g, GraphType::Centerlines, 7.5, &res, false).unwrap();
        assert_eq!(g.vertex_count(), 45);
        prune(&mut g, GraphType::Centerlines, 8.5, &res, false).unwrap();
        assert_eq!(g.vertex_count(), 41);
    }

    #[test]
    fn test_isolated_segment_not_pruned() {
        let mut g = VesselGraph::new();
        for x in 0..3 {
            g.add_vertex(Vertex::new(Point3::new(0.0, 0.0, x as f64), 1.0));
        }
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        prune(&mut g, GraphType::Centerlines, 50.0, &Resolution::unit(), true).unwrap();
        assert_eq!(g.vertex_count(), 3);
    }

    #[test]
    fn test_spur_pass() {
        // A one-voxel spur on a long trunk is removed by the second pass even
        // when the first threshold is tiny
        let (mut g, junction) = tee(20, 1);
        let report = prune(&mut g, GraphType::Centerlines, 0.5, &Resolution::unit(), true).unwrap();
        assert_eq!(report.segments, 0);
        assert_eq!(report.spurs, 1);
        assert_eq!(g.degree(junction), 2);
    }

    #[test]
    fn test_branch_graph_uses_length_attribute() {
        let mut g = VesselGraph::new();
        for i in 0..4 {
            g.add_vertex(Vertex::new(Point3::new(0.0, 0.0, i as f64), 1.0));
        }
        g.insert_edge(0, 1, Edge::with_length(2.0)).unwrap();
        g.insert_edge(0, 2, Edge::with_length(20.0)).unwrap();
        g.insert_edge(0, 3, Edge::with_length(30.0)).unwrap();
        let report = prune(&mut g, GraphType::Branches, 5.0, &Resolution::unit(), true).unwrap();
        assert_eq!(report.segments, 1);
        assert_eq!(report.spurs, 0);
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_branch_isolated_pair_not_pruned() {
        let mut g = VesselGraph::new();
        for i in 0..2 {
            g.add_vertex(Vertex::new(Point3::new(0.0, 0.0, i as f64), 1.0));
        }
        g.insert_edge(0, 1, Edge::with_length(3.0)).unwrap();
        let report = prune(&mut g, GraphType::Branches, 5.0, &Resolution::unit(), true).unwrap();
        assert_eq!(report.segments, 0);
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }
}
