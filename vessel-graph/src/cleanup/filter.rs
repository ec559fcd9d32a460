//! Removal of isolated short segments.

use log::info;
use rayon::prelude::*;

use crate::core::Resolution;
use crate::error::Result;
use crate::graph::{GraphEdits, GraphType, VesselGraph};

use super::chunk_size;
use super::length::segment_length;
use super::segments::isolated_path;

/// What the filter removed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Degree-0 vertices removed
    pub isolated_vertices: usize,
    /// Isolated segments removed
    pub segments: usize,
}

/// Remove degree-0 vertices, then isolated segments shorter than
/// `filter_length`.
///
/// Isolated vertices are always removed. Segment filtering is skipped when
/// `filter_length` is not positive.
///
/// * Centerlines: a candidate component is a simple chain (two degree-1
///   ends, all other members degree 2), measured end to end.
/// * Branches: a candidate component is a single edge between two
///   vertices, measured by its length attribute.
pub fn filter(
    graph: &mut VesselGraph,
    graph_type: GraphType,
    filter_length: f64,
    resolution: &Resolution,
    smoothing: bool,
) -> Result<FilterReport> {
    let mut report = FilterReport {
        isolated_vertices: graph.delete_isolated(),
        segments: 0,
    };
    if filter_length <= 0.0 || graph.is_empty() {
        return Ok(report);
    }

    let components = graph.connected_components();
    let snapshot: &VesselGraph = graph;
    let parts: Vec<Result<(GraphEdits, usize)>> = components
        .par_chunks(chunk_size(components.len()))
        .map(|part| {
            let mut edits = GraphEdits::new();
            let mut removed = 0;
            for component in part {
                let short = match graph_type {
                    GraphType::Centerlines => match isolated_path(snapshot, component)? {
                        Some(path) => {
                            segment_length(snapshot, &path, resolution, smoothing) < filter_length
                        }
                        None => false,
                    },
                    GraphType::Branches => {
                        component.len() == 2
                            && snapshot
                                .edge_length(component[0], component[1], resolution)
                                .is_some_and(|length| length < filter_length)
                    }
                };
                if short {
                    edits.removed_vertices.extend_from_slice(component);
                    removed += 1;
                }
            }
            Ok((edits, removed))
        })
        .collect();

    let mut edits = GraphEdits::new();
    for part in parts {
        let (part_edits, removed) = part?;
        edits.merge(part_edits);
        report.segments += removed;
    }
    graph.apply(edits)?;

    info!(
        "[Filter] removed {} isolated vertices and {} segments",
        report.isolated_vertices, report.segments
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point3;
    use crate::graph::{Edge, Vertex};

    fn add_line(g: &mut VesselGraph, y: f64, len: usize) {
        let first = g.vertex_count();
        for x in 0..len {
            g.add_vertex(Vertex::new(Point3::new(0.0, y, x as f64), 1.0));
        }
        for v in (first + 1)..(first + len) {
            g.add_edge(v - 1, v).unwrap();
        }
    }

    #[test]
    fn test_isolated_vertices_always_removed() {
        let mut g = VesselGraph::new();
        add_line(&mut g, 0.0, 5);
        g.add_vertex(Vertex::new(Point3::new(9.0, 9.0, 9.0), 1.0));
        let report = filter(&mut g, GraphType::Centerlines, 0.0, &Resolution::unit(), true).unwrap();
        assert_eq!(report.isolated_vertices, 1);
        assert_eq!(report.segments, 0);
        assert_eq!(g.vertex_count(), 5);
    }

    #[test]
    fn test_short_chain_removed_long_kept() {
        let mut g = VesselGraph::new();
        add_line(&mut g, 0.0, 4); // length 3
        add_line(&mut g, 10.0, 21); // length 20
        let report = filter(&mut g, GraphType::Centerlines, 10.0, &Resolution::unit(), true).unwrap();
        assert_eq!(report.segments, 1);
        assert_eq!(g.vertex_count(), 21);
        assert_eq!(g.edge_count(), 20);
    }

    #[test]
    fn test_branched_component_kept() {
        // A short Y-shaped component is not a simple chain
        let mut g = VesselGraph::new();
        for i in 0..4 {
            g.add_vertex(Vertex::new(Point3::new(0.0, i as f64, 0.0), 1.0));
        }
        for (a, b) in [(0, 1), (0, 2), (0, 3)] {
            g.add_edge(a, b).unwrap();
        }
        let report = filter(&mut g, GraphType::Centerlines, 100.0, &Resolution::unit(), true).unwrap();
        assert_eq!(report.segments, 0);
        assert_eq!(g.vertex_count(), 4);
    }

    #[test]
    fn test_branch_graph_pairs() {
        let mut g = VesselGraph::new();
        for i in 0..4 {
            g.add_vertex(Vertex::new(Point3::new(0.0, 0.0, i as f64), 1.0));
        }
        g.insert_edge(0, 1, Edge::with_length(4.0)).unwrap();
        g.insert_edge(2, 3, Edge::with_length(40.0)).unwrap();
        let report = filter(&mut g, GraphType::Branches, 10.0, &Resolution::unit(), true).unwrap();
        assert_eq!(report.segments, 1);
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }
}
