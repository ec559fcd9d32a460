//! Segment reduction and per-segment measurements.
//!
//! A centerline graph has one vertex per skeleton voxel. [`reduce_graph`]
//! collapses every run of degree-2 vertices into a single edge between
//! structural vertices (endpoints and branch points) and measures it:
//!
//! ```text
//!   o-o-o-o-O-o-o-o      O---------O
//!           |       =>   |
//!           o            O
//! ```
//!
//! | Feature | Definition |
//! |---------|------------|
//! | length | Resolution-scaled centerline length, optionally smoothed |
//! | volume | π r̄² L |
//! | surface_area | 2π r̄ L (lateral surface, no caps) |
//! | tortuosity | L / chord, 0 when the chord is below the finest resolution |
//! | radius_* | Mean, max, min and population SD of the path radii |

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cleanup::{path_length, smooth_path};
use crate::core::{Point3, Resolution};
use crate::error::{Error, Result};
use crate::graph::{Edge, VesselGraph, edge_key};

/// Measurements of one vessel segment
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentFeatures {
    /// Centerline length in physical units
    pub length: f64,
    /// Cylinder volume from the mean radius
    pub volume: f64,
    /// Lateral cylinder surface from the mean radius
    pub surface_area: f64,
    /// Length over endpoint distance; 0 for loops
    pub tortuosity: f64,
    /// Mean radius
    pub radius_avg: f64,
    /// Largest radius
    pub radius_max: f64,
    /// Smallest radius
    pub radius_min: f64,
    /// Population standard deviation of the radii
    pub radius_sd: f64,
}

impl SegmentFeatures {
    /// Measure a centerline given its points and the radius at each point.
    ///
    /// With `smoothing`, the length and chord are taken on the B-spline
    /// resampled path.
    pub fn measure(
        points: &[Point3],
        radii: &[f64],
        resolution: &Resolution,
        smoothing: bool,
    ) -> Result<Self> {
        if points.len() != radii.len() {
            return Err(Error::LengthMismatch {
                points: points.len(),
                values: radii.len(),
                what: "segment radii",
            });
        }
        if radii.is_empty() {
            return Ok(Self::default());
        }

        let n = radii.len() as f64;
        let radius_avg = radii.iter().sum::<f64>() / n;
        let radius_max = radii.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let radius_min = radii.iter().copied().fold(f64::INFINITY, f64::min);
        let radius_sd =
            (radii.iter().map(|r| (r - radius_avg).powi(2)).sum::<f64>() / n).sqrt();

        let smoothed;
        let centerline = if smoothing && points.len() > 1 {
            smoothed = smooth_path(points, radius_avg / resolution.min());
            &smoothed[..]
        } else {
            points
        };
        let length = path_length(centerline, resolution);

        let chord = match (centerline.first(), centerline.last()) {
            (Some(a), Some(b)) => a.physical_distance(b, resolution),
            _ => 0.0,
        };
        let tortuosity = if chord >= resolution.min() {
            length / chord
        } else {
            0.0
        };

        Ok(Self {
            length,
            volume: PI * radius_avg * radius_avg * length,
            surface_area: 2.0 * PI * radius_avg * length,
            tortuosity,
            radius_avg,
            radius_max,
            radius_min,
            radius_sd,
        })
    }
}

/// A traced run of vertices between two structural vertices (or around a
/// cycle), in source-graph ids
struct Segment {
    path: Vec<usize>,
    key: (usize, usize),
}

impl Segment {
    /// Paths need both endpoints
    fn new(path: Vec<usize>) -> Result<Self> {
        let key = match (path.first(), path.last()) {
            (Some(&a), Some(&b)) if path.len() >= 2 => edge_key(a, b),
            _ => {
                return Err(Error::Partition {
                    stage: "reduce",
                    reason: format!("segment of {} vertices", path.len()),
                });
            }
        };
        Ok(Self { path, key })
    }

    fn key(&self) -> (usize, usize) {
        self.key
    }

    fn has_interior(&self) -> bool {
        self.path.len() > 2
    }
}

/// Collapse chains of degree-2 vertices into measured branch edges.
///
/// Structural vertices (degree other than 2, or carrying a self-loop) are
/// kept in id order. Pure cycles are anchored at their lowest id as a
/// self-loop. When two segments join the same pair of vertices, the later
/// ones are split at their middle vertex so that no parallel edges arise.
pub fn reduce_graph(
    graph: &VesselGraph,
    resolution: &Resolution,
    smoothing: bool,
) -> Result<VesselGraph> {
    let n = graph.vertex_count();
    let structural: Vec<bool> = (0..n)
        .map(|v| graph.degree(v) != 2 || graph.has_edge(v, v))
        .collect();

    let mut visited_edges = BTreeSet::new();
    let mut visited_vertices = vec![false; n];
    let mut segments = Vec::new();

    for s in (0..n).filter(|&v| structural[v]) {
        visited_vertices[s] = true;
        for first in graph.neighbors(s).collect::<Vec<_>>() {
            if visited_edges.contains(&edge_key(s, first)) {
                continue;
            }
            let path = trace(graph, &structural, &mut visited_edges, s, first)?;
            for &v in &path {
                visited_vertices[v] = true;
            }
            segments.push(Segment::new(path)?);
        }
    }

    // Whatever is left is made of closed degree-2 rings
    for start in 0..n {
        if visited_vertices[start] {
            continue;
        }
        let Some(first) = graph.neighbors(start).next() else {
            continue;
        };
        let mut path = trace(graph, &structural, &mut visited_edges, start, first)?;
        if path.last() != Some(&start) {
            // Closing edge back to the anchor
            visited_edges.insert(edge_key(start, path[path.len() - 1]));
            path.push(start);
        }
        for &v in &path {
            visited_vertices[v] = true;
        }
        segments.push(Segment::new(path)?);
    }

    let segments = split_parallel(segments)?;
    debug!("[Reduce] traced {} segments", segments.len());

    // Vertices of the reduced graph: every segment endpoint, in id order
    let mut kept = BTreeSet::new();
    for v in (0..n).filter(|&v| structural[v]) {
        kept.insert(v);
    }
    for segment in &segments {
        kept.extend([segment.path[0], segment.path[segment.path.len() - 1]]);
    }

    let mut reduced = VesselGraph::new();
    let mut remap = BTreeMap::new();
    for &v in &kept {
        let id = reduced.add_vertex(graph.vertices()[v].clone());
        remap.insert(v, id);
    }

    let measured: Vec<Result<SegmentFeatures>> = segments
        .par_iter()
        .map(|segment| {
            let points: Vec<Point3> = segment.path.iter().map(|&v| graph.coords(v)).collect();
            let radii: Vec<f64> = segment
                .path
                .iter()
                .map(|&v| graph.vertices()[v].radius)
                .collect();
            SegmentFeatures::measure(&points, &radii, resolution, smoothing)
        })
        .collect();

    for (segment, features) in segments.iter().zip(measured) {
        let features = features?;
        let (a, b) = segment.key();
        let (Some(&ra), Some(&rb)) = (remap.get(&a), remap.get(&b)) else {
            return Err(Error::UnknownVertex(a.max(b)));
        };
        let mut path: Vec<Point3> = segment.path.iter().map(|&v| graph.coords(v)).collect();
        if remap.get(&segment.path[0]) != Some(&ra) {
            path.reverse();
        }
        reduced.insert_edge(
            ra,
            rb,
            Edge {
                path,
                features: Some(features),
            },
        )?;
    }

    info!(
        "[Reduce] {} vertices / {} edges -> {} vertices / {} edges",
        n,
        graph.edge_count(),
        reduced.vertex_count(),
        reduced.edge_count()
    );
    Ok(reduced)
}

/// Walk from `start` through `first` until a structural vertex is reached
/// or the walk closes on itself. Marks every traversed edge.
fn trace(
    graph: &VesselGraph,
    structural: &[bool],
    visited_edges: &mut BTreeSet<(usize, usize)>,
    start: usize,
    first: usize,
) -> Result<Vec<usize>> {
    let mut path = vec![start];
    visited_edges.insert(edge_key(start, first));
    let mut current = first;
    while !structural[current] && current != start {
        path.push(current);
        let Some(next) = graph
            .neighbors(current)
            .find(|&u| !visited_edges.contains(&edge_key(current, u)))
        else {
            // Ring closed on an already traversed edge
            return Ok(path);
        };
        visited_edges.insert(edge_key(current, next));
        current = next;
    }
    path.push(current);
    Ok(path)
}

/// Keep one segment per vertex pair, preferring a direct edge, and split
/// the others at interior vertices so that no parallel edges arise
fn split_parallel(segments: Vec<Segment>) -> Result<Vec<Segment>> {
    let mut by_key: BTreeMap<(usize, usize), Vec<Segment>> = BTreeMap::new();
    for segment in segments {
        by_key.entry(segment.key()).or_default().push(segment);
    }

    let mut out = Vec::new();
    for (_, mut group) in by_key {
        let keep = group.iter().position(|s| !s.has_interior()).unwrap_or(0);
        out.push(group.remove(keep));
        for segment in group {
            out.extend(split_segment(segment)?);
        }
    }
    Ok(out)
}

/// Cut an open segment at its middle vertex, a loop at its thirds
fn split_segment(segment: Segment) -> Result<Vec<Segment>> {
    let path = segment.path;
    let last = path.len() - 1;
    let cuts = if path[0] == path[last] {
        vec![last / 3, 2 * last / 3]
    } else {
        vec![last / 2]
    };
    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut from = 0;
    for cut in cuts.into_iter().chain([last]) {
        if cut > from {
            pieces.push(Segment::new(path[from..=cut].to_vec())?);
            from = cut;
        }
    }
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Vertex;
    use approx::assert_relative_eq;

    fn chain(g: &mut VesselGraph, points: &[(f64, f64, f64)]) -> Vec<usize> {
        let ids: Vec<usize> = points
            .iter()
            .map(|&(z, y, x)| g.add_vertex(Vertex::new(Point3::new(z, y, x), 1.0)))
            .collect();
        for w in ids.windows(2) {
            g.add_edge(w[0], w[1]).unwrap();
        }
        ids
    }

    #[test]
    fn test_measure_straight_segment() {
        let points: Vec<Point3> = (0..11).map(|x| Point3::new(0.0, 0.0, x as f64)).collect();
        let radii = vec![2.0; 11];
        let f = SegmentFeatures::measure(&points, &radii, &Resolution::unit(), false).unwrap();
        assert_relative_eq!(f.length, 10.0);
        assert_relative_eq!(f.volume, PI * 4.0 * 10.0);
        assert_relative_eq!(f.surface_area, 2.0 * PI * 2.0 * 10.0);
        assert_relative_eq!(f.tortuosity, 1.0);
        assert_relative_eq!(f.radius_sd, 0.0);
    }

    #[test]
    fn test_measure_radius_statistics() {
        let points: Vec<Point3> = (0..4).map(|x| Point3::new(0.0, 0.0, x as f64)).collect();
        let f =
            SegmentFeatures::measure(&points, &[1.0, 2.0, 3.0, 2.0], &Resolution::unit(), false)
                .unwrap();
        assert_relative_eq!(f.radius_avg, 2.0);
        assert_relative_eq!(f.radius_max, 3.0);
        assert_relative_eq!(f.radius_min, 1.0);
        assert_relative_eq!(f.radius_sd, 0.5_f64.sqrt());
    }

    #[test]
    fn test_measure_rejects_mismatch() {
        let points = vec![Point3::default(); 3];
        let result = SegmentFeatures::measure(&points, &[1.0], &Resolution::unit(), false);
        assert!(matches!(result, Err(Error::LengthMismatch { .. })));
    }

    #[test]
    fn test_reduce_line() {
        let mut g = VesselGraph::new();
        chain(&mut g, &[(0.0, 0.0, 0.0), (0.0, 0.0, 1.0), (0.0, 0.0, 2.0)]);
        let r = reduce_graph(&g, &Resolution::unit(), false).unwrap();
        assert_eq!(r.vertex_count(), 2);
        assert_eq!(r.edge_count(), 1);
        let edge = r.edge(0, 1).unwrap();
        assert_eq!(edge.path.len(), 3);
        assert_relative_eq!(edge.length().unwrap(), 2.0);
    }

    #[test]
    fn test_reduce_branch_point() {
        let mut g = VesselGraph::new();
        let trunk = chain(&mut g, &[(0.0, 0.0, 0.0), (0.0, 0.0, 1.0), (0.0, 0.0, 2.0)]);
        let arm = chain(&mut g, &[(0.0, 1.0, 1.0), (0.0, 2.0, 1.0)]);
        g.add_edge(trunk[1], arm[0]).unwrap();
        let r = reduce_graph(&g, &Resolution::unit(), false).unwrap();
        assert_eq!(r.vertex_count(), 4);
        assert_eq!(r.edge_count(), 3);
        assert_eq!(r.degree(1), 3);
    }

    #[test]
    fn test_reduce_ring_to_self_loop() {
        let mut g = VesselGraph::new();
        let ids = chain(
            &mut g,
            &[(0.0, 0.0, 0.0), (0.0, 0.0, 1.0), (0.0, 1.0, 1.0), (0.0, 1.0, 0.0)],
        );
        g.add_edge(ids[3], ids[0]).unwrap();
        let r = reduce_graph(&g, &Resolution::unit(), false).unwrap();
        assert_eq!(r.vertex_count(), 1);
        assert_eq!(r.edge_count(), 1);
        assert_eq!(r.degree(0), 2);
        let f = r.edge(0, 0).unwrap().features.clone().unwrap();
        assert_relative_eq!(f.length, 4.0);
        assert_relative_eq!(f.tortuosity, 0.0);
    }

    #[test]
    fn test_reduce_splits_parallel_segments() {
        // Square 0-1-2-3 with tails on 0 and 2: two segments join 0 and 2
        let mut g = VesselGraph::new();
        let ids = chain(
            &mut g,
            &[(0.0, 0.0, 0.0), (0.0, 0.0, 1.0), (0.0, 1.0, 1.0), (0.0, 1.0, 0.0)],
        );
        g.add_edge(ids[3], ids[0]).unwrap();
        let tail_a = g.add_vertex(Vertex::new(Point3::new(0.0, -1.0, -1.0), 1.0));
        let tail_b = g.add_vertex(Vertex::new(Point3::new(0.0, 2.0, 2.0), 1.0));
        g.add_edge(ids[0], tail_a).unwrap();
        g.add_edge(ids[2], tail_b).unwrap();

        let r = reduce_graph(&g, &Resolution::unit(), false).unwrap();
        assert_eq!(r.vertex_count(), 5);
        assert_eq!(r.edge_count(), 5);
        let total: f64 = r.edges().filter_map(|(_, _, e)| e.length()).sum();
        assert_relative_eq!(total, 4.0 + 2.0 * 2.0_f64.sqrt());
    }

    #[test]
    fn test_segment_requires_two_vertices() {
        assert!(matches!(
            Segment::new(vec![4]),
            Err(Error::Partition { stage: "reduce", .. })
        ));
        assert!(Segment::new(Vec::new()).is_err());
        assert_eq!(Segment::new(vec![7, 3, 2]).unwrap().key(), (2, 7));
    }

    #[test]
    fn test_reduce_empty() {
        let r = reduce_graph(&VesselGraph::new(), &Resolution::unit(), true).unwrap();
        assert!(r.is_empty());
    }
}
