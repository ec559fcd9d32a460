//! Branch-point clique resolution.
//!
//! Thinning thick or asymmetric junctions leaves small clusters of
//! mutually adjacent vertices where one junction vertex belongs. Clusters
//! are found among the branch cores and repaired in three classes:
//!
//! | Class | Cluster | Repair |
//! |-------|---------|--------|
//! | 1 | Maximal 3/4-clique, no member of degree >= 5 | Delete the edge between the two heaviest members |
//! | 2 | Core component, 4..=50 vertices | Replace by one mean vertex |
//! | 3 | Core component, > 50 vertices | Replace by up to 5 mean vertices sliced along the dominant axis |
//!
//! Class 1 runs first. Class 2/3 clusters are found on freshly recomputed
//! cores because class-1 deletions change degrees.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::core::Point3;
use crate::error::{Error, Result};
use crate::graph::{GraphEdits, NewVertex, Vertex, VesselGraph, edge_key};

use super::chunk_size;

/// Clique resolver settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CliqueConfig {
    /// Whether clique resolution runs at all
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    /// Join consecutive class-3 slice vertices with an edge.
    /// When false, slices reconnect only through their own external neighbors.
    #[serde(default)]
    pub chain_slices: bool,

    /// Largest cluster merged into a single vertex (class 2)
    #[serde(default = "defaults::class_two_limit")]
    pub class_two_limit: usize,

    /// Maximum number of slices a class-3 cluster is cut into
    #[serde(default = "defaults::max_slices")]
    pub max_slices: usize,
}

impl Default for CliqueConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            chain_slices: false,
            class_two_limit: defaults::class_two_limit(),
            max_slices: defaults::max_slices(),
        }
    }
}

/// Smallest core component handled by class 2/3
const MIN_CLUSTER: usize = 4;

/// Members of degree at or above this exclude a clique from class 1
const CLASS_ONE_DEGREE_CAP: usize = 5;

/// Counts of clusters repaired per class
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliqueReport {
    /// Cliques broken by deleting one edge
    pub class_one: usize,
    /// Clusters merged into one vertex
    pub class_two: usize,
    /// Clusters replaced by a sliced centerline
    pub class_three: usize,
}

impl CliqueReport {
    /// Total clusters repaired
    pub fn total(&self) -> usize {
        self.class_one + self.class_two + self.class_three
    }
}

/// Resolve branch-point cliques in place.
///
/// Each pass computes its edits over partitions of the cluster list in
/// parallel against a read-only graph, merges them, and applies them once.
/// A failing partition aborts the pass before the graph is touched.
pub fn resolve_cliques(graph: &mut VesselGraph, config: &CliqueConfig) -> Result<CliqueReport> {
    let mut report = CliqueReport::default();
    if !config.enabled || graph.is_empty() {
        return Ok(report);
    }

    let (edits, class_one) = class_one_edits(graph)?;
    graph.apply(edits)?;
    report.class_one = class_one;

    let (edits, class_two, class_three) = cluster_edits(graph, config)?;
    graph.apply(edits)?;
    report.class_two = class_two;
    report.class_three = class_three;

    info!(
        "[Cliques] resolved {} clusters (class 1: {}, class 2: {}, class 3: {})",
        report.total(),
        report.class_one,
        report.class_two,
        report.class_three
    );
    Ok(report)
}

// ============================================================================
// Class 1
// ============================================================================

/// Edge deletions for every eligible 3/4-clique among the branch cores
fn class_one_edits(graph: &VesselGraph) -> Result<(GraphEdits, usize)> {
    let cores = graph.branch_cores();
    let cliques = graph.maximal_cliques(&cores, 3, 4);
    debug!("[Cliques] {} class-1 candidates", cliques.len());

    let edits = GraphEdits::collect(
        cliques
            .par_chunks(chunk_size(cliques.len()))
            .map(|part| {
                let mut edits = GraphEdits::new();
                for clique in part {
                    if let Some(edge) = class_one_edge(graph, clique)? {
                        edits.removed_edges.push(edge);
                    }
                }
                Ok(edits)
            })
            .collect::<Vec<_>>(),
    )?;
    let count = edits.removed_edges.len();
    Ok((edits, count))
}

/// Edge joining the two highest-weighted members, or `None` if the clique
/// contains a vertex of degree >= 5.
///
/// Weight is a member's own radius plus its neighbors' radii.
fn class_one_edge(graph: &VesselGraph, clique: &[usize]) -> Result<Option<(usize, usize)>> {
    if clique.iter().any(|&v| graph.degree(v) >= CLASS_ONE_DEGREE_CAP) {
        return Ok(None);
    }
    let vertices = graph.vertices();
    let mut weighted: Vec<(f64, usize)> = clique
        .iter()
        .map(|&v| {
            let own = vertices[v].radius;
            let around: f64 = graph.neighbors(v).map(|u| vertices[u].radius).sum();
            (own + around, v)
        })
        .collect();
    weighted.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

    let (a, b) = (weighted[0].1, weighted[1].1);
    if !graph.has_edge(a, b) {
        return Err(Error::Partition {
            stage: "clique class 1",
            reason: format!("clique members {} and {} are not adjacent", a, b),
        });
    }
    Ok(Some(edge_key(a, b)))
}

// ============================================================================
// Class 2 and 3
// ============================================================================

/// Replacement vertices for every core component with at least four members
fn cluster_edits(
    graph: &VesselGraph,
    config: &CliqueConfig,
) -> Result<(GraphEdits, usize, usize)> {
    let cores = graph.branch_cores();
    let clusters: Vec<Vec<usize>> = graph
        .induced_components(&cores)
        .into_iter()
        .filter(|c| c.len() >= MIN_CLUSTER)
        .collect();
    let class_three = clusters
        .iter()
        .filter(|c| c.len() > config.class_two_limit)
        .count();
    let class_two = clusters.len() - class_three;
    debug!(
        "[Cliques] {} class-2 and {} class-3 clusters",
        class_two, class_three
    );

    let edits = GraphEdits::collect(
        clusters
            .par_chunks(chunk_size(clusters.len()))
            .map(|part| {
                let mut edits = GraphEdits::new();
                for cluster in part {
                    let replacement = if cluster.len() <= config.class_two_limit {
                        merge_cluster(graph, cluster)?
                    } else {
                        slice_cluster(graph, cluster, config)?
                    };
                    edits.merge(replacement);
                }
                Ok(edits)
            })
            .collect::<Vec<_>>(),
    )?;
    Ok((edits, class_two, class_three))
}

/// Class 2: one vertex at the cluster mean, joined to every external neighbor
fn merge_cluster(graph: &VesselGraph, cluster: &[usize]) -> Result<GraphEdits> {
    let mut edits = GraphEdits::new();
    edits.new_vertices.push(replacement_vertex(graph, cluster, cluster)?);
    edits.removed_vertices.extend_from_slice(cluster);
    Ok(edits)
}

/// Class 3: slice the cluster along its dominant axis into at most
/// `max_slices` groups, one new vertex per group
fn slice_cluster(
    graph: &VesselGraph,
    cluster: &[usize],
    config: &CliqueConfig,
) -> Result<GraphEdits> {
    let coords: Vec<Point3> = cluster.iter().map(|&v| graph.coords(v)).collect();
    let axis = dominant_axis(&coords);

    let mut order: Vec<usize> = (0..cluster.len()).collect();
    order.sort_by(|&a, &b| coords[a].axis(axis).total_cmp(&coords[b].axis(axis)));
    let sorted: Vec<usize> = order.iter().map(|&i| cluster[i]).collect();

    let mut edits = GraphEdits::new();
    for (start, end) in slice_bounds(sorted.len(), config.max_slices) {
        edits
            .new_vertices
            .push(replacement_vertex(graph, &sorted[start..end], cluster)?);
    }
    if config.chain_slices {
        edits.new_links = (1..edits.new_vertices.len()).map(|i| (i - 1, i)).collect();
    }
    edits.removed_vertices.extend_from_slice(cluster);
    Ok(edits)
}

/// Mean vertex of `group`, joined to the group's neighbors outside `cluster`
fn replacement_vertex(
    graph: &VesselGraph,
    group: &[usize],
    cluster: &[usize],
) -> Result<NewVertex> {
    let vertices = graph.vertices();
    let vertex =
        Vertex::merged(group.iter().map(|&v| &vertices[v])).ok_or_else(|| Error::Partition {
            stage: "clique class 2/3",
            reason: "empty cluster group".to_string(),
        })?;
    let mut neighbors: Vec<usize> = group
        .iter()
        .flat_map(|&v| graph.neighbors(v))
        .filter(|u| cluster.binary_search(u).is_err())
        .collect();
    neighbors.sort_unstable();
    neighbors.dedup();
    Ok(NewVertex { vertex, neighbors })
}

/// Axis (0 = z, 1 = y, 2 = x) with the largest coordinate range.
/// Ties go to the lower axis index.
fn dominant_axis(coords: &[Point3]) -> usize {
    let mut best = (0, f64::NEG_INFINITY);
    for axis in 0..3 {
        let (lo, hi) = coords.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.axis(axis)), hi.max(p.axis(axis)))
        });
        if hi - lo > best.1 {
            best = (axis, hi - lo);
        }
    }
    best.0
}

/// Half-open index ranges cutting `n` sorted members into at most
/// `max_slices` groups at evenly spaced boundaries
fn slice_bounds(n: usize, max_slices: usize) -> Vec<(usize, usize)> {
    let points = n.min(max_slices + 1);
    if points < 2 {
        return if n > 0 { vec![(0, n)] } else { Vec::new() };
    }
    let bounds: Vec<usize> = (0..points).map(|i| i * n / (points - 1)).collect();
    bounds
        .windows(2)
        .filter(|w| w[1] > w[0])
        .map(|w| (w[0], w[1]))
        .collect()
}
