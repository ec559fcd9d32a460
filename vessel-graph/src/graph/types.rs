//! Vessel graph storage.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::{Point3, Resolution};
use crate::error::{Error, Result};
use crate::features::SegmentFeatures;

/// How a graph's edges relate to the underlying vessels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    /// One vertex per skeleton voxel; edges join adjacent voxels
    #[default]
    Centerlines,
    /// Vertices are junctions and endpoints; edges are whole segments
    Branches,
}

/// A graph vertex (skeleton point or merged junction)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position in source-volume voxel coordinates (z, y, x)
    pub coords: Point3,
    /// Vessel radius in physical units
    pub radius: f64,
    /// Vessel radius in voxel units, for rendering
    pub visual_radius: Option<f64>,
}

impl Vertex {
    /// Create a vertex without a visualization radius
    pub fn new(coords: Point3, radius: f64) -> Self {
        Self {
            coords,
            radius,
            visual_radius: None,
        }
    }

    /// Mean position and radii of a group of vertices, `None` when empty.
    ///
    /// The visualization radius is averaged only if the first vertex has one.
    pub fn merged<'a, I>(vertices: I) -> Option<Vertex>
    where
        I: IntoIterator<Item = &'a Vertex>,
    {
        let group: Vec<&Vertex> = vertices.into_iter().collect();
        let first = group.first()?;
        let n = group.len() as f64;
        let coords = Point3::mean_of(group.iter().map(|v| v.coords))?;
        let radius = group.iter().map(|v| v.radius).sum::<f64>() / n;
        let visual_radius = first
            .visual_radius
            .map(|_| group.iter().filter_map(|v| v.visual_radius).sum::<f64>() / n);
        Some(Vertex {
            coords,
            radius,
            visual_radius,
        })
    }
}

/// Undirected edge payload
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Centerline from the lower-id endpoint to the higher-id endpoint.
    /// Empty for voxel-adjacency edges.
    pub path: Vec<Point3>,
    /// Segment measurements, when computed or supplied by a loader
    pub features: Option<SegmentFeatures>,
}

impl Edge {
    /// Edge with a precomputed length only
    pub fn with_length(length: f64) -> Self {
        Self {
            path: Vec::new(),
            features: Some(SegmentFeatures {
                length,
                ..SegmentFeatures::default()
            }),
        }
    }

    /// Stored length attribute, if any
    pub fn length(&self) -> Option<f64> {
        self.features.as_ref().map(|f| f.length)
    }
}

/// Ordered key of an undirected edge
#[inline]
pub fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Undirected attributed graph of a vessel network.
///
/// Vertex ids are dense indices `0..vertex_count()`. Removing vertices
/// renumbers the survivors in their original order. There are no parallel
/// edges; self-loops only appear in reduced graphs where a vessel closes
/// on itself.
#[derive(Clone, Debug, Default)]
pub struct VesselGraph {
    vertices: Vec<Vertex>,
    adjacency: Vec<BTreeSet<usize>>,
    edges: BTreeMap<(usize, usize), Edge>,
}

impl VesselGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // === Queries ===

    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if there are no vertices
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex by id
    #[inline]
    pub fn vertex(&self, v: usize) -> Option<&Vertex> {
        self.vertices.get(v)
    }

    /// All vertices in id order
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Position of a vertex (panics on an invalid id)
    #[inline]
    pub fn coords(&self, v: usize) -> Point3 {
        self.vertices[v].coords
    }

    /// Degree; a self-loop counts twice
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        let adj = &self.adjacency[v];
        adj.len() + usize::from(adj.contains(&v))
    }

    /// Neighbor ids in ascending order
    #[inline]
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[v].iter().copied()
    }

    /// True if `a` and `b` are joined
    #[inline]
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edges.contains_key(&edge_key(a, b))
    }

    /// Edge payload between `a` and `b`
    #[inline]
    pub fn edge(&self, a: usize, b: usize) -> Option<&Edge> {
        self.edges.get(&edge_key(a, b))
    }

    /// All edges as `(low id, high id, payload)`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, &Edge)> + '_ {
        self.edges.iter().map(|(&(a, b), e)| (a, b, e))
    }

    /// Degree of every vertex
    pub fn degrees(&self) -> Vec<usize> {
        (0..self.vertex_count()).map(|v| self.degree(v)).collect()
    }

    /// Physical length of an edge: the stored attribute if present, else
    /// its centerline, else the straight line between its endpoints.
    pub fn edge_length(&self, a: usize, b: usize, resolution: &Resolution) -> Option<f64> {
        let edge = self.edge(a, b)?;
        if let Some(length) = edge.length() {
            return Some(length);
        }
        if edge.path.len() > 1 {
            return Some(
                edge.path
                    .windows(2)
                    .map(|w| w[0].physical_distance(&w[1], resolution))
                    .sum(),
            );
        }
        Some(self.coords(a).physical_distance(&self.coords(b), resolution))
    }

    // === Mutation ===

    /// Append a vertex and return its id
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        self.vertices.push(vertex);
        self.adjacency.push(BTreeSet::new());
        self.vertices.len() - 1
    }

    /// Join two vertices. Self-loops and repeated edges are ignored;
    /// returns true if a new edge was created.
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<bool> {
        if a == b {
            self.check(a)?;
            return Ok(false);
        }
        self.insert_edge(a, b, Edge::default())
    }

    /// Join two vertices with a payload, replacing any existing payload.
    /// Allows self-loops.
    pub fn insert_edge(&mut self, a: usize, b: usize, edge: Edge) -> Result<bool> {
        self.check(a)?;
        self.check(b)?;
        self.adjacency[a].insert(b);
        self.adjacency[b].insert(a);
        Ok(self.edges.insert(edge_key(a, b), edge).is_none())
    }

    /// Remove an edge; returns true if it existed
    pub fn remove_edge(&mut self, a: usize, b: usize) -> bool {
        if self.edges.remove(&edge_key(a, b)).is_none() {
            return false;
        }
        self.adjacency[a].remove(&b);
        self.adjacency[b].remove(&a);
        true
    }

    /// Remove vertices and their edges, renumbering survivors in order.
    ///
    /// Returns the old-id to new-id map. Unknown ids are ignored.
    pub fn remove_vertices(&mut self, ids: &[usize]) -> Vec<Option<usize>> {
        let n = self.vertex_count();
        let mut keep = vec![true; n];
        for &v in ids {
            if v < n {
                keep[v] = false;
            }
        }

        let mut remap = vec![None; n];
        let mut next = 0;
        for (v, slot) in remap.iter_mut().enumerate() {
            if keep[v] {
                *slot = Some(next);
                next += 1;
            }
        }
        if next == n {
            return remap;
        }

        let vertices = std::mem::take(&mut self.vertices);
        self.vertices = vertices
            .into_iter()
            .zip(keep.iter())
            .filter_map(|(v, &k)| k.then_some(v))
            .collect();

        let edges = std::mem::take(&mut self.edges);
        self.adjacency = vec![BTreeSet::new(); next];
        for ((a, b), edge) in edges {
            if let (Some(na), Some(nb)) = (remap[a], remap[b]) {
                self.adjacency[na].insert(nb);
                self.adjacency[nb].insert(na);
                self.edges.insert(edge_key(na, nb), edge);
            }
        }
        remap
    }

    /// Remove all degree-0 vertices; returns how many were removed
    pub fn delete_isolated(&mut self) -> usize {
        let isolated: Vec<usize> = (0..self.vertex_count())
            .filter(|&v| self.degree(v) == 0)
            .collect();
        self.remove_vertices(&isolated);
        isolated.len()
    }

    fn check(&self, v: usize) -> Result<()> {
        if v < self.vertex_count() {
            Ok(())
        } else {
            Err(Error::UnknownVertex(v))
        }
    }
}
