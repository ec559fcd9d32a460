//! Batched graph edits for single-writer application.
//!
//! Parallel cleanup tasks read a shared `&VesselGraph` and describe their
//! changes as a [`GraphEdits`]. Partition results are merged and applied
//! once by the owner of the graph.

use log::trace;

use crate::error::{Error, Result};

use super::types::{Vertex, VesselGraph};

/// A vertex to add, with the existing vertices it connects to
#[derive(Clone, Debug, PartialEq)]
pub struct NewVertex {
    /// Vertex data
    pub vertex: Vertex,
    /// Ids of existing vertices to join to the new vertex
    pub neighbors: Vec<usize>,
}

/// Pending edits against one graph snapshot
#[derive(Clone, Debug, Default)]
pub struct GraphEdits {
    /// Vertices to add
    pub new_vertices: Vec<NewVertex>,
    /// Edges between two new vertices, as indices into `new_vertices`
    pub new_links: Vec<(usize, usize)>,
    /// Existing edges to delete
    pub removed_edges: Vec<(usize, usize)>,
    /// Existing vertices to delete (with their edges)
    pub removed_vertices: Vec<usize>,
}

impl GraphEdits {
    /// No edits
    pub fn new() -> Self {
        Self::default()
    }

    /// True if applying would change nothing
    pub fn is_empty(&self) -> bool {
        self.new_vertices.is_empty()
            && self.new_links.is_empty()
            && self.removed_edges.is_empty()
            && self.removed_vertices.is_empty()
    }

    /// Append another batch, shifting its new-vertex indices
    pub fn merge(&mut self, other: GraphEdits) {
        let shift = self.new_vertices.len();
        self.new_vertices.extend(other.new_vertices);
        self.new_links
            .extend(other.new_links.into_iter().map(|(a, b)| (a + shift, b + shift)));
        self.removed_edges.extend(other.removed_edges);
        self.removed_vertices.extend(other.removed_vertices);
    }

    /// Merge the results of parallel partitions. Any failed partition fails
    /// the whole batch.
    pub fn collect<I>(parts: I) -> Result<GraphEdits>
    where
        I: IntoIterator<Item = Result<GraphEdits>>,
    {
        let mut merged = GraphEdits::new();
        for part in parts {
            merged.merge(part?);
        }
        Ok(merged)
    }
}

impl VesselGraph {
    /// Apply a batch of edits.
    ///
    /// Every referenced id is validated before anything changes, so a bad
    /// batch leaves the graph untouched. Order of application: new vertices
    /// and their edges, new links, edge removals, vertex removals (which
    /// renumber the survivors).
    pub fn apply(&mut self, edits: GraphEdits) -> Result<()> {
        let n = self.vertex_count();
        let added = edits.new_vertices.len();
        let existing = edits
            .new_vertices
            .iter()
            .flat_map(|nv| nv.neighbors.iter().copied())
            .chain(edits.removed_edges.iter().flat_map(|&(a, b)| [a, b]))
            .chain(edits.removed_vertices.iter().copied());
        for v in existing {
            if v >= n {
                return Err(Error::UnknownVertex(v));
            }
        }
        for &(a, b) in edits.new_links.iter() {
            if a >= added || b >= added {
                return Err(Error::UnknownVertex(n + a.max(b)));
            }
        }

        for nv in edits.new_vertices {
            let id = self.add_vertex(nv.vertex);
            for neighbor in nv.neighbors {
                self.add_edge(id, neighbor)?;
            }
        }
        for (a, b) in edits.new_links {
            self.add_edge(n + a, n + b)?;
        }
        for (a, b) in edits.removed_edges {
            self.remove_edge(a, b);
        }
        let removed = edits.removed_vertices.len();
        self.remove_vertices(&edits.removed_vertices);
        trace!(
            "[GraphEdits] +{} vertices, -{} vertices, now {} vertices / {} edges",
            added,
            removed,
            self.vertex_count(),
            self.edge_count()
        );
        Ok(())
    }
}
