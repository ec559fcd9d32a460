//! Attributed undirected vessel graph.
//!
//! ## Structure
//!
//! | Type | Description |
//! |------|-------------|
//! | [`VesselGraph`] | Vertices, adjacency sets and an ordered edge map |
//! | [`Vertex`] | Position, radius and optional visualization radius |
//! | [`Edge`] | Optional centerline path and segment features |
//! | [`GraphEdits`] | Edit batch produced by parallel cleanup tasks |
//!
//! ## Building
//!
//! ```rust,ignore
//! use vessel_graph::graph::build_graph;
//!
//! let graph = build_graph(&skeleton.points, &radii, volume.shape(), prepared.offset)?;
//! println!("{} vertices, {} edges", graph.vertex_count(), graph.edge_count());
//! ```

mod algorithms;
mod builder;
mod edits;
mod types;

pub use builder::{HALF_NEIGHBORHOOD, build_graph};
pub use edits::{GraphEdits, NewVertex};
pub use types::{Edge, GraphType, Vertex, VesselGraph, edge_key};
