//! # vessel-graph
//!
//! Reconstructs a quantifiable vessel network graph from a binary 3D volume
//! of segmented vasculature.
//!
//! ## Overview
//!
//! The volume is thinned to a one-voxel-wide centerline, every centerline
//! voxel gets a corrected radius from the surrounding background, and
//! 26-adjacent centerline voxels are joined into a graph. The raw graph
//! carries thinning artifacts that cleanup repairs:
//!
//! - **Cliques** - triangles and dense clusters where one junction belongs
//! - **Spurs** - short dangling segments from surface noise
//! - **Fragments** - short isolated segments and lone voxels
//!
//! ## Features
//!
//! - **Thinning**: Lee '94 topology-preserving 3D thinning
//! - **Radius Estimation**: Local background search with resolution-aware corrections
//! - **Graph Cleanup**: Clique resolution, pruning and filtering over parallel partitions
//! - **Segment Features**: Branch-level reduction with length, volume and tortuosity
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vessel_graph::{BinaryVolume, VesselConfig, VesselPipeline};
//!
//! let config = VesselConfig::load_default()?;
//! let pipeline = VesselPipeline::new(config)?;
//!
//! let volume = BinaryVolume::from_vec([64, 64, 64], voxels)?;
//! let output = pipeline.process_volume(&volume)?;
//!
//! println!("{} vertices, {} edges", output.graph.vertex_count(), output.graph.edge_count());
//! ```
//!
//! ## Coordinate System
//!
//! Arrays and points are indexed (z, y, x). Graph coordinates are voxel
//! indices of the source volume; lengths and radii are in the physical
//! units of the configured resolution.

#![warn(missing_docs)]

// Core types
pub mod core;

// Dense binary volumes and preparation
pub mod volume;

// Topology-preserving thinning
pub mod thinning;

// Radius estimation
pub mod radius;

// Graph storage and construction
pub mod graph;

// Clique resolution, pruning, filtering
pub mod cleanup;

// Branch-level reduction and segment measurements
pub mod features;

// Unified configuration
pub mod config;

// Volume to graph driver
pub mod pipeline;

mod error;

// Re-export commonly used types
pub use core::{Point3, Resolution, VoxelCoord};

pub use cleanup::{CliqueConfig, CliqueReport, FilterReport, PruneReport};
pub use config::{ConfigLoadError, VesselConfig};
pub use error::{Error, Result};
pub use features::{SegmentFeatures, reduce_graph};
pub use graph::{Edge, GraphEdits, GraphType, Vertex, VesselGraph, build_graph};
pub use pipeline::{BatchOutput, PipelineOutput, PipelineReport, VesselPipeline};
pub use radius::{CorrectionLut, RadiusEstimates, RadiusEstimator};
pub use thinning::{Skeleton, skeletonize, thin};
pub use volume::{BinaryVolume, PreparedVolume, prepare_volume};
