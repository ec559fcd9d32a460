//! Graph cleanup: clique resolution, pruning and filtering.
//!
//! Applied in order after graph construction:
//!
//! | Stage | Removes |
//! |-------|---------|
//! | [`resolve_cliques`] | Triangles and dense junction clusters from 26-connectivity |
//! | [`prune`] | Dangling end segments shorter than the prune length |
//! | [`filter`] | Isolated vertices and isolated segments shorter than the filter length |
//!
//! Every stage reads a snapshot of the graph from parallel workers, each
//! producing a [`GraphEdits`](crate::graph::GraphEdits) batch. The batches
//! are merged and applied once, so the result does not depend on the
//! worker count.

pub mod clique;
pub mod filter;
pub mod length;
pub mod prune;
pub mod segments;

pub use clique::{CliqueConfig, CliqueReport, resolve_cliques};
pub use filter::{FilterReport, filter};
pub use length::{path_length, segment_length, smooth_path};
pub use prune::{PruneReport, SPUR_LENGTH, prune};
pub use segments::{dangling_path, isolate_segments, isolated_path};

/// Partition size for `len` work items over the rayon pool
pub(crate) fn chunk_size(len: usize) -> usize {
    (len / rayon::current_num_threads().max(1)).max(1)
}
