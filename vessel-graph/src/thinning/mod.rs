//! Topology-preserving 3D thinning (Lee, Kashyap & Chu 1994).
//!
//! Reduces a binary volume to a one-voxel-wide medial skeleton with the
//! same connected components, tunnels and cavities.
//!
//! ## Deletion Tests
//!
//! A foreground voxel is deleted in a sub-iteration only if all hold:
//!
//! | Test | Meaning |
//! |------|---------|
//! | Border | Background neighbor in the current erosion direction |
//! | Not endpoint | More than one foreground voxel among its 26 neighbors |
//! | Euler invariant | Octant Euler contributions sum to zero |
//! | Simple | Its 26 neighbors form a single connected component |
//!
//! ## Two-Phase Sub-Iteration
//!
//! ```text
//! volume ──par scan──> candidates ──sequential──> delete if still simple
//!         (read-only)               (re-check)
//! ```
//!
//! Candidates are selected against a frozen volume and applied later.
//! Deleting one candidate can make a neighbouring candidate non-simple, so
//! the apply pass re-runs the connectivity test before each deletion.

mod engine;
mod neighborhood;
mod tables;

pub use engine::{Skeleton, skeletonize, thin};
pub use neighborhood::Neighborhood;
