//! Configuration loading for the vessel pipeline.
//!
//! Loads all settings from a single YAML file with sensible defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vessel_graph::config::VesselConfig;
//!
//! // Load from default path (configs/vessel.yaml)
//! let config = VesselConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = VesselConfig::default();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | `resolution` | Voxel spacing, a number or `[x, y, z]` |
//! | `graph_type` | `centerlines` or `branches` |
//! | [`RadiusSection`] | Correction table size, visualization radii |
//! | [`CleanupSection`] | Prune/filter lengths, smoothing, clique resolution |
//!
//! ## Example YAML
//!
//! ```yaml
//! resolution: [0.5, 0.5, 1.0]   # x, y, z
//! graph_type: centerlines
//!
//! radius:
//!   search_limit: 150
//!   visual_radii: false
//!
//! cleanup:
//!   prune_length: 5.0
//!   filter_length: 10.0
//!   smooth_centerlines: true
//!   clique:
//!     enabled: true
//!     chain_slices: false
//! ```

mod cleanup;
pub(crate) mod defaults;
mod error;
mod radius;
mod vessel;

// Re-export main types
pub use error::ConfigLoadError;
pub use vessel::{ResolutionSetting, VesselConfig};

// Re-export section types
pub use cleanup::CleanupSection;
pub use radius::RadiusSection;
