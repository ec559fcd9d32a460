//! Radius estimation section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Radius estimation settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadiusSection {
    /// Largest search window half-width and correction table size (voxels)
    #[serde(default = "defaults::search_limit")]
    pub search_limit: usize,

    /// Also estimate unit-resolution radii for rendering
    #[serde(default)]
    pub visual_radii: bool,
}

impl Default for RadiusSection {
    fn default() -> Self {
        Self {
            search_limit: defaults::search_limit(),
            visual_radii: false,
        }
    }
}
