//! Graph cleanup section.

use serde::{Deserialize, Serialize};

use crate::cleanup::CliqueConfig;

use super::defaults;

/// Clique resolution, pruning and filtering settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CleanupSection {
    /// Dangling segments shorter than this are pruned (physical units, 0 disables)
    #[serde(default = "defaults::prune_length")]
    pub prune_length: f64,

    /// Isolated segments shorter than this are removed (physical units, 0 disables)
    #[serde(default = "defaults::filter_length")]
    pub filter_length: f64,

    /// Measure segment lengths on a B-spline smoothed centerline
    #[serde(default = "defaults::enabled")]
    pub smooth_centerlines: bool,

    /// Clique resolution
    #[serde(default)]
    pub clique: CliqueConfig,
}

impl Default for CleanupSection {
    fn default() -> Self {
        Self {
            prune_length: defaults::prune_length(),
            filter_length: defaults::filter_length(),
            smooth_centerlines: true,
            clique: CliqueConfig::default(),
        }
    }
}
