//! Main VesselConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Resolution;
use crate::graph::GraphType;

use super::cleanup::CleanupSection;
use super::defaults;
use super::error::ConfigLoadError;
use super::radius::RadiusSection;

/// Voxel spacing as written in a config file: one number, or `[x, y, z]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolutionSetting {
    /// Same spacing on every axis
    Isotropic(f64),
    /// Per-axis spacing in (x, y, z) order
    PerAxis([f64; 3]),
}

impl Default for ResolutionSetting {
    fn default() -> Self {
        Self::Isotropic(defaults::resolution())
    }
}

impl ResolutionSetting {
    /// Internal (z, y, x) resolution
    pub fn to_resolution(self) -> Resolution {
        match self {
            Self::Isotropic(spacing) => Resolution::isotropic(spacing),
            Self::PerAxis(xyz) => Resolution::from_xyz(xyz),
        }
    }
}

/// Full vessel-graph configuration loaded from YAML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct VesselConfig {
    /// Physical size of one voxel
    #[serde(default)]
    pub resolution: ResolutionSetting,

    /// Graph flavor [`crate::VesselPipeline::process_graph`] cleans as.
    /// Graphs built from volumes are always centerline graphs.
    #[serde(default)]
    pub graph_type: GraphType,

    /// Radius estimation settings
    #[serde(default)]
    pub radius: RadiusSection,

    /// Cleanup settings
    #[serde(default)]
    pub cleanup: CleanupSection,
}

impl VesselConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/vessel.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new("configs/vessel.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string and validate
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.resolution()
            .validate()
            .map_err(|e| ConfigLoadError::Invalid(e.to_string()))?;

        let cleanup = &self.cleanup;
        for (name, value) in [
            ("prune_length", cleanup.prune_length),
            ("filter_length", cleanup.filter_length),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigLoadError::Invalid(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if self.radius.search_limit == 0 {
            return Err(ConfigLoadError::Invalid(
                "radius.search_limit must be at least 1".to_string(),
            ));
        }
        if cleanup.clique.max_slices == 0 {
            return Err(ConfigLoadError::Invalid(
                "clique.max_slices must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Internal (z, y, x) resolution
    pub fn resolution(&self) -> Resolution {
        self.resolution.to_resolution()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VesselConfig::default();
        assert_eq!(config.resolution(), Resolution::unit());
        assert_eq!(config.graph_type, GraphType::Centerlines);
        assert_eq!(config.cleanup.prune_length, 5.0);
        assert_eq!(config.cleanup.filter_length, 10.0);
        assert!(config.cleanup.smooth_centerlines);
        assert!(config.cleanup.clique.enabled);
        assert!(!config.cleanup.clique.chain_slices);
        assert_eq!(config.radius.search_limit, 150);
        assert!(!config.radius.visual_radii);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = VesselConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = VesselConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "resolution: [0.5, 0.5, 2.0]\ngraph_type: branches\ncleanup:\n  prune_length: 3.0\n";
        let config = VesselConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.resolution(), Resolution::new(2.0, 0.5, 0.5));
        assert_eq!(config.graph_type, GraphType::Branches);
        assert_eq!(config.cleanup.prune_length, 3.0);
        assert_eq!(config.cleanup.filter_length, 10.0);
        assert!(config.cleanup.clique.enabled);
    }

    #[test]
    fn test_partial_clique_section_uses_defaults() {
        let yaml = "cleanup:\n  clique:\n    chain_slices: true\n";
        let config = VesselConfig::from_yaml(yaml).unwrap();
        let clique = &config.cleanup.clique;
        assert!(clique.chain_slices);
        assert_eq!(clique.enabled, defaults::enabled());
        assert_eq!(clique.class_two_limit, defaults::class_two_limit());
        assert_eq!(clique.max_slices, defaults::max_slices());
        assert_eq!(clique.class_two_limit, 50);
        assert_eq!(clique.max_slices, 5);
    }

    #[test]
    fn test_scalar_resolution() {
        let config = VesselConfig::from_yaml("resolution: 0.25\n").unwrap();
        assert_eq!(config.resolution(), Resolution::isotropic(0.25));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            VesselConfig::from_yaml("resolution: 0.0\n"),
            Err(ConfigLoadError::Invalid(_))
        ));
        assert!(matches!(
            VesselConfig::from_yaml("cleanup:\n  filter_length: -1.0\n"),
            Err(ConfigLoadError::Invalid(_))
        ));
        assert!(matches!(
            VesselConfig::from_yaml("graph_type: [1, 2\n"),
            Err(ConfigLoadError::Parse(_))
        ));
    }
}
