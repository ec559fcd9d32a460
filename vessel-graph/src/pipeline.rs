//! End-to-end volume to graph driver.
//!
//! # Pipeline
//!
//! ```text
//! BinaryVolume
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  Prepare        │  binarize, crop to foreground, pad by 1
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │  Thin           │  skeleton points (on a copy)
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │  Radii          │  searched in the un-thinned volume
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │  Build graph    │  26-connectivity, source coordinates
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │  Cleanup        │  cliques → prune → filter
//! └────────┬────────┘
//!          ▼
//!     VesselGraph
//! ```
//!
//! The volume is released once the radii are known. Cancellation is
//! checked between datasets only; a dataset in progress always finishes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::cleanup::{
    CliqueReport, FilterReport, PruneReport, filter, prune, resolve_cliques,
};
use crate::config::VesselConfig;
use crate::core::Resolution;
use crate::error::Result;
use crate::graph::{GraphType, VesselGraph, build_graph};
use crate::radius::RadiusEstimator;
use crate::thinning::skeletonize;
use crate::volume::{BinaryVolume, prepare_volume};

/// Counts and timings from one run
#[derive(Clone, Debug, Default)]
pub struct PipelineReport {
    /// Foreground voxels after preparation
    pub foreground_voxels: usize,
    /// Skeleton points produced by thinning
    pub skeleton_points: usize,
    /// Thinning cycles run
    pub thinning_cycles: usize,
    /// Vertices in the graph before cleanup
    pub built_vertices: usize,
    /// Edges in the graph before cleanup
    pub built_edges: usize,
    /// Clique resolution counts
    pub cliques: CliqueReport,
    /// Pruning counts
    pub prune: PruneReport,
    /// Filtering counts
    pub filter: FilterReport,
    /// Wall time per stage, in execution order
    pub stage_times: Vec<(&'static str, Duration)>,
}

impl PipelineReport {
    /// Sum of all stage times
    pub fn total_time(&self) -> Duration {
        self.stage_times.iter().map(|(_, d)| *d).sum()
    }

    fn record(&mut self, stage: &'static str, start: Instant) {
        let elapsed = start.elapsed();
        debug!("[Pipeline] {} took {:.3}s", stage, elapsed.as_secs_f64());
        self.stage_times.push((stage, elapsed));
    }
}

/// Final graph of one dataset plus its report
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// Cleaned centerline graph in source-volume coordinates
    pub graph: VesselGraph,
    /// What each stage did
    pub report: PipelineReport,
}

/// Outputs of a batch run
#[derive(Clone, Debug, Default)]
pub struct BatchOutput {
    /// Completed datasets, in input order
    pub outputs: Vec<PipelineOutput>,
    /// True if the batch stopped early on the cancel flag
    pub cancelled: bool,
}

/// Reusable pipeline; correction tables are built once in [`VesselPipeline::new`].
#[derive(Clone, Debug)]
pub struct VesselPipeline {
    config: VesselConfig,
    resolution: Resolution,
    estimator: RadiusEstimator,
}

impl VesselPipeline {
    /// Validate `config` and build the radius correction tables
    pub fn new(config: VesselConfig) -> Result<Self> {
        config.validate()?;
        let resolution = config.resolution();
        let mut estimator = RadiusEstimator::new(resolution, config.radius.search_limit);
        if config.radius.visual_radii {
            estimator = estimator.with_visual_radii();
        }
        Ok(Self {
            config,
            resolution,
            estimator,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &VesselConfig {
        &self.config
    }

    /// Reconstruct and clean the vessel graph of one binary volume
    pub fn process_volume(&self, raw: &BinaryVolume) -> Result<PipelineOutput> {
        let mut report = PipelineReport::default();

        let start = Instant::now();
        let prepared = prepare_volume(raw)?;
        report.record("prepare", start);
        if prepared.is_empty() {
            info!("[Pipeline] volume has no foreground");
            return Ok(PipelineOutput {
                graph: VesselGraph::new(),
                report,
            });
        }
        report.foreground_voxels = prepared.volume.foreground_count();

        let start = Instant::now();
        let skeleton = skeletonize(&prepared.volume)?;
        report.skeleton_points = skeleton.len();
        report.thinning_cycles = skeleton.cycles;
        report.record("thin", start);

        let start = Instant::now();
        let radii = self.estimator.estimate(&prepared.volume, &skeleton.points);
        report.record("radii", start);

        let shape = prepared.volume.shape();
        let offset = prepared.offset;
        drop(prepared);

        let start = Instant::now();
        let graph = build_graph(&skeleton.points, &radii, shape, offset)?;
        report.built_vertices = graph.vertex_count();
        report.built_edges = graph.edge_count();
        report.record("build", start);

        let graph = self.clean(graph, GraphType::Centerlines, &mut report)?;
        info!(
            "[Pipeline] {} voxels -> {} skeleton points -> {} vertices / {} edges in {:.3}s",
            report.foreground_voxels,
            report.skeleton_points,
            graph.vertex_count(),
            graph.edge_count(),
            report.total_time().as_secs_f64()
        );
        Ok(PipelineOutput { graph, report })
    }

    /// Clean an existing graph, e.g. one loaded from disk, as the
    /// configured `graph_type`.
    ///
    /// Clique resolution only applies to centerline graphs.
    pub fn process_graph(&self, graph: VesselGraph) -> Result<PipelineOutput> {
        let mut report = PipelineReport {
            built_vertices: graph.vertex_count(),
            built_edges: graph.edge_count(),
            ..PipelineReport::default()
        };
        debug!("[Pipeline] cleaning a {:?} graph", self.config.graph_type);
        let graph = self.clean(graph, self.config.graph_type, &mut report)?;
        Ok(PipelineOutput { graph, report })
    }

    /// Process datasets in order until done or `cancel` is set.
    ///
    /// The flag is read before each dataset, never during one.
    pub fn run_volumes<I>(&self, volumes: I, cancel: &AtomicBool) -> Result<BatchOutput>
    where
        I: IntoIterator<Item = BinaryVolume>,
    {
        let mut batch = BatchOutput::default();
        for (i, volume) in volumes.into_iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                info!("[Pipeline] cancelled after {} datasets", i);
                batch.cancelled = true;
                break;
            }
            debug!("[Pipeline] dataset {}", i);
            batch.outputs.push(self.process_volume(&volume)?);
        }
        Ok(batch)
    }

    fn clean(
        &self,
        mut graph: VesselGraph,
        graph_type: GraphType,
        report: &mut PipelineReport,
    ) -> Result<VesselGraph> {
        let cleanup = &self.config.cleanup;

        if graph_type == GraphType::Centerlines {
            let start = Instant::now();
            report.cliques = resolve_cliques(&mut graph, &cleanup.clique)?;
            report.record("cliques", start);
        }

        let start = Instant::now();
        report.prune = prune(
            &mut graph,
            graph_type,
            cleanup.prune_length,
            &self.resolution,
            cleanup.smooth_centerlines,
        )?;
        report.record("prune", start);

        let start = Instant::now();
        report.filter = filter(
            &mut graph,
            graph_type,
            cleanup.filter_length,
            &self.resolution,
            cleanup.smooth_centerlines,
        )?;
        report.record("filter", start);

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VoxelCoord;

    fn line_volume(len: usize) -> BinaryVolume {
        let coords: Vec<VoxelCoord> = (0..len).map(|x| VoxelCoord::new(2, 2, x + 2)).collect();
        BinaryVolume::from_coords([5, 5, len + 4], &coords).unwrap()
    }

    #[test]
    fn test_empty_volume() {
        let pipeline = VesselPipeline::new(VesselConfig::default()).unwrap();
        let out = pipeline.process_volume(&BinaryVolume::new([4, 4, 4])).unwrap();
        assert!(out.graph.is_empty());
        assert_eq!(out.report.skeleton_points, 0);
    }

    #[test]
    fn test_line_survives_without_filtering() {
        let mut config = VesselConfig::default();
        config.cleanup.prune_length = 0.0;
        config.cleanup.filter_length = 0.0;
        let pipeline = VesselPipeline::new(config).unwrap();
        let out = pipeline.process_volume(&line_volume(6)).unwrap();
        assert_eq!(out.graph.vertex_count(), 6);
        assert_eq!(out.graph.edge_count(), 5);
        // Source coordinates, not padded ones
        assert_eq!(out.graph.coords(0).x, 2.0);
        assert_eq!(out.graph.coords(0).z, 2.0);
    }

    #[test]
    fn test_short_isolated_line_filtered() {
        let pipeline = VesselPipeline::new(VesselConfig::default()).unwrap();
        let out = pipeline.process_volume(&line_volume(6)).unwrap();
        assert!(out.graph.is_empty());
        assert_eq!(out.report.filter.segments, 1);
    }

    #[test]
    fn test_visual_radii() {
        let mut config = VesselConfig::default();
        config.radius.visual_radii = true;
        config.cleanup.filter_length = 0.0;
        let pipeline = VesselPipeline::new(config).unwrap();
        let out = pipeline.process_volume(&line_volume(4)).unwrap();
        assert!(out.graph.vertices().iter().all(|v| v.visual_radius.is_some()));
    }

    #[test]
    fn test_cancel_before_start() {
        let pipeline = VesselPipeline::new(VesselConfig::default()).unwrap();
        let cancel = AtomicBool::new(true);
        let batch = pipeline
            .run_volumes(vec![line_volume(3), line_volume(4)], &cancel)
            .unwrap();
        assert!(batch.cancelled);
        assert!(batch.outputs.is_empty());
    }

    #[test]
    fn test_batch_runs_all() {
        let pipeline = VesselPipeline::new(VesselConfig::default()).unwrap();
        let cancel = AtomicBool::new(false);
        let batch = pipeline
            .run_volumes(vec![line_volume(3), BinaryVolume::new([2, 2, 2])], &cancel)
            .unwrap();
        assert!(!batch.cancelled);
        assert_eq!(batch.outputs.len(), 2);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = VesselConfig::default();
        config.cleanup.prune_length = f64::NAN;
        assert!(VesselPipeline::new(config).is_err());
    }
}
