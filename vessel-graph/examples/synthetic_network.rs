//! Synthetic vessel network example.
//!
//! Rasterizes a small branching network of cylinders into a binary volume,
//! runs the full pipeline on it and prints the branch-level segments.
//!
//! Usage:
//!   cargo run --example synthetic_network
//!   cargo run --example synthetic_network -- --size 96 --radius 3
//!   cargo run --example synthetic_network -- --config configs/vessel.yaml
//!
//! Enable logging to see per-stage timings:
//!   RUST_LOG=debug cargo run --example synthetic_network

use std::path::Path;

use clap::Parser;
use vessel_graph::{
    BinaryVolume, Point3, VesselConfig, VesselPipeline, VoxelCoord, reduce_graph,
};

/// Synthetic vessel network example
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Edge length of the cubic volume (voxels)
    #[arg(short, long, default_value = "64")]
    size: usize,

    /// Vessel radius (voxels)
    #[arg(short, long, default_value = "2.5")]
    radius: f64,

    /// Configuration file path (defaults are used if absent)
    #[arg(short, long, default_value = "configs/vessel.yaml")]
    config: String,
}

/// Set every voxel within `radius` of the segment `a`-`b`
fn draw_cylinder(volume: &mut BinaryVolume, a: Point3, b: Point3, radius: f64) {
    let axis = b - a;
    let len2 = axis.norm().powi(2);
    let [nz, ny, nx] = volume.shape();
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                let p = Point3::new(z as f64, y as f64, x as f64);
                let d = p - a;
                let t = ((d.z * axis.z + d.y * axis.y + d.x * axis.x) / len2).clamp(0.0, 1.0);
                let closest = Point3::new(a.z + t * axis.z, a.y + t * axis.y, a.x + t * axis.x);
                if p.distance(&closest) <= radius {
                    volume.set(VoxelCoord::new(z, y, x), true);
                }
            }
        }
    }
}

/// A trunk along x that forks twice
fn synthetic_network(size: usize, radius: f64) -> BinaryVolume {
    let mut volume = BinaryVolume::new([size, size, size]);
    let s = size as f64;
    let c = s / 2.0;
    let root = Point3::new(c, c, 0.1 * s);
    let fork = Point3::new(c, c, 0.45 * s);
    let upper = Point3::new(c, 0.25 * s, 0.7 * s);
    let lower = Point3::new(c, 0.75 * s, 0.75 * s);
    let twig = Point3::new(0.3 * s, 0.15 * s, 0.9 * s);
    let tip = Point3::new(c, 0.2 * s, 0.9 * s);

    draw_cylinder(&mut volume, root, fork, radius);
    draw_cylinder(&mut volume, fork, upper, radius);
    draw_cylinder(&mut volume, fork, lower, radius * 0.8);
    draw_cylinder(&mut volume, upper, twig, radius * 0.7);
    draw_cylinder(&mut volume, upper, tip, radius * 0.7);
    volume
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let path = Path::new(&args.config);
    let config = if path.exists() {
        match VesselConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", args.config, e);
                std::process::exit(1);
            }
        }
    } else {
        VesselConfig::default()
    };
    let resolution = config.resolution();
    let smoothing = config.cleanup.smooth_centerlines;

    let pipeline = match VesselPipeline::new(config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let volume = synthetic_network(args.size, args.radius);
    println!(
        "Volume {:?} with {} vessel voxels",
        volume.shape(),
        volume.foreground_count()
    );

    let output = match pipeline.process_volume(&volume) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Pipeline failed: {}", e);
            std::process::exit(1);
        }
    };

    let report = &output.report;
    println!(
        "Skeleton: {} points in {} cycles",
        report.skeleton_points, report.thinning_cycles
    );
    println!(
        "Graph: {} vertices / {} edges before cleanup, {} / {} after",
        report.built_vertices,
        report.built_edges,
        output.graph.vertex_count(),
        output.graph.edge_count()
    );
    println!(
        "Cleanup: {} cliques, {} pruned, {} filtered",
        report.cliques.total(),
        report.prune.segments + report.prune.spurs,
        report.filter.segments
    );
    for (stage, time) in &report.stage_times {
        println!("  {:<8} {:>8.2} ms", stage, time.as_secs_f64() * 1000.0);
    }

    let branches = match reduce_graph(&output.graph, &resolution, smoothing) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Reduction failed: {}", e);
            std::process::exit(1);
        }
    };
    println!(
        "\n{} segments between {} junctions/endpoints:",
        branches.edge_count(),
        branches.vertex_count()
    );
    println!(
        "{:>4} {:>4} {:>9} {:>9} {:>11}",
        "from", "to", "length", "radius", "tortuosity"
    );
    for (a, b, edge) in branches.edges() {
        if let Some(f) = &edge.features {
            println!(
                "{:>4} {:>4} {:>9.2} {:>9.2} {:>11.3}",
                a, b, f.length, f.radius_avg, f.tortuosity
            );
        }
    }
}
