//! Centerline length measurement with optional B-spline smoothing.

use crate::core::{Point3, Resolution};
use crate::graph::VesselGraph;

/// Sum of resolution-scaled steps along a polyline
pub fn path_length(points: &[Point3], resolution: &Resolution) -> f64 {
    points
        .windows(2)
        .map(|w| w[0].physical_distance(&w[1], resolution))
        .sum()
}

/// Number of samples taken along a smoothed segment.
///
/// Grows sub-linearly with the vertex count; long or thick segments are
/// sampled at half density.
pub fn sample_count(vertex_count: usize, voxel_radius: f64) -> usize {
    if vertex_count < 2 {
        return vertex_count;
    }
    let n = vertex_count as f64;
    let mut samples = ((n / n.log2()).ceil() as usize).max(3);
    if vertex_count > 100 || (voxel_radius > 3.0 && vertex_count > 20) {
        samples /= 2;
    }
    samples
}

/// Resample a polyline from the clamped uniform B-spline that uses its
/// points as control points.
///
/// Degree 3 for more than four points, otherwise one less than the point
/// count. The curve starts and ends exactly on the first and last point.
pub fn smooth_path(points: &[Point3], voxel_radius: f64) -> Vec<Point3> {
    let n = points.len();
    if n < 2 {
        return points.to_vec();
    }
    let degree = if n > 4 { 3 } else { n - 1 };
    let knots = clamped_knots(n, degree);
    let samples = sample_count(n, voxel_radius);

    (0..samples)
        .map(|i| {
            let u = if samples > 1 {
                i as f64 / (samples - 1) as f64
            } else {
                0.0
            };
            de_boor(points, &knots, degree, u)
        })
        .collect()
}

/// Length of a vertex path through the graph, optionally smoothed
pub fn segment_length(
    graph: &VesselGraph,
    path: &[usize],
    resolution: &Resolution,
    smoothing: bool,
) -> f64 {
    let coords: Vec<Point3> = path.iter().map(|&v| graph.coords(v)).collect();
    if smoothing && coords.len() > 1 {
        let vertices = graph.vertices();
        let mean_radius =
            path.iter().map(|&v| vertices[v].radius).sum::<f64>() / path.len() as f64;
        let smoothed = smooth_path(&coords, mean_radius / resolution.min());
        path_length(&smoothed, resolution)
    } else {
        path_length(&coords, resolution)
    }
}

/// Knot vector with `degree + 1` zeros, uniform interior knots and
/// `degree + 1` ones
fn clamped_knots(control_points: usize, degree: usize) -> Vec<f64> {
    let interior = control_points - degree - 1;
    let mut knots = vec![0.0; degree + 1];
    knots.extend((1..=interior).map(|i| i as f64 / (interior + 1) as f64));
    knots.extend(std::iter::repeat_n(1.0, degree + 1));
    knots
}

fn de_boor(points: &[Point3], knots: &[f64], degree: usize, u: f64) -> Point3 {
    let n = points.len();
    // Span k with knots[k] <= u < knots[k + 1], clamped to the last span at u = 1
    let mut k = degree;
    while k < n - 1 && u >= knots[k + 1] {
        k += 1;
    }

    let mut d: Vec<Point3> = (0..=degree).map(|j| points[j + k - degree]).collect();
    for r in 1..=degree {
        for j in (r..=degree).rev() {
            let left = knots[j + k - degree];
            let right = knots[j + 1 + k - r];
            let alpha = if right > left {
                (u - left) / (right - left)
            } else {
                0.0
            };
            d[j] = Point3::new(
                (1.0 - alpha) * d[j - 1].z + alpha * d[j].z,
                (1.0 - alpha) * d[j - 1].y + alpha * d[j].y,
                (1.0 - alpha) * d[j - 1].x + alpha * d[j].x,
            );
        }
    }
    d[degree]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line(n: usize) -> Vec<Point3> {
        (0..n).map(|i| Point3::new(0.0, 0.0, i as f64)).collect()
    }

    #[test]
    fn test_path_length_anisotropic() {
        let pts = line(4);
        assert_relative_eq!(path_length(&pts, &Resolution::new(1.0, 1.0, 0.5)), 1.5);
        assert_relative_eq!(path_length(&pts[..1], &Resolution::unit()), 0.0);
    }

    #[test]
    fn test_sample_count() {
        assert_eq!(sample_count(2, 1.0), 3);
        assert_eq!(sample_count(16, 1.0), 4);
        assert_eq!(sample_count(30, 1.0), 7);
        assert_eq!(sample_count(30, 4.0), 3);
        assert_eq!(sample_count(256, 1.0), 16);
    }

    #[test]
    fn test_knots() {
        assert_eq!(clamped_knots(4, 3), vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(
            clamped_knots(5, 3),
            vec![0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_smoothing_keeps_endpoints() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(0.0, 1.0, 3.0),
            Point3::new(0.0, 0.0, 4.0),
            Point3::new(0.0, 1.0, 5.0),
        ];
        let smooth = smooth_path(&pts, 1.0);
        assert_eq!(smooth.len(), 3);
        assert_relative_eq!(smooth[0].x, 0.0);
        assert_relative_eq!(smooth[2].x, 5.0);
        assert_relative_eq!(smooth[2].y, 1.0);
        // Zig-zag is flattened, so the smoothed length is shorter
        let res = Resolution::unit();
        assert!(path_length(&smooth, &res) < path_length(&pts, &res));
    }

    #[test]
    fn test_smoothing_straight_line_preserves_length() {
        let pts = line(10);
        let smooth = smooth_path(&pts, 1.0);
        assert_relative_eq!(path_length(&smooth, &Resolution::unit()), 9.0, epsilon = 1e-9);
    }
}
