//! Optional edge bundling: post-processes rendered edge paths into bundled
//! curves. Purely cosmetic-geometric; node positions are never touched.
//!
//! The scheme is a light force-directed bundling: each straight edge is
//! subdivided into control points, and corresponding points of compatible
//! (similar length, nearly parallel, close) edges attract each other while
//! neighbor springs keep each path smooth.

use crate::geom::{Point, vector};

#[derive(Debug, Clone)]
pub struct BundleConfig {
    /// Control points per edge (excluding endpoints).
    pub subdivisions: usize,
    /// Attraction/spring iterations.
    pub iterations: usize,
    /// Step size for each control-point move.
    pub step: f64,
    /// Neighbor-spring stiffness along a path.
    pub stiffness: f64,
    /// Minimum pairwise compatibility for two edges to attract, in [0, 1].
    pub threshold: f64,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            subdivisions: 12,
            iterations: 40,
            step: 4.0,
            stiffness: 0.4,
            threshold: 0.6,
        }
    }
}

/// Bundles straight segments into curved polylines. Endpoints never move.
pub fn bundle(segments: &[(Point, Point)], cfg: &BundleConfig) -> Vec<Vec<Point>> {
    let mut paths: Vec<Vec<Point>> = segments
        .iter()
        .map(|&(a, b)| subdivide(a, b, cfg.subdivisions))
        .collect();
    if paths.len() < 2 {
        return paths;
    }

    // Pairwise compatibility is static: it depends only on the endpoints.
    let m = segments.len();
    let mut compatible: Vec<(usize, usize, f64)> = Vec::new();
    for i in 0..m {
        for j in (i + 1)..m {
            let c = compatibility(segments[i], segments[j]);
            if c >= cfg.threshold {
                compatible.push((i, j, c));
            }
        }
    }

    let points = cfg.subdivisions + 2;
    for _ in 0..cfg.iterations {
        let mut moves: Vec<Vec<crate::geom::Vector>> =
            paths.iter().map(|p| vec![vector(0.0, 0.0); p.len()]).collect();

        // Springs between consecutive control points of one path.
        for (e, path) in paths.iter().enumerate() {
            for k in 1..points - 1 {
                let lap = (path[k - 1] - path[k]) + (path[k + 1] - path[k]);
                moves[e][k] += lap * cfg.stiffness;
            }
        }

        // Attraction between corresponding points of compatible edges.
        for &(i, j, c) in &compatible {
            for k in 1..points - 1 {
                let delta = paths[j][k] - paths[i][k];
                let dist = delta.length();
                if dist < 1e-9 {
                    continue;
                }
                let f = delta / dist * (c / dist.max(1.0));
                moves[i][k] += f;
                moves[j][k] -= f;
            }
        }

        for (e, path) in paths.iter_mut().enumerate() {
            for k in 1..points - 1 {
                path[k] += moves[e][k] * cfg.step;
            }
        }
    }

    paths
}

fn subdivide(a: Point, b: Point, subdivisions: usize) -> Vec<Point> {
    let mut out = Vec::with_capacity(subdivisions + 2);
    for k in 0..subdivisions + 2 {
        let t = k as f64 / (subdivisions + 1) as f64;
        out.push(a.lerp(b, t));
    }
    out
}

/// Product of angle, scale, and distance compatibility, each in [0, 1].
fn compatibility(e1: (Point, Point), e2: (Point, Point)) -> f64 {
    let v1 = e1.1 - e1.0;
    let v2 = e2.1 - e2.0;
    let (l1, l2) = (v1.length(), v2.length());
    if l1 < 1e-9 || l2 < 1e-9 {
        return 0.0;
    }

    let angle = (v1.dot(v2) / (l1 * l2)).abs();
    let scale = l1.min(l2) / l1.max(l2);
    let lavg = (l1 + l2) / 2.0;
    let mid1 = e1.0.lerp(e1.1, 0.5);
    let mid2 = e2.0.lerp(e2.1, 0.5);
    let distance = lavg / (lavg + (mid1 - mid2).length());

    angle * scale * distance
}
