//! Stress majorization: phase 2 of the pipeline.
//!
//! Gauss–Seidel SMACOF: each sweep moves every free node to the position
//! minimizing its share of Σ w_ij (‖p_i−p_j‖ − d_ij)² with all other nodes
//! held fixed, which makes total stress non-increasing sweep over sweep.
//! Disconnected pairs carry no stress term at all.

use crate::config::LayoutConfig;
use crate::constraints::{CancelToken, Constraints};
use crate::geom::{Point, vector};
use crate::Positions;
use sociogram_graph::{DistanceMatrix, Graph, UNREACHABLE};

#[derive(Debug, Clone)]
pub struct StressReport {
    pub sweeps: usize,
    pub converged: bool,
    pub final_stress: f64,
    /// Total stress after each sweep; non-increasing by construction.
    pub history: Vec<f64>,
}

/// Runs up to `cfg.stress_sweeps` sweeps; stops early once the relative
/// stress drop falls under `cfg.stress_tolerance`. Returns `None` on
/// cancellation (partial movement is discarded by the caller).
pub fn majorize(
    g: &Graph,
    dist: &DistanceMatrix,
    positions: &mut Positions,
    cfg: &LayoutConfig,
    cons: &Constraints,
    cancel: &CancelToken,
) -> Option<StressReport> {
    let n = dist.len();
    if n < 2 {
        return Some(StressReport {
            sweeps: 0,
            converged: true,
            final_stress: 0.0,
            history: Vec::new(),
        });
    }

    let ids = dist.ids();
    let mut pos: Vec<Point> = ids.iter().map(|id| positions[id]).collect();
    let fixed: Vec<bool> = ids.iter().map(|id| cons.is_fixed(id)).collect();

    let mut prev_stress = stress_value(dist, &pos, cfg);
    let mut history = Vec::new();
    let mut sweeps = 0;
    let mut converged = false;

    for _ in 0..cfg.stress_sweeps {
        if cancel.is_cancelled() {
            return None;
        }

        for i in 0..n {
            if fixed[i] {
                continue;
            }
            let mut num = vector(0.0, 0.0);
            let mut den = 0.0;
            for j in 0..n {
                if j == i {
                    continue;
                }
                let hops = dist.hops_by_index(i, j);
                if hops == UNREACHABLE {
                    continue;
                }
                let d = hops as f64 * cfg.ideal_edge_length;
                let w = 1.0 / (d * d);
                let delta = pos[i] - pos[j];
                let len = delta.length();
                // Coincident points get a fixed fallback direction; the
                // jittered seeding makes this vanishingly rare.
                let dir = if len > 1e-9 {
                    delta / len
                } else {
                    vector(1.0, 0.0)
                };
                num += (pos[j].to_vector() + dir * d) * w;
                den += w;
            }
            if den > 0.0 {
                pos[i] = (num / den).to_point();
            }
        }

        sweeps += 1;
        let cur = stress_value(dist, &pos, cfg);
        history.push(cur);
        let drop = prev_stress - cur;
        if prev_stress > 0.0 && drop / prev_stress < cfg.stress_tolerance {
            prev_stress = cur;
            converged = true;
            break;
        }
        prev_stress = cur;
    }

    for (i, id) in ids.iter().enumerate() {
        positions.insert(id.clone(), pos[i]);
    }

    Some(StressReport {
        sweeps,
        converged,
        final_stress: prev_stress,
        history,
    })
}

/// Total weighted stress over all reachable pairs.
pub fn stress_value(dist: &DistanceMatrix, pos: &[Point], cfg: &LayoutConfig) -> f64 {
    let n = dist.len();
    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let hops = dist.hops_by_index(i, j);
            if hops == UNREACHABLE {
                continue;
            }
            let d = hops as f64 * cfg.ideal_edge_length;
            let w = 1.0 / (d * d);
            let diff = (pos[i] - pos[j]).length() - d;
            total += w * diff * diff;
        }
    }
    total
}
