//! Full pipeline entrypoint: seed → stress → force → crossing.

use crate::config::LayoutConfig;
use crate::constraints::{CancelToken, Constraints};
use crate::crossing::{self, CrossingReport};
use crate::force::{self, ForceOptions, ForceReport};
use crate::seed;
use crate::stress::{self, StressReport};
use crate::Positions;
use sociogram_graph::{DistanceMatrix, Graph};

/// Per-phase diagnostics for one full pipeline run. Non-convergence at an
/// iteration cap is reported here, never as an error: the positions are the
/// best obtained so far.
#[derive(Debug, Clone)]
pub struct LayoutReport {
    pub stress: StressReport,
    pub force: ForceReport,
    pub crossing: CrossingReport,
}

#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub positions: Positions,
    pub report: LayoutReport,
}

/// Runs all four phases in strict order. Returns `None` if cancelled at any
/// point; partial work is discarded and never published.
pub fn full_layout(
    g: &Graph,
    cfg: &LayoutConfig,
    cons: &Constraints,
    cancel: &CancelToken,
) -> Option<LayoutResult> {
    let mut positions = seed::seed(g, cfg, cons);
    if cancel.is_cancelled() {
        return None;
    }

    let dist = DistanceMatrix::build(g);
    let stress = stress::majorize(g, &dist, &mut positions, cfg, cons, cancel)?;
    tracing::debug!(
        sweeps = stress.sweeps,
        converged = stress.converged,
        final_stress = stress.final_stress,
        "stress majorization done"
    );

    let force = force::refine(
        g,
        &mut positions,
        cfg,
        cons,
        &ForceOptions::full(cfg),
        cancel,
    )?;
    tracing::debug!(iterations = force.iterations, "force refinement done");

    let crossing = crossing::reduce(g, &mut positions, cfg, cons, cancel)?;
    tracing::debug!(iterations = crossing.iterations, "crossing reduction done");

    Some(LayoutResult {
        positions,
        report: LayoutReport {
            stress,
            force,
            crossing,
        },
    })
}
