//! Pull settling: the short animated settle that draws a bridge node's
//! distant connections toward it, plus the gentle re-equilibration that
//! follows. The active pull targets and the reduced attraction factors
//! arrive through [`Constraints`]; this module only runs the dynamics.

use crate::config::LayoutConfig;
use crate::constraints::{CancelToken, Constraints};
use crate::force::{self, ForceOptions, ForceReport};
use crate::Positions;
use rustc_hash::FxHashSet;
use sociogram_graph::{Graph, NodeId};

/// Spring settle for the pulled nodes (slight overshoot, then damped),
/// followed by one low-temperature pass over the whole visible set so
/// neighbors adjust. Returns `None` on cancellation.
pub fn settle(
    g: &Graph,
    positions: &mut Positions,
    cfg: &LayoutConfig,
    cons: &Constraints,
    cancel: &CancelToken,
) -> Option<ForceReport> {
    let pulled: FxHashSet<NodeId> = cons.pull_targets.keys().cloned().collect();
    if pulled.is_empty() {
        return Some(ForceReport { iterations: 0 });
    }

    let settle_opts = ForceOptions {
        iterations: cfg.pull_settle_steps,
        start_temp: cfg.temperature,
        end_temp: cfg.temperature * 0.1,
        hot: Some(pulled),
    };
    force::refine(g, positions, cfg, cons, &settle_opts, cancel)?;

    // Brief whole-set re-equilibration so the neighborhood absorbs the
    // arrivals gently.
    force::refine(
        g,
        positions,
        cfg,
        cons,
        &ForceOptions::requilibrate(cfg),
        cancel,
    )
}

/// Re-equilibration after a release: the temporary attraction is already
/// gone from `cons`; the affected nodes drift back to their current natural
/// equilibrium rather than to their exact pre-pull coordinates.
pub fn relax(
    g: &Graph,
    positions: &mut Positions,
    cfg: &LayoutConfig,
    cons: &Constraints,
    cancel: &CancelToken,
) -> Option<ForceReport> {
    force::refine(
        g,
        positions,
        cfg,
        cons,
        &ForceOptions::requilibrate(cfg),
        cancel,
    )
}
