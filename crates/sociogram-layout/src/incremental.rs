//! Incremental updater: bounded local re-simulation after small graph deltas.
//!
//! Instead of re-running the full pipeline, changed nodes and their 1-hop
//! neighbors form a hot set that gets a short phase-3 pass; everything else
//! contributes forces but stays put, so cost scales with the hot set.

use crate::config::LayoutConfig;
use crate::constraints::{CancelToken, Constraints};
use crate::force::{self, ForceOptions, ForceReport};
use crate::geom::vector;
use crate::Positions;
use rustc_hash::FxHashSet;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sociogram_graph::{Graph, NodeId};

/// Changed nodes plus their 1-hop neighborhood.
pub fn hot_set<'a>(g: &Graph, changed: impl IntoIterator<Item = &'a str>) -> FxHashSet<NodeId> {
    let mut hot: FxHashSet<NodeId> = FxHashSet::default();
    for id in changed {
        if !g.has_node(id) {
            continue;
        }
        hot.insert(id.to_string());
        for n in g.neighbors(id) {
            hot.insert(n.to_string());
        }
    }
    hot
}

/// Gives every graph node a position: new nodes land beside an already
/// placed neighbor (deterministic jitter), or on the periphery when no
/// neighbor is placed yet.
pub fn ensure_positions(g: &Graph, positions: &mut Positions, cfg: &LayoutConfig) {
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let missing: Vec<NodeId> = g
        .node_ids()
        .filter(|id| !positions.contains_key(*id))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        return;
    }

    let fallback = crate::geom::bounding_rect(positions.values().copied())
        .map(|r| {
            let m = cfg.ideal_edge_length;
            crate::geom::point(r.max.x + m, r.center().y)
        })
        .unwrap_or_else(|| crate::geom::point(0.0, 0.0));

    for id in missing {
        let anchor = g
            .neighbors(&id)
            .into_iter()
            .find(|n| positions.contains_key(*n))
            .map(|n| positions[n]);
        let base = anchor.unwrap_or(fallback);
        let j = vector(
            rng.gen_range(-1.0..1.0) * cfg.ideal_edge_length * 0.4,
            rng.gen_range(-1.0..1.0) * cfg.ideal_edge_length * 0.4,
        );
        positions.insert(id, base + j);
    }

    // Drop positions for nodes no longer in the graph.
    positions.retain(|id, _| g.has_node(id));
}

/// One incremental pass: velocities reset, 50 restricted phase-3 iterations.
pub fn refine_hot(
    g: &Graph,
    positions: &mut Positions,
    hot: FxHashSet<NodeId>,
    cfg: &LayoutConfig,
    cons: &Constraints,
    cancel: &CancelToken,
) -> Option<ForceReport> {
    ensure_positions(g, positions, cfg);
    if hot.is_empty() {
        return Some(ForceReport { iterations: 0 });
    }
    force::refine(
        g,
        positions,
        cfg,
        cons,
        &ForceOptions::incremental(cfg, hot),
        cancel,
    )
}
