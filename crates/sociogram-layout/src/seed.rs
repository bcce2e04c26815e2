//! Deterministic seeding: phase 1 of the pipeline.
//!
//! A pure function of (graph, config): the only randomness is a ChaCha8
//! stream from a fixed seed, drawn in graph insertion order, so the same
//! input always produces byte-identical output.

use crate::config::LayoutConfig;
use crate::constraints::Constraints;
use crate::geom::{Point, point, vector};
use crate::Positions;
use rustc_hash::FxHashSet;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sociogram_graph::{EdgeType, Graph, NodeId};
use std::collections::VecDeque;
use std::f64::consts::TAU;

// Golden angle keeps successive cluster centroids from lining up.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

pub fn seed(g: &Graph, cfg: &LayoutConfig, cons: &Constraints) -> Positions {
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let mut positions = Positions::default();

    place_family_rings(g, cfg, &mut positions);
    place_recruiting_tree(g, cfg, &mut positions);
    place_near_referrers(g, cfg, &mut rng, &mut positions);
    place_remaining_connected(g, cfg, &mut rng, &mut positions);
    place_periphery(g, cfg, &mut positions);

    // Pins win over every seeding rule.
    for (id, p) in &cons.pinned {
        if g.has_node(id) {
            positions.insert(id.clone(), *p);
        }
    }

    positions
}

/// Members of each family cluster go on a circle whose radius grows with
/// member count; centroids fan out on a golden-angle spiral.
fn place_family_rings(g: &Graph, cfg: &LayoutConfig, positions: &mut Positions) {
    let clusters = g.components_by_type(EdgeType::Family, 2);
    for (k, members) in clusters.iter().enumerate() {
        let spread = cfg.ideal_edge_length * 2.0;
        let angle = k as f64 * GOLDEN_ANGLE;
        let dist = spread * (k as f64 + 1.0).sqrt();
        let centroid = point(dist * angle.cos(), dist * angle.sin());

        let ring = ring_radius(cfg, members.len());
        for (m, id) in members.iter().enumerate() {
            let a = m as f64 * TAU / members.len() as f64;
            positions.insert(id.clone(), centroid + vector(ring * a.cos(), ring * a.sin()));
        }
    }
}

fn ring_radius(cfg: &LayoutConfig, count: usize) -> f64 {
    // Enough circumference for every member plus breathing room.
    (count as f64 * cfg.node_radius * 3.0 / TAU).max(cfg.node_radius * 2.0)
}

/// Hierarchical seed for recruiting edges: root at top, each generation
/// offset downward, siblings spread symmetrically.
fn place_recruiting_tree(g: &Graph, cfg: &LayoutConfig, positions: &mut Positions) {
    let Some(root) = cfg.root.as_deref().filter(|r| g.has_node(r)) else {
        return;
    };

    let mut levels: Vec<Vec<NodeId>> = vec![vec![root.to_string()]];
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    visited.insert(root.to_string());
    let mut queue = VecDeque::from([(root.to_string(), 0usize)]);
    while let Some((v, depth)) = queue.pop_front() {
        for edge in g.edges_of(&v) {
            if edge.ty != EdgeType::RecruitingTree {
                continue;
            }
            let w = edge.other(&v);
            if visited.insert(w.to_string()) {
                if levels.len() <= depth + 1 {
                    levels.push(Vec::new());
                }
                levels[depth + 1].push(w.to_string());
                queue.push_back((w.to_string(), depth + 1));
            }
        }
    }

    let origin = positions.get(root).copied().unwrap_or_else(|| point(0.0, 0.0));
    positions.entry(root.to_string()).or_insert(origin);

    let level_sep = cfg.ideal_edge_length;
    let sibling_sep = cfg.ideal_edge_length * 0.8;
    for (depth, level) in levels.iter().enumerate().skip(1) {
        let width = (level.len() - 1) as f64 * sibling_sep;
        for (i, id) in level.iter().enumerate() {
            if positions.contains_key(id) {
                continue;
            }
            let x = origin.x - width / 2.0 + i as f64 * sibling_sep;
            positions.insert(id.clone(), point(x, origin.y + depth as f64 * level_sep));
        }
    }
}

/// Referral-linked nodes start next to their referrer, jittered so exact
/// overlaps cannot happen. Referral chains resolve over repeated passes.
fn place_near_referrers(
    g: &Graph,
    cfg: &LayoutConfig,
    rng: &mut ChaCha8Rng,
    positions: &mut Positions,
) {
    loop {
        let mut progressed = false;
        for id in g.node_ids() {
            if positions.contains_key(id) {
                continue;
            }
            let referrer = g
                .edges_of(id)
                .filter(|e| e.ty == EdgeType::Referral)
                .map(|e| e.other(id))
                .find(|other| positions.contains_key(*other));
            if let Some(referrer) = referrer {
                let base = positions[referrer];
                positions.insert(id.to_string(), base + jitter(rng, cfg.ideal_edge_length * 0.4));
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
}

/// Any node connected to something already placed lands beside it.
fn place_remaining_connected(
    g: &Graph,
    cfg: &LayoutConfig,
    rng: &mut ChaCha8Rng,
    positions: &mut Positions,
) {
    loop {
        let mut progressed = false;
        for id in g.node_ids() {
            if positions.contains_key(id) {
                continue;
            }
            let anchor = g
                .neighbors(id)
                .into_iter()
                .find(|n| positions.contains_key(*n));
            if let Some(anchor) = anchor {
                let base = positions[anchor];
                positions.insert(id.to_string(), base + jitter(rng, cfg.ideal_edge_length * 0.6));
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
}

/// Whatever is left has no placed connection: spread it on an ellipse just
/// outside the bounding region of everything else.
fn place_periphery(g: &Graph, cfg: &LayoutConfig, positions: &mut Positions) {
    let remaining: Vec<NodeId> = g
        .node_ids()
        .filter(|id| !positions.contains_key(*id))
        .map(str::to_string)
        .collect();
    if remaining.is_empty() {
        return;
    }

    let (center, rx, ry) = match crate::geom::bounding_rect(positions.values().copied()) {
        Some(rect) => {
            let margin = cfg.ideal_edge_length * 1.5;
            let c = rect.center();
            (
                c,
                rect.width() / 2.0 + margin,
                rect.height() / 2.0 + margin,
            )
        }
        None => {
            let r = cfg.ideal_edge_length;
            (point(0.0, 0.0), r, r)
        }
    };

    for (i, id) in remaining.iter().enumerate() {
        let a = i as f64 * TAU / remaining.len() as f64;
        positions.insert(
            id.clone(),
            center + vector(rx * a.cos(), ry * a.sin()),
        );
    }
}

fn jitter(rng: &mut ChaCha8Rng, scale: f64) -> crate::geom::Vector {
    vector(
        rng.gen_range(-1.0..1.0) * scale,
        rng.gen_range(-1.0..1.0) * scale,
    )
}
