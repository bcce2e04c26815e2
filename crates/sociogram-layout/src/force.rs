//! Force-directed refinement: phase 3 of the pipeline.
//!
//! Inverse-square repulsion (all-pairs, or Barnes–Hut above the threshold),
//! spring attraction along edges toward a type-specific rest length, weak
//! centering gravity, family containment, velocity damping, and collision
//! push-out, under a linearly decaying temperature cap.
//!
//! The same pass serves the full pipeline, the incremental updater (hot set
//! restriction), drag re-heat, and pull settling; the differences live
//! entirely in [`ForceOptions`] and [`Constraints`].

use crate::barnes_hut::QuadTree;
use crate::config::LayoutConfig;
use crate::constraints::{CancelToken, Constraints};
use crate::geom::{Point, Vector, vector};
use crate::Positions;
use rustc_hash::{FxHashMap, FxHashSet};
use sociogram_graph::{Graph, NodeId};

#[derive(Debug, Clone, Default)]
pub struct ForceOptions {
    pub iterations: usize,
    pub start_temp: f64,
    pub end_temp: f64,
    /// When set, only these nodes move; everything else still exerts forces.
    pub hot: Option<FxHashSet<NodeId>>,
}

impl ForceOptions {
    /// Full-pipeline refinement: everything moves, full temperature ramp.
    pub fn full(cfg: &LayoutConfig) -> Self {
        Self {
            iterations: cfg.force_iterations,
            start_temp: cfg.temperature,
            end_temp: cfg.temperature * 0.02,
            hot: None,
        }
    }

    /// Low-temperature polish over the whole graph (re-equilibration).
    pub fn requilibrate(cfg: &LayoutConfig) -> Self {
        Self {
            iterations: cfg.incremental_iterations,
            start_temp: cfg.temperature * 0.25,
            end_temp: cfg.temperature * 0.02,
            hot: None,
        }
    }

    /// Bounded local pass over a hot set.
    pub fn incremental(cfg: &LayoutConfig, hot: FxHashSet<NodeId>) -> Self {
        Self {
            iterations: cfg.incremental_iterations,
            start_temp: cfg.temperature * 0.5,
            end_temp: cfg.temperature * 0.02,
            hot: Some(hot),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ForceReport {
    pub iterations: usize,
}

struct SimState {
    ids: Vec<NodeId>,
    index: FxHashMap<NodeId, usize>,
    pos: Vec<Point>,
    vel: Vec<Vector>,
    radius: Vec<f64>,
    mass: Vec<f64>,
    /// Pinned, dragged, or outside the hot set: contributes, never moves.
    frozen: Vec<bool>,
    scale: Vec<f64>,
}

impl SimState {
    fn build(g: &Graph, positions: &Positions, cfg: &LayoutConfig, cons: &Constraints, opts: &ForceOptions) -> Self {
        let ids: Vec<NodeId> = g.node_ids().map(str::to_string).collect();
        let index: FxHashMap<NodeId, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        let pos: Vec<Point> = ids.iter().map(|id| positions[id]).collect();
        let radius: Vec<f64> = ids
            .iter()
            .map(|id| {
                let w = g.node(id).map(|n| n.weight).unwrap_or(1.0);
                cfg.node_radius * w.max(0.25).sqrt().clamp(0.75, 2.0)
            })
            .collect();
        let mass: Vec<f64> = ids
            .iter()
            .map(|id| g.node(id).map(|n| n.weight.max(0.25)).unwrap_or(1.0))
            .collect();
        let frozen: Vec<bool> = ids
            .iter()
            .map(|id| {
                cons.is_fixed(id)
                    || opts
                        .hot
                        .as_ref()
                        .is_some_and(|hot| !hot.contains(id.as_str()))
            })
            .collect();
        let scale: Vec<f64> = ids.iter().map(|id| cons.attraction_scale_of(id)).collect();
        let n = ids.len();

        Self {
            ids,
            index,
            pos,
            vel: vec![vector(0.0, 0.0); n],
            radius,
            mass,
            frozen,
            scale,
        }
    }
}

/// Runs the force pass and writes final positions back into `positions`.
/// Returns `None` on cancellation; the caller discards partial movement.
pub fn refine(
    g: &Graph,
    positions: &mut Positions,
    cfg: &LayoutConfig,
    cons: &Constraints,
    opts: &ForceOptions,
    cancel: &CancelToken,
) -> Option<ForceReport> {
    let n = g.node_count();
    if n < 2 || opts.iterations == 0 {
        return Some(ForceReport { iterations: 0 });
    }

    let mut sim = SimState::build(g, positions, cfg, cons, opts);
    let mut forces: Vec<Vector> = vec![vector(0.0, 0.0); n];

    for it in 0..opts.iterations {
        if it % cfg.cancel_check_interval.max(1) == 0 && cancel.is_cancelled() {
            return None;
        }

        let progress = it as f64 / opts.iterations as f64;
        let temp = opts.start_temp + (opts.end_temp - opts.start_temp) * progress;

        for f in &mut forces {
            *f = vector(0.0, 0.0);
        }

        accumulate_repulsion(&sim, cfg, &mut forces);
        accumulate_springs(g, &sim, cfg, cons, &mut forces);
        accumulate_gravity(&sim, cfg, &mut forces);
        accumulate_containment(&sim, cfg, cons, &mut forces);

        for i in 0..n {
            if sim.frozen[i] {
                sim.vel[i] = vector(0.0, 0.0);
                continue;
            }
            sim.vel[i] = (sim.vel[i] + forces[i] / sim.mass[i]) * cfg.damping;
            let mut disp = sim.vel[i];
            let len = disp.length();
            if len > temp {
                disp = disp / len * temp;
            }
            sim.pos[i] += disp;
        }

        resolve_collisions(&mut sim);
    }

    for (i, id) in sim.ids.iter().enumerate() {
        positions.insert(id.clone(), sim.pos[i]);
    }
    Some(ForceReport {
        iterations: opts.iterations,
    })
}

fn accumulate_repulsion(sim: &SimState, cfg: &LayoutConfig, forces: &mut [Vector]) {
    let n = sim.pos.len();
    if n > cfg.barnes_hut_threshold {
        let tree = QuadTree::build(&sim.pos, &sim.mass);
        for i in 0..n {
            if sim.frozen[i] {
                continue;
            }
            forces[i] += tree.repulsion_at(sim.pos[i], cfg.barnes_hut_theta, cfg.repulsion)
                * sim.mass[i];
        }
        return;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            // Forces on frozen nodes are discarded at integration, so a pair
            // with both sides frozen contributes nothing.
            if sim.frozen[i] && sim.frozen[j] {
                continue;
            }
            let delta = sim.pos[i] - sim.pos[j];
            let dist = delta.length().max(1.0);
            let f = delta / dist * (cfg.repulsion * sim.mass[i] * sim.mass[j] / (dist * dist));
            forces[i] += f;
            forces[j] -= f;
        }
    }
}

fn accumulate_springs(
    g: &Graph,
    sim: &SimState,
    cfg: &LayoutConfig,
    cons: &Constraints,
    forces: &mut [Vector],
) {
    for edge in g.edges() {
        let (Some(&i), Some(&j)) = (sim.index.get(&edge.a), sim.index.get(&edge.b)) else {
            continue;
        };
        let delta = sim.pos[j] - sim.pos[i];
        let dist = delta.length().max(1e-6);
        let stretch = dist - cfg.rest_length(edge.ty);
        let f = delta / dist * (cfg.spring * edge.weight * stretch);
        forces[i] += f * sim.scale[i];
        forces[j] -= f * sim.scale[j];
    }

    // Temporary pull springs dominate the (scaled-down) ordinary attraction.
    for (puller, bridge) in &cons.pull_targets {
        let (Some(&i), Some(&b)) = (sim.index.get(puller), sim.index.get(bridge)) else {
            continue;
        };
        let delta = sim.pos[b] - sim.pos[i];
        let dist = delta.length().max(1e-6);
        let rest = sim.radius[i] + sim.radius[b] + cfg.node_radius * 2.0;
        let stretch = dist - rest;
        forces[i] += delta / dist * (cfg.spring * cfg.pull_strength * stretch);
    }
}

fn accumulate_gravity(sim: &SimState, cfg: &LayoutConfig, forces: &mut [Vector]) {
    let mut centroid = vector(0.0, 0.0);
    for p in &sim.pos {
        centroid += p.to_vector();
    }
    centroid /= sim.pos.len() as f64;

    for i in 0..sim.pos.len() {
        forces[i] += (centroid - sim.pos[i].to_vector()) * cfg.gravity;
    }
}

fn accumulate_containment(
    sim: &SimState,
    cfg: &LayoutConfig,
    cons: &Constraints,
    forces: &mut [Vector],
) {
    for group in &cons.family_groups {
        let members: Vec<usize> = group
            .iter()
            .filter_map(|id| sim.index.get(id).copied())
            .collect();
        if members.len() < 2 {
            continue;
        }
        let mut centroid = vector(0.0, 0.0);
        for &i in &members {
            centroid += sim.pos[i].to_vector();
        }
        centroid /= members.len() as f64;
        for &i in &members {
            forces[i] += (centroid - sim.pos[i].to_vector()) * cfg.containment;
        }
    }
}

/// Pairwise minimum-separation push-out over a uniform grid; only the
/// movable side of a pair gives way.
fn resolve_collisions(sim: &mut SimState) {
    let n = sim.pos.len();
    let max_r = sim.radius.iter().copied().fold(0.0_f64, f64::max);
    if max_r <= 0.0 {
        return;
    }
    let cell = max_r * 2.0;

    let mut grid: FxHashMap<(i64, i64), Vec<usize>> = FxHashMap::default();
    for i in 0..n {
        let key = (
            (sim.pos[i].x / cell).floor() as i64,
            (sim.pos[i].y / cell).floor() as i64,
        );
        grid.entry(key).or_default().push(i);
    }

    for i in 0..n {
        let key = (
            (sim.pos[i].x / cell).floor() as i64,
            (sim.pos[i].y / cell).floor() as i64,
        );
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = grid.get(&(key.0 + dx, key.1 + dy)) else {
                    continue;
                };
                for &j in bucket {
                    if j <= i {
                        continue;
                    }
                    let min_sep = sim.radius[i] + sim.radius[j];
                    let delta = sim.pos[i] - sim.pos[j];
                    let dist = delta.length();
                    if dist >= min_sep || dist < 1e-9 {
                        continue;
                    }
                    let push = delta / dist * ((min_sep - dist) / 2.0);
                    match (sim.frozen[i], sim.frozen[j]) {
                        (false, false) => {
                            sim.pos[i] += push;
                            sim.pos[j] -= push;
                        }
                        (false, true) => sim.pos[i] += push * 2.0,
                        (true, false) => sim.pos[j] -= push * 2.0,
                        (true, true) => {}
                    }
                }
            }
        }
    }
}
