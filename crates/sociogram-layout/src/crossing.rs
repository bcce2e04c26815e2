//! Edge-crossing reduction: phase 4 of the pipeline.
//!
//! Short-range repulsion between each node and every edge it is not an
//! endpoint of. Runs at low temperature so it polishes the force layout
//! rather than restructuring it.

use crate::config::LayoutConfig;
use crate::constraints::{CancelToken, Constraints};
use crate::geom::{Point, closest_on_segment, vector};
use crate::Positions;
use rustc_hash::FxHashMap;
use sociogram_graph::{Graph, NodeId};

#[derive(Debug, Clone, Copy)]
pub struct CrossingReport {
    pub iterations: usize,
}

pub fn reduce(
    g: &Graph,
    positions: &mut Positions,
    cfg: &LayoutConfig,
    cons: &Constraints,
    cancel: &CancelToken,
) -> Option<CrossingReport> {
    let ids: Vec<NodeId> = g.node_ids().map(str::to_string).collect();
    if ids.len() < 3 || g.edge_count() == 0 {
        return Some(CrossingReport { iterations: 0 });
    }
    let index: FxHashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();
    let mut pos: Vec<Point> = ids.iter().map(|id| positions[id]).collect();
    let movable: Vec<bool> = ids.iter().map(|id| !cons.is_fixed(id)).collect();

    let reach = cfg.node_radius * 3.0;
    let temp = cfg.temperature * 0.1;

    for it in 0..cfg.crossing_iterations {
        if it % cfg.cancel_check_interval.max(1) == 0 && cancel.is_cancelled() {
            return None;
        }

        let mut nudges = vec![vector(0.0, 0.0); ids.len()];
        for edge in g.edges() {
            let (Some(&a), Some(&b)) = (index.get(edge.a.as_str()), index.get(edge.b.as_str()))
            else {
                continue;
            };
            for (i, id) in ids.iter().enumerate() {
                if i == a || i == b || edge.touches(id) {
                    continue;
                }
                let closest = closest_on_segment(pos[i], pos[a], pos[b]);
                let delta = pos[i] - closest;
                let dist = delta.length();
                if dist >= reach || dist < 1e-9 {
                    continue;
                }
                // Push grows as the node approaches the edge.
                nudges[i] += delta / dist * ((reach - dist) / reach * temp);
            }
        }

        for i in 0..ids.len() {
            if !movable[i] {
                continue;
            }
            let mut d = nudges[i];
            let len = d.length();
            if len > temp {
                d = d / len * temp;
            }
            pos[i] += d;
        }
    }

    for (i, id) in ids.iter().enumerate() {
        positions.insert(id.clone(), pos[i]);
    }
    Some(CrossingReport {
        iterations: cfg.crossing_iterations,
    })
}
