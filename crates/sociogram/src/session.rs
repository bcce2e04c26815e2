//! Session-local interaction state.
//!
//! One owned struct is the source of truth for what forces apply; the layout
//! side never sees it directly, only the [`Constraints`] snapshot taken at
//! the start of a pass. Everything here except pins and the clustering
//! toggle is reconstructed from the live graph on next load.

use crate::cluster::CollapsedCluster;
use crate::merge::MergeProposal;
use crate::selection::Selection;
use rustc_hash::{FxHashMap, FxHashSet};
use sociogram_graph::{EdgeType, Graph, NodeId};
use sociogram_layout::{Constraints, LayoutConfig};
use sociogram_layout::geom::Point;

/// Per-bridge pull bookkeeping: which nodes are being drawn in, and where
/// they were before the pull (needed so a release can be judged against the
/// pre-pull picture, not to restore it exactly).
#[derive(Debug, Clone, Default)]
pub struct PullRecord {
    pub pulled: Vec<NodeId>,
    pub origins: FxHashMap<NodeId, Point>,
}

#[derive(Debug, Default)]
pub struct SessionState {
    pub selection: Selection,
    /// Pinned nodes: excluded from simulation, forces still react to them.
    pub pins: FxHashMap<NodeId, Point>,
    /// Nodes whose position the pointer owns right now.
    pub dragged: FxHashSet<NodeId>,
    /// Active pulls keyed by bridge id. At most one per bridge.
    pub pulls: FxHashMap<NodeId, PullRecord>,
    /// Members excluded from their family cluster's containment force.
    pub detached: FxHashSet<NodeId>,
    /// Collapse records keyed by cluster key, for lossless expand.
    pub collapsed: FxHashMap<NodeId, CollapsedCluster>,
    pub clustering_enabled: bool,
    /// Ghost merge awaiting confirmation; `None` between flows.
    pub merge: Option<MergeProposal>,
}

impl SessionState {
    /// Read-only snapshot handed to the layout side for one pass.
    pub fn constraints(&self, g: &Graph, cfg: &LayoutConfig) -> Constraints {
        let mut cons = Constraints {
            pinned: self.pins.clone(),
            dragged: self.dragged.clone(),
            ..Constraints::default()
        };

        for (bridge, record) in &self.pulls {
            for id in &record.pulled {
                cons.pull_targets.insert(id.clone(), bridge.clone());
                cons.attraction_scale
                    .insert(id.clone(), cfg.pull_attraction_scale);
            }
        }

        if self.clustering_enabled {
            for component in g.components_by_type(EdgeType::Family, 2) {
                let group: Vec<NodeId> = component
                    .into_iter()
                    .filter(|id| !self.detached.contains(id))
                    .collect();
                if group.len() >= 2 {
                    cons.family_groups.push(group);
                }
            }
        }
        cons
    }

    /// Drops references to nodes that are no longer in the graph.
    pub fn retain_nodes(&mut self, g: &Graph) {
        self.selection.retain_nodes(g);
        self.pins.retain(|id, _| g.has_node(id));
        self.dragged.retain(|id| g.has_node(id));
        self.detached.retain(|id| g.has_node(id));
        self.pulls.retain(|bridge, record| {
            if !g.has_node(bridge) {
                return false;
            }
            record.pulled.retain(|id| g.has_node(id));
            record.origins.retain(|id, _| g.has_node(id));
            !record.pulled.is_empty()
        });
        if let Some(m) = &self.merge
            && (!g.has_node(&m.ghost) || !g.has_node(&m.target))
        {
            self.merge = None;
        }
    }
}
