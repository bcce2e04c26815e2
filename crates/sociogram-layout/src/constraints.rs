use crate::geom::Point;
use rustc_hash::{FxHashMap, FxHashSet};
use sociogram_graph::NodeId;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Read-only snapshot of interaction state taken at the start of a pass.
///
/// The interaction side is the source of truth for what forces apply; the
/// layout side only ever sees one of these, so a sweep can never observe a
/// half-updated selection or pull.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    /// Pinned nodes: excluded from every phase, forces still react to them.
    pub pinned: FxHashMap<NodeId, Point>,
    /// Nodes whose position is owned by the pointer right now.
    pub dragged: FxHashSet<NodeId>,
    /// Active pulls: pulled node -> bridge it is being drawn toward.
    pub pull_targets: FxHashMap<NodeId, NodeId>,
    /// Per-node scaling of ordinary attractive forces (pulled nodes run at
    /// a reduced factor so the pull dominates without snapping edges).
    pub attraction_scale: FxHashMap<NodeId, f64>,
    /// Family containment groups, already filtered for detached members and
    /// the clustering toggle. Empty when clustering is off.
    pub family_groups: Vec<Vec<NodeId>>,
}

impl Constraints {
    /// True when the simulation must not move this node.
    pub fn is_fixed(&self, id: &str) -> bool {
        self.pinned.contains_key(id) || self.dragged.contains(id)
    }

    pub fn attraction_scale_of(&self, id: &str) -> f64 {
        self.attraction_scale.get(id).copied().unwrap_or(1.0)
    }
}

/// Cooperative cancellation flag shared between the requesting side and an
/// in-flight pipeline run. Checked between iteration batches, never mid-sweep.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
