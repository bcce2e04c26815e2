//! The engine facade.
//!
//! Owns the graph, the position map, and the session state, and keeps them
//! consistent: every ingest or interaction command runs the appropriate
//! layout pass synchronously and refreshes the bridge index before
//! returning. Invalid commands are no-ops, never errors; only ingest
//! invariant violations produce an `Err`.

use crate::bridges::{self, BridgeInfo, Viewport};
use crate::cluster::{self, FamilyCluster, WeightMergePolicy};
use crate::error::{Error, Result};
use crate::merge::{self, MergeProposal, MergeScorer};
use crate::persist::{PersistedPin, PersistedState};
use crate::selection::{EdgeFilter, Selection};
use crate::session::{PullRecord, SessionState};
use rustc_hash::{FxHashMap, FxHashSet};
use sociogram_graph::{Edge, Graph, Node, NodeId};
use sociogram_layout::geom::{Point, Vector};
use sociogram_layout::{
    CancelToken, LayoutConfig, LayoutReport, Positions, force, full_layout, incremental, pull,
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub layout: LayoutConfig,
    /// How collapse folds parallel member edges to the same neighbor.
    pub weight_merge: WeightMergePolicy,
    /// Ingest deltas touching more nodes than this trigger a full layout
    /// instead of an incremental pass.
    pub incremental_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            weight_merge: WeightMergePolicy::default(),
            incremental_limit: 8,
        }
    }
}

/// Synchronous, single-threaded engine core. Embedders that need layout off
/// the input thread wrap these same entry points in the
/// [`Scheduler`](crate::scheduler::Scheduler).
#[derive(Default)]
pub struct Engine {
    cfg: EngineConfig,
    graph: Graph,
    positions: Positions,
    session: SessionState,
    viewport: Option<Viewport>,
    bridges: FxHashMap<NodeId, BridgeInfo>,
    report: Option<LayoutReport>,
    scorer: Option<MergeScorer>,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Queries. All read-only snapshots; the renderer never mutates through
    // these.

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn selection(&self) -> &Selection {
        &self.session.selection
    }

    pub fn bridges(&self) -> &FxHashMap<NodeId, BridgeInfo> {
        &self.bridges
    }

    pub fn pulls(&self) -> &FxHashMap<NodeId, PullRecord> {
        &self.session.pulls
    }

    pub fn pins(&self) -> &FxHashMap<NodeId, Point> {
        &self.session.pins
    }

    /// Family clusters currently derivable from the graph. Collapsed
    /// clusters' members are out of the graph, so they do not reappear here.
    pub fn clusters(&self) -> Vec<FamilyCluster> {
        cluster::derive(&self.graph)
    }

    pub fn clustering_enabled(&self) -> bool {
        self.session.clustering_enabled
    }

    pub fn merge_proposal(&self) -> Option<&MergeProposal> {
        self.session.merge.as_ref()
    }

    /// Diagnostics from the most recent full layout.
    pub fn report(&self) -> Option<&LayoutReport> {
        self.report.as_ref()
    }

    // ------------------------------------------------------------------
    // Ingest.

    /// Replaces the graph with a fresh node/edge batch. Small deltas go
    /// through the incremental updater; anything larger, or the first
    /// ingest, runs the full pipeline.
    pub fn set_graph(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> Result<()> {
        let mut next = Graph::new();
        for node in nodes {
            if next.has_node(&node.id) {
                return Err(Error::DuplicateNode { id: node.id });
            }
            next.add_node(node);
        }
        for edge in edges {
            next.add_edge(edge)?;
        }

        let changed = self.changed_nodes(&next);
        self.graph = next;
        self.session.retain_nodes(&self.graph);
        let graph = &self.graph;
        self.session
            .collapsed
            .retain(|_, record| graph.has_node(&record.composite_id));

        if self.positions.is_empty() || changed.len() > self.cfg.incremental_limit {
            debug!(nodes = self.graph.node_count(), "ingest: full layout");
            self.relayout_full();
        } else {
            debug!(changed = changed.len(), "ingest: incremental pass");
            self.relayout_incremental(changed);
        }
        Ok(())
    }

    /// Nodes whose membership or incident edges differ between the current
    /// graph and `next`. Removed nodes are represented by their surviving
    /// neighbors, which is what the incremental pass can still move.
    fn changed_nodes(&self, next: &Graph) -> FxHashSet<NodeId> {
        let mut changed: FxHashSet<NodeId> = FxHashSet::default();

        for id in next.node_ids() {
            if !self.graph.has_node(id) {
                changed.insert(id.to_string());
            }
        }
        for id in self.graph.node_ids() {
            if !next.has_node(id) {
                for n in self.graph.neighbors(id) {
                    if next.has_node(n) {
                        changed.insert(n.to_string());
                    }
                }
            }
        }

        let key = |e: &Edge| {
            let (a, b) = if e.a <= e.b { (&e.a, &e.b) } else { (&e.b, &e.a) };
            (a.clone(), b.clone(), e.ty, e.weight.to_bits())
        };
        let old: FxHashSet<_> = self.graph.edges().map(key).collect();
        let new: FxHashSet<_> = next.edges().map(key).collect();
        for (a, b, _, _) in old.symmetric_difference(&new) {
            for end in [a, b] {
                if next.has_node(end) {
                    changed.insert(end.clone());
                }
            }
        }
        changed
    }

    // ------------------------------------------------------------------
    // Selection.

    /// Selects exactly one node, clearing the rest of the selection.
    pub fn select(&mut self, id: &str) {
        if self.graph.has_node(id) {
            self.session.selection.reset_to(id);
        }
    }

    /// Grows the selection from `id` by a deterministic BFS of `hops`
    /// (1 or 2) along edges matching `filter`.
    pub fn expand(&mut self, id: &str, hops: u32, filter: EdgeFilter) {
        if self.graph.has_node(id) && (1..=2).contains(&hops) {
            self.session.selection.expand(&self.graph, id, hops, filter);
        }
    }

    /// Flips one node in or out of the selection without re-expanding.
    pub fn toggle(&mut self, id: &str) {
        if self.graph.has_node(id) {
            self.session.selection.toggle(id);
        }
    }

    // ------------------------------------------------------------------
    // Pinning and dragging.

    pub fn pin(&mut self, id: &str, pos: Point) {
        if !self.graph.has_node(id) {
            return;
        }
        self.session.pins.insert(id.to_string(), pos);
        self.positions.insert(id.to_string(), pos);
        self.refresh_bridges();
    }

    pub fn unpin(&mut self, id: &str) {
        self.session.pins.remove(id);
    }

    /// Moves `id` (and, if it is selected, the whole selection, preserving
    /// offsets) by `delta`. Dragged nodes bypass the simulation; their
    /// non-dragged neighbors are re-heated so they visibly react.
    pub fn drag(&mut self, id: &str, delta: Vector) {
        if !self.graph.has_node(id) {
            return;
        }
        if !self.session.selection.contains(id) {
            self.session.selection.reset_to(id);
        }
        let moving: Vec<NodeId> = self.session.selection.ids().map(str::to_string).collect();
        for m in &moving {
            if let Some(p) = self.positions.get_mut(m) {
                *p += delta;
            }
            if let Some(p) = self.session.pins.get_mut(m) {
                *p += delta;
            }
        }
        self.session.dragged = moving.iter().cloned().collect();

        let mut hot: FxHashSet<NodeId> = FxHashSet::default();
        for m in &moving {
            for n in self.graph.neighbors(m) {
                if !self.session.dragged.contains(n) {
                    hot.insert(n.to_string());
                }
            }
        }
        if !hot.is_empty() {
            let cons = self.session.constraints(&self.graph, &self.cfg.layout);
            let temp = self.cfg.layout.temperature * self.cfg.layout.reheat;
            let opts = force::ForceOptions {
                iterations: self.cfg.layout.incremental_iterations,
                start_temp: temp,
                end_temp: temp * 0.1,
                hot: Some(hot),
            };
            force::refine(
                &self.graph,
                &mut self.positions,
                &self.cfg.layout,
                &cons,
                &opts,
                &CancelToken::new(),
            );
        }
        self.refresh_bridges();
    }

    /// Ends a drag gesture: the moved nodes rejoin the simulation with one
    /// bounded settling pass around them.
    pub fn end_drag(&mut self) {
        if self.session.dragged.is_empty() {
            return;
        }
        let dragged = std::mem::take(&mut self.session.dragged);
        let hot = incremental::hot_set(&self.graph, dragged.iter().map(String::as_str));
        let cons = self.session.constraints(&self.graph, &self.cfg.layout);
        incremental::refine_hot(
            &self.graph,
            &mut self.positions,
            hot,
            &self.cfg.layout,
            &cons,
            &CancelToken::new(),
        );
        self.refresh_bridges();
    }

    // ------------------------------------------------------------------
    // Pull / release.

    /// Draws a bridge node's distant connections toward it with one animated
    /// settle. No-op for non-bridges and while a pull on this bridge is
    /// already active.
    pub fn pull(&mut self, bridge: &str) {
        if self.session.pulls.contains_key(bridge) {
            return;
        }
        let Some(info) = self.bridges.get(bridge) else {
            return;
        };
        let pulled = info.distant.clone();
        let origins: FxHashMap<NodeId, Point> = pulled
            .iter()
            .filter_map(|id| self.positions.get(id).map(|&p| (id.clone(), p)))
            .collect();
        debug!(bridge, pulled = pulled.len(), "pull");
        self.session
            .pulls
            .insert(bridge.to_string(), PullRecord { pulled, origins });

        let cons = self.session.constraints(&self.graph, &self.cfg.layout);
        pull::settle(
            &self.graph,
            &mut self.positions,
            &self.cfg.layout,
            &cons,
            &CancelToken::new(),
        );
        self.refresh_bridges();
    }

    /// Removes one bridge's temporary attraction and lets the affected nodes
    /// drift back to their current natural equilibrium. Other bridges'
    /// active pulls are untouched.
    pub fn release(&mut self, bridge: &str) {
        if self.session.pulls.remove(bridge).is_none() {
            return;
        }
        self.relax();
    }

    /// Clears every active pull.
    pub fn release_all(&mut self) {
        if self.session.pulls.is_empty() {
            return;
        }
        self.session.pulls.clear();
        self.relax();
    }

    fn relax(&mut self) {
        let cons = self.session.constraints(&self.graph, &self.cfg.layout);
        pull::relax(
            &self.graph,
            &mut self.positions,
            &self.cfg.layout,
            &cons,
            &CancelToken::new(),
        );
        self.refresh_bridges();
    }

    // ------------------------------------------------------------------
    // Family clustering.

    /// Toggles the family containment force and re-equilibrates so clusters
    /// visibly gather or loosen.
    pub fn toggle_clustering(&mut self) {
        self.session.clustering_enabled = !self.session.clustering_enabled;
        let cons = self.session.constraints(&self.graph, &self.cfg.layout);
        force::refine(
            &self.graph,
            &mut self.positions,
            &self.cfg.layout,
            &cons,
            &force::ForceOptions::requilibrate(&self.cfg.layout),
            &CancelToken::new(),
        );
        self.refresh_bridges();
    }

    /// Excludes one node from its family cluster's containment force for
    /// this session, without touching the underlying edges.
    pub fn detach_from_cluster(&mut self, id: &str) {
        if self.graph.has_node(id) {
            self.session.detached.insert(id.to_string());
        }
    }

    pub fn reattach_to_cluster(&mut self, id: &str) {
        self.session.detached.remove(id);
    }

    /// Collapses the family cluster keyed by `key` into a composite node.
    /// No-op for unknown keys and already-collapsed clusters.
    pub fn collapse_cluster(&mut self, key: &str) {
        if self.session.collapsed.contains_key(key) {
            return;
        }
        let Some(found) = self.clusters().into_iter().find(|c| c.key == key) else {
            return;
        };
        let Some(record) = cluster::collapse(
            &mut self.graph,
            &mut self.positions,
            &found,
            self.cfg.weight_merge,
        ) else {
            return;
        };
        debug!(key, members = found.members.len(), "cluster collapsed");
        let composite = record.composite_id.clone();
        self.session.collapsed.insert(key.to_string(), record);
        self.session.retain_nodes(&self.graph);
        self.settle_around([composite.as_str()]);
    }

    /// Restores a collapsed cluster's members and their saved edges.
    pub fn expand_cluster(&mut self, key: &str) {
        let Some(record) = self.session.collapsed.remove(key) else {
            return;
        };
        if !self.graph.has_node(&record.composite_id) {
            return;
        }
        let members: Vec<NodeId> = record.members.iter().map(|n| n.id.clone()).collect();
        cluster::expand(&mut self.graph, &mut self.positions, record);
        debug!(key, "cluster expanded");
        self.settle_around(members.iter().map(String::as_str));
    }

    // ------------------------------------------------------------------
    // Ghost merge.

    /// Installs the compatibility heuristic consulted at proposal time.
    pub fn set_merge_scorer(&mut self, scorer: MergeScorer) {
        self.scorer = Some(scorer);
    }

    /// Targets `target` as the merge candidate for `ghost`. No-op unless
    /// `ghost` is a ghost, `target` is a real node, and no other proposal
    /// is pending.
    pub fn propose_merge(&mut self, ghost: &str, target: &str) {
        if self.session.merge.is_some() || ghost == target {
            return;
        }
        let ghost_ok = self.graph.node(ghost).is_some_and(|n| n.kind.is_ghost());
        let target_ok = self
            .graph
            .node(target)
            .is_some_and(|n| !n.kind.is_ghost() && !n.kind.is_composite());
        if !ghost_ok || !target_ok {
            return;
        }
        let score = self
            .scorer
            .as_ref()
            .and_then(|s| s(&self.graph, ghost, target));
        debug!(ghost, target, "merge proposed");
        self.session.merge = Some(MergeProposal {
            ghost: ghost.to_string(),
            target: target.to_string(),
            score,
        });
    }

    /// Resolves the pending proposal: the ghost disappears, its edges rewire
    /// onto the target with max-weight dedupe. No-op with nothing pending.
    pub fn confirm_merge(&mut self) {
        let Some(proposal) = self.session.merge.take() else {
            return;
        };
        if !merge::resolve(&mut self.graph, &proposal) {
            return;
        }
        debug!(ghost = %proposal.ghost, target = %proposal.target, "merge resolved");
        self.positions.remove(&proposal.ghost);
        self.session.retain_nodes(&self.graph);
        self.settle_around([proposal.target.as_str()]);
    }

    /// Abandons the pending proposal; the ghost stays in the graph.
    pub fn cancel_merge(&mut self) {
        self.session.merge = None;
    }

    /// Removes a dismissed ghost and its edges outright.
    pub fn dismiss_ghost(&mut self, id: &str) {
        if !self.graph.node(id).is_some_and(|n| n.kind.is_ghost()) {
            return;
        }
        if self.session.merge.as_ref().is_some_and(|m| m.ghost == id) {
            self.session.merge = None;
        }
        let neighbors: Vec<NodeId> = self
            .graph
            .neighbors(id)
            .into_iter()
            .map(str::to_string)
            .collect();
        self.graph.remove_node(id);
        self.positions.remove(id);
        self.session.retain_nodes(&self.graph);
        self.settle_around(neighbors.iter().map(String::as_str));
    }

    // ------------------------------------------------------------------
    // Layout control.

    /// Discards current positions and reruns the full pipeline. Pins hold;
    /// pulls are cleared (their origins no longer mean anything).
    pub fn reset_layout(&mut self) {
        self.positions.clear();
        self.session.pulls.clear();
        self.relayout_full();
    }

    /// Updates the view region used by the bridge indexer.
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
        self.refresh_bridges();
    }

    // ------------------------------------------------------------------
    // Persistence boundary.

    pub fn export_persisted(&self) -> PersistedState {
        let mut pins: Vec<PersistedPin> = self
            .session
            .pins
            .iter()
            .map(|(id, p)| PersistedPin {
                id: id.clone(),
                x: p.x,
                y: p.y,
            })
            .collect();
        pins.sort_by(|a, b| a.id.cmp(&b.id));
        PersistedState {
            pins,
            clustering_enabled: self.session.clustering_enabled,
        }
    }

    /// Applies persisted pins and the clustering toggle, then reruns the
    /// full pipeline so the pins take effect.
    pub fn restore_persisted(&mut self, state: &PersistedState) {
        self.session.clustering_enabled = state.clustering_enabled;
        self.session.pins = state
            .pins
            .iter()
            .filter(|pin| self.graph.has_node(&pin.id))
            .map(|pin| (pin.id.clone(), sociogram_layout::geom::point(pin.x, pin.y)))
            .collect();
        if self.graph.node_count() > 0 {
            self.relayout_full();
        }
    }

    // ------------------------------------------------------------------
    // Internals.

    fn relayout_full(&mut self) {
        let cons = self.session.constraints(&self.graph, &self.cfg.layout);
        if let Some(result) = full_layout(&self.graph, &self.cfg.layout, &cons, &CancelToken::new())
        {
            self.positions = result.positions;
            self.report = Some(result.report);
        }
        self.refresh_bridges();
    }

    fn relayout_incremental(&mut self, changed: FxHashSet<NodeId>) {
        let hot = incremental::hot_set(&self.graph, changed.iter().map(String::as_str));
        let cons = self.session.constraints(&self.graph, &self.cfg.layout);
        incremental::refine_hot(
            &self.graph,
            &mut self.positions,
            hot,
            &self.cfg.layout,
            &cons,
            &CancelToken::new(),
        );
        self.refresh_bridges();
    }

    /// Bounded settle around a set of just-mutated nodes.
    fn settle_around<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let hot = incremental::hot_set(&self.graph, ids);
        let cons = self.session.constraints(&self.graph, &self.cfg.layout);
        incremental::refine_hot(
            &self.graph,
            &mut self.positions,
            hot,
            &self.cfg.layout,
            &cons,
            &CancelToken::new(),
        );
        self.refresh_bridges();
    }

    fn refresh_bridges(&mut self) {
        self.bridges = bridges::index(&self.graph, &self.positions, self.viewport.as_ref());
    }
}
