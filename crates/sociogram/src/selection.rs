//! Selection by relational distance.
//!
//! A plain `select` targets one node; `expand` grows from an anchor by a
//! bounded breadth-first traversal restricted to an edge-type filter. The
//! traversal follows the graph's insertion-ordered adjacency, so the same
//! graph and anchor always produce the same selection in the same order.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use sociogram_graph::{EdgeType, Graph, NodeId};
use std::collections::VecDeque;

/// Edge-type restriction for hop expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeFilter {
    #[default]
    All,
    Family,
    Referral,
    Recruiting,
}

impl EdgeFilter {
    pub fn matches(self, ty: EdgeType) -> bool {
        match self {
            Self::All => true,
            Self::Family => ty == EdgeType::Family,
            Self::Referral => ty == EdgeType::Referral,
            Self::Recruiting => ty == EdgeType::RecruitingTree,
        }
    }
}

/// The selected node set plus the anchor that originated the last expansion.
///
/// The anchor drives ripple animation timing on the rendering side; it has
/// no effect on positions.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: IndexSet<NodeId, FxBuildHasher>,
    anchor: Option<NodeId>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Selected ids in the order they entered the selection.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.anchor = None;
    }

    /// Collapses the selection to a single node.
    pub fn reset_to(&mut self, id: &str) {
        self.ids.clear();
        self.ids.insert(id.to_string());
        self.anchor = Some(id.to_string());
    }

    /// Flips one node's membership without touching the rest.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.shift_remove(id) {
            self.ids.insert(id.to_string());
        } else if self.anchor.as_deref() == Some(id) {
            self.anchor = None;
        }
    }

    pub fn retain_nodes(&mut self, g: &Graph) {
        self.ids.retain(|id| g.has_node(id));
        if let Some(a) = &self.anchor
            && !g.has_node(a)
        {
            self.anchor = None;
        }
    }

    /// Replaces the selection with everything within `hops` of `anchor`
    /// along edges matching `filter`, in BFS visit order.
    pub fn expand(&mut self, g: &Graph, anchor: &str, hops: u32, filter: EdgeFilter) {
        self.ids.clear();
        self.anchor = Some(anchor.to_string());
        for id in reachable(g, anchor, hops, filter) {
            self.ids.insert(id);
        }
    }
}

/// Nodes within `hops` edge traversals of `start`, restricted to `filter`,
/// in deterministic BFS order. Includes `start` itself.
pub fn reachable(g: &Graph, start: &str, hops: u32, filter: EdgeFilter) -> Vec<NodeId> {
    let mut order = vec![start.to_string()];
    let mut depth: rustc_hash::FxHashMap<NodeId, u32> = rustc_hash::FxHashMap::default();
    depth.insert(start.to_string(), 0);

    let mut queue = VecDeque::from([start.to_string()]);
    while let Some(v) = queue.pop_front() {
        let d = depth[&v];
        if d == hops {
            continue;
        }
        for edge in g.edges_of(&v) {
            if !filter.matches(edge.ty) {
                continue;
            }
            let w = edge.other(&v);
            if !depth.contains_key(w) {
                depth.insert(w.to_string(), d + 1);
                order.push(w.to_string());
                queue.push_back(w.to_string());
            }
        }
    }
    order
}
