use crate::{Edge, EdgeType, GraphError, HashMap, HashSet, Node, NodeId, Result};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Node/edge container with insertion-ordered iteration.
///
/// The adjacency index maps node ids to edge indices in insertion order, so
/// `neighbors` and every BFS layered on it visit nodes in a stable order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node, FxBuildHasher>,
    edges: Vec<Edge>,
    adj: HashMap<NodeId, Vec<usize>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Inserts a node, replacing any existing node with the same id.
    pub fn add_node(&mut self, node: Node) {
        self.adj.entry(node.id.clone()).or_default();
        self.nodes.insert(node.id.clone(), node);
    }

    /// Adds an edge after validating the graph invariants: both endpoints
    /// must exist and self-edges are rejected. Invalid edges are reported,
    /// never silently dropped.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        if edge.a == edge.b {
            return Err(GraphError::SelfEdge { id: edge.a.clone() });
        }
        for end in [&edge.a, &edge.b] {
            if !self.nodes.contains_key(end) {
                return Err(GraphError::MissingEndpoint {
                    a: edge.a.clone(),
                    b: edge.b.clone(),
                    missing: end.clone(),
                });
            }
        }

        let idx = self.edges.len();
        self.adj.entry(edge.a.clone()).or_default().push(idx);
        self.adj.entry(edge.b.clone()).or_default().push(idx);
        self.edges.push(edge);
        Ok(())
    }

    /// Removes a node and every incident edge. Returns false if absent.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if self.nodes.shift_remove(id).is_none() {
            return false;
        }
        self.adj.remove(id);
        self.edges.retain(|e| !e.touches(id));
        self.rebuild_adjacency();
        true
    }

    /// Edges incident to `id`, in insertion order.
    pub fn edges_of<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Edge> {
        let indices = self.adj.get(id).map(Vec::as_slice).unwrap_or_default();
        indices.iter().map(|&i| &self.edges[i])
    }

    pub fn degree(&self, id: &str) -> usize {
        self.adj.get(id).map(Vec::len).unwrap_or(0)
    }

    /// Distinct neighbors of `id` in first-seen edge order.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::default();
        let mut out = Vec::new();
        for edge in self.edges_of(id) {
            let other = edge.other(id);
            if seen.insert(other) {
                out.push(other);
            }
        }
        out
    }

    /// Connected components induced by edges of a single type, restricted to
    /// components with at least `min_size` members. Components are ordered by
    /// their first node's insertion position; members are in BFS visit order.
    pub fn components_by_type(&self, ty: EdgeType, min_size: usize) -> Vec<Vec<NodeId>> {
        let mut visited: HashSet<&str> = HashSet::default();
        let mut out = Vec::new();

        for start in self.nodes.keys() {
            if visited.contains(start.as_str()) {
                continue;
            }
            visited.insert(start);

            let mut component = vec![start.clone()];
            let mut queue = std::collections::VecDeque::from([start.as_str()]);
            while let Some(v) = queue.pop_front() {
                for edge in self.edges_of(v) {
                    if edge.ty != ty {
                        continue;
                    }
                    let w = edge.other(v);
                    if visited.insert(w) {
                        component.push(w.to_string());
                        queue.push_back(w);
                    }
                }
            }

            if component.len() >= min_size {
                out.push(component);
            }
        }
        out
    }

    /// Moves every edge of `from` onto `to`, then deletes `from`.
    ///
    /// This is the ghost-merge rewrite and the only operation that mutates
    /// edge endpoints in place. Where `to` already shares an edge of the same
    /// type with a neighbor of `from`, the two collapse into one edge with
    /// `weight = max` rather than duplicating.
    pub fn rewire(&mut self, from: &str, to: &str) -> bool {
        if !self.has_node(from) || !self.has_node(to) || from == to {
            return false;
        }

        // (neighbor, type) pairs `to` already covers.
        let mut covered: HashMap<(NodeId, EdgeType), usize> = HashMap::default();
        for &i in self.adj.get(to).map(Vec::as_slice).unwrap_or_default() {
            let other = self.edges[i].other(to).to_string();
            covered.insert((other, self.edges[i].ty), i);
        }

        let moved: Vec<usize> = self.adj.get(from).cloned().unwrap_or_default();
        let mut dropped: HashSet<usize> = HashSet::default();
        for i in moved {
            let other = self.edges[i].other(from).to_string();
            if other == to {
                // Would become a self-edge; fold its weight into nothing.
                dropped.insert(i);
                continue;
            }
            let ty = self.edges[i].ty;
            if let Some(&j) = covered.get(&(other.clone(), ty)) {
                let w = self.edges[i].weight;
                self.edges[j].weight = self.edges[j].weight.max(w);
                dropped.insert(i);
            } else {
                let edge = &mut self.edges[i];
                if edge.a == from {
                    edge.a = to.to_string();
                } else {
                    edge.b = to.to_string();
                }
                covered.insert((other, ty), i);
            }
        }

        if !dropped.is_empty() {
            self.edges = std::mem::take(&mut self.edges)
                .into_iter()
                .enumerate()
                .filter_map(|(i, e)| if dropped.contains(&i) { None } else { Some(e) })
                .collect();
        }

        self.nodes.shift_remove(from);
        self.adj.remove(from);
        self.rebuild_adjacency();
        true
    }

    fn rebuild_adjacency(&mut self) {
        for indices in self.adj.values_mut() {
            indices.clear();
        }
        for (i, edge) in self.edges.iter().enumerate() {
            self.adj.entry(edge.a.clone()).or_default().push(i);
            self.adj.entry(edge.b.clone()).or_default().push(i);
        }
    }
}
