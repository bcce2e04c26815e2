use crate::{Graph, HashMap, NodeId};
use std::collections::VecDeque;

/// Sentinel for node pairs with no connecting path.
pub const UNREACHABLE: u32 = u32::MAX;

/// All-pairs shortest hop counts, built with one BFS per source node.
///
/// Dense `n * n` storage keyed by the graph's node insertion order. Rebuilt
/// from scratch for every full layout; incremental passes never consult it.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    hops: Vec<u32>,
    n: usize,
}

impl DistanceMatrix {
    pub fn build(g: &Graph) -> Self {
        let ids: Vec<NodeId> = g.node_ids().map(str::to_string).collect();
        let n = ids.len();
        let index: HashMap<NodeId, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut hops = vec![UNREACHABLE; n * n];
        let mut queue = VecDeque::new();
        for (src, id) in ids.iter().enumerate() {
            let row = &mut hops[src * n..(src + 1) * n];
            row[src] = 0;
            queue.clear();
            queue.push_back(id.as_str());
            while let Some(v) = queue.pop_front() {
                let dv = row[index[v]];
                for w in g.neighbors(v) {
                    let wi = index[w];
                    if row[wi] == UNREACHABLE {
                        row[wi] = dv + 1;
                        queue.push_back(w);
                    }
                }
            }
        }

        Self {
            ids,
            index,
            hops,
            n,
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Hop count by dense index; `UNREACHABLE` for disconnected pairs.
    pub fn hops_by_index(&self, i: usize, j: usize) -> u32 {
        self.hops[i * self.n + j]
    }

    pub fn hops(&self, a: &str, b: &str) -> Option<u32> {
        let (i, j) = (self.index_of(a)?, self.index_of(b)?);
        match self.hops_by_index(i, j) {
            UNREACHABLE => None,
            d => Some(d),
        }
    }
}
