//! Family clustering: derived clusters, collapse to composite nodes, and
//! lossless expand.
//!
//! Clusters are always recomputed from `family`-typed components; only the
//! collapse records and the per-session detached overrides are stored.

use rustc_hash::FxHashMap;
use sociogram_graph::{Edge, EdgeType, Graph, Node, NodeId, NodeKind};
use sociogram_layout::Positions;
use sociogram_layout::geom::{Point, point};

/// How member edge weights combine when a collapse folds several edges to
/// the same (neighbor, type) pair into one composite edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightMergePolicy {
    /// The strongest member tie wins.
    #[default]
    Max,
    /// Ties accumulate.
    Sum,
}

impl WeightMergePolicy {
    fn combine(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Max => a.max(b),
            Self::Sum => a + b,
        }
    }
}

/// One derived family cluster. The key is the first member in graph
/// insertion order, which is stable for a given graph.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyCluster {
    pub key: NodeId,
    pub members: Vec<NodeId>,
}

/// Family components with at least two members, keyed deterministically.
pub fn derive(g: &Graph) -> Vec<FamilyCluster> {
    g.components_by_type(EdgeType::Family, 2)
        .into_iter()
        .map(|members| FamilyCluster {
            key: members[0].clone(),
            members,
        })
        .collect()
}

/// Everything needed to reverse a collapse exactly: the member nodes, every
/// edge that touched a member, and where the members sat.
#[derive(Debug, Clone)]
pub struct CollapsedCluster {
    pub composite_id: NodeId,
    pub members: Vec<Node>,
    pub edges: Vec<Edge>,
    pub member_positions: Vec<(NodeId, Point)>,
}

/// Replaces a cluster's members with one composite node whose external edge
/// set is the deduplicated union of the members' external edges. Returns the
/// record needed for [`expand`]; `None` if a member id is missing.
pub fn collapse(
    g: &mut Graph,
    positions: &mut Positions,
    cluster: &FamilyCluster,
    policy: WeightMergePolicy,
) -> Option<CollapsedCluster> {
    let members: Vec<Node> = cluster
        .members
        .iter()
        .map(|id| g.node(id).cloned())
        .collect::<Option<_>>()?;
    let member_set: rustc_hash::FxHashSet<&str> =
        cluster.members.iter().map(String::as_str).collect();

    let edges: Vec<Edge> = g
        .edges()
        .filter(|e| member_set.contains(e.a.as_str()) || member_set.contains(e.b.as_str()))
        .cloned()
        .collect();

    // External edges fold per (neighbor, type); insertion order of the first
    // occurrence decides the composite's edge order.
    let mut folded: indexmap::IndexMap<(NodeId, EdgeType), f64> = indexmap::IndexMap::new();
    for e in &edges {
        let (inside_a, inside_b) = (
            member_set.contains(e.a.as_str()),
            member_set.contains(e.b.as_str()),
        );
        if inside_a && inside_b {
            continue;
        }
        let neighbor = if inside_a { e.b.clone() } else { e.a.clone() };
        folded
            .entry((neighbor, e.ty))
            .and_modify(|w| *w = policy.combine(*w, e.weight))
            .or_insert(e.weight);
    }

    let member_positions: Vec<(NodeId, Point)> = cluster
        .members
        .iter()
        .filter_map(|id| positions.get(id).map(|&p| (id.clone(), p)))
        .collect();
    let centroid = centroid_of(&member_positions);

    let composite_id = format!("family:{}", cluster.key);
    let weight: f64 = members.iter().map(|n| n.weight).sum();
    for id in &cluster.members {
        g.remove_node(id);
        positions.remove(id);
    }
    g.add_node(Node {
        id: composite_id.clone(),
        kind: NodeKind::Composite {
            members: cluster.members.clone(),
        },
        weight,
    });
    for ((neighbor, ty), weight) in folded {
        if g.has_node(&neighbor) {
            let _ = g.add_edge(Edge::new(composite_id.clone(), neighbor, ty).with_weight(weight));
        }
    }
    positions.insert(composite_id.clone(), centroid);

    Some(CollapsedCluster {
        composite_id,
        members,
        edges,
        member_positions,
    })
}

/// Reverses a collapse: the composite disappears, members and their saved
/// edges come back, positioned around wherever the composite ended up.
pub fn expand(g: &mut Graph, positions: &mut Positions, record: CollapsedCluster) {
    let anchor = positions
        .get(&record.composite_id)
        .copied()
        .unwrap_or_else(|| centroid_of(&record.member_positions));
    let saved_centroid = centroid_of(&record.member_positions);

    g.remove_node(&record.composite_id);
    positions.remove(&record.composite_id);

    for node in record.members {
        g.add_node(node);
    }
    for edge in record.edges {
        // An external neighbor may have left the graph since the collapse.
        if g.has_node(&edge.a) && g.has_node(&edge.b) {
            let _ = g.add_edge(edge);
        }
    }
    for (id, saved) in record.member_positions {
        positions.insert(id, anchor + (saved - saved_centroid));
    }
}

fn centroid_of(entries: &[(NodeId, Point)]) -> Point {
    if entries.is_empty() {
        return point(0.0, 0.0);
    }
    let mut x = 0.0;
    let mut y = 0.0;
    for (_, p) in entries {
        x += p.x;
        y += p.y;
    }
    point(x / entries.len() as f64, y / entries.len() as f64)
}
