//! Relationship graph container used by the sociogram engine.
//!
//! Nodes and edges are stored flatly and referenced by id, never by pointer,
//! so arbitrary cycles across edge types are fine. Iteration order is always
//! insertion order, which keeps every traversal built on top of this crate
//! deterministic.

#![forbid(unsafe_code)]

mod distance;
mod error;
mod graph;

pub use distance::{DistanceMatrix, UNREACHABLE};
pub use error::{GraphError, Result};
pub use graph::Graph;

use rustc_hash::FxBuildHasher;

pub(crate) type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
pub(crate) type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Opaque node identity, supplied by the embedding application.
pub type NodeId = String;

/// What a node stands for.
///
/// A `Ghost` is a placeholder for an unresolved person-mention and is a merge
/// candidate; a `Composite` stands in for a collapsed family cluster and
/// remembers the member ids it summarizes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    Real,
    Ghost,
    Composite {
        members: Vec<NodeId>,
    },
}

impl NodeKind {
    pub fn is_ghost(&self) -> bool {
        matches!(self, Self::Ghost)
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite { .. })
    }
}

/// A person or entity in the relationship graph.
///
/// `weight` is an opaque relative size driver (interaction strength); the
/// engine only ever compares it, it never interprets it.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub weight: f64,
}

impl Node {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Real,
            weight: 1.0,
        }
    }

    pub fn ghost(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Ghost,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Closed set of relationship kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeType {
    Family,
    Business,
    Referral,
    RecruitingTree,
    CoAttendance,
    Communication,
    MentionTogether,
}

impl EdgeType {
    pub const ALL: [EdgeType; 7] = [
        EdgeType::Family,
        EdgeType::Business,
        EdgeType::Referral,
        EdgeType::RecruitingTree,
        EdgeType::CoAttendance,
        EdgeType::Communication,
        EdgeType::MentionTogether,
    ];
}

/// Undirected typed edge between two nodes.
///
/// Several edges of *different* types may connect the same pair; each keeps
/// its own weight and contributes its own attraction in the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    pub ty: EdgeType,
    pub weight: f64,
}

impl Edge {
    pub fn new(a: impl Into<NodeId>, b: impl Into<NodeId>, ty: EdgeType) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            ty,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn touches(&self, id: &str) -> bool {
        self.a == id || self.b == id
    }

    /// The endpoint opposite `id`. Callers must pass one of the endpoints.
    pub fn other(&self, id: &str) -> &str {
        if self.a == id { &self.b } else { &self.a }
    }
}
