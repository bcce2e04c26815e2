//! Bridge indexing: flags nodes whose connections sit structurally far away.
//!
//! A node is a bridge when at least one neighbor is farther than three times
//! the viewport's average edge length, or outside the viewport entirely.
//! The index is metadata for badge rendering; nothing here moves a node.

use rustc_hash::FxHashMap;
use sociogram_graph::{Graph, NodeId};
use sociogram_layout::Positions;
use sociogram_layout::geom::{Point, Vector};

/// How far a neighbor must sit, in multiples of the average edge length,
/// before it counts as distant.
const DISTANT_FACTOR: f64 = 3.0;

/// Axis-aligned view region in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Point,
    pub half_extent: Vector,
}

impl Viewport {
    pub fn new(center: Point, half_extent: Vector) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        (p.x - self.center.x).abs() <= self.half_extent.x
            && (p.y - self.center.y).abs() <= self.half_extent.y
    }
}

/// Badge size bucket by distant-connection count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// 1-5 distant connections.
    Small,
    /// 6-15.
    Medium,
    /// 16 or more.
    Large,
}

impl SizeClass {
    pub fn classify(count: usize) -> Self {
        match count {
            0..=5 => Self::Small,
            6..=15 => Self::Medium,
            _ => Self::Large,
        }
    }
}

/// Per-bridge metadata: which neighbors are distant, and the badge bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeInfo {
    /// Distant neighbor ids in stable adjacency order.
    pub distant: Vec<NodeId>,
    pub class: SizeClass,
}

/// Average length of the edges whose endpoints are both in view. Falls back
/// to the global average when the viewport clips every edge; `None` when the
/// graph has no placeable edges at all.
fn average_edge_length(g: &Graph, positions: &Positions, viewport: Option<&Viewport>) -> Option<f64> {
    let lengths = |in_view_only: bool| {
        let mut total = 0.0;
        let mut count = 0usize;
        for edge in g.edges() {
            let (Some(&pa), Some(&pb)) = (positions.get(&edge.a), positions.get(&edge.b)) else {
                continue;
            };
            if in_view_only
                && let Some(vp) = viewport
                && !(vp.contains(pa) && vp.contains(pb))
            {
                continue;
            }
            total += (pb - pa).length();
            count += 1;
        }
        (count > 0).then(|| total / count as f64)
    };

    lengths(true).or_else(|| lengths(false))
}

/// Scans current positions and flags every bridge node. Recomputed after
/// each full or incremental layout pass and on viewport change.
pub fn index(
    g: &Graph,
    positions: &Positions,
    viewport: Option<&Viewport>,
) -> FxHashMap<NodeId, BridgeInfo> {
    let mut out = FxHashMap::default();
    let Some(avg) = average_edge_length(g, positions, viewport) else {
        return out;
    };
    let threshold = avg * DISTANT_FACTOR;

    for id in g.node_ids() {
        let Some(&p) = positions.get(id) else {
            continue;
        };
        let mut distant = Vec::new();
        for neighbor in g.neighbors(id) {
            let Some(&q) = positions.get(neighbor) else {
                continue;
            };
            let far = (q - p).length() > threshold;
            let out_of_view = viewport.is_some_and(|vp| !vp.contains(q));
            if far || out_of_view {
                distant.push(neighbor.to_string());
            }
        }
        if !distant.is_empty() {
            let class = SizeClass::classify(distant.len());
            out.insert(id.to_string(), BridgeInfo { distant, class });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_class_boundaries() {
        assert_eq!(SizeClass::classify(1), SizeClass::Small);
        assert_eq!(SizeClass::classify(5), SizeClass::Small);
        assert_eq!(SizeClass::classify(6), SizeClass::Medium);
        assert_eq!(SizeClass::classify(15), SizeClass::Medium);
        assert_eq!(SizeClass::classify(16), SizeClass::Large);
    }

    #[test]
    fn viewport_containment_is_inclusive() {
        let vp = Viewport::new(
            sociogram_layout::geom::point(0.0, 0.0),
            sociogram_layout::geom::vector(10.0, 10.0),
        );
        assert!(vp.contains(sociogram_layout::geom::point(10.0, -10.0)));
        assert!(!vp.contains(sociogram_layout::geom::point(10.1, 0.0)));
    }
}
