//! Ghost-merge flow.
//!
//! A ghost node (unresolved mention) moves through
//! `Proposed -> PendingConfirmation -> Resolved | Cancelled`. Being a ghost
//! in the graph *is* the `Proposed` state; this module only tracks the
//! pending confirmation and performs the edge rewrite on resolve. Whether a
//! ghost and a target are compatible is an external concern, injected as a
//! scoring function the state machine never interprets.

use sociogram_graph::{Graph, NodeId};

/// Injectable compatibility heuristic (name similarity and the like).
/// `None` from the scorer means "no opinion"; the engine just records it.
pub type MergeScorer = Box<dyn Fn(&Graph, &str, &str) -> Option<f64> + Send>;

/// A merge awaiting user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeProposal {
    pub ghost: NodeId,
    pub target: NodeId,
    /// Scorer output captured at proposal time, for display only.
    pub score: Option<f64>,
}

/// Deletes the ghost and rewires its edges onto the target, folding
/// duplicates per (neighbor, type) with `weight = max`. Returns false if
/// either side has left the graph since the proposal.
pub fn resolve(g: &mut Graph, proposal: &MergeProposal) -> bool {
    g.rewire(&proposal.ghost, &proposal.target)
}
