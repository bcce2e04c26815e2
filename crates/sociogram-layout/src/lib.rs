//! Multi-phase 2-D layout for relationship graphs.
//!
//! Four phases run in strict order on a full layout: deterministic seeding,
//! stress majorization over graph-theoretic distances, force-directed
//! refinement, and edge-crossing reduction. Small graph deltas go through
//! the bounded incremental updater instead. All entry points take a
//! [`Constraints`] snapshot of interaction state and a [`CancelToken`] for
//! cooperative cancellation between iteration batches.

#![forbid(unsafe_code)]

pub mod barnes_hut;
pub mod bundle;
pub mod config;
pub mod constraints;
pub mod crossing;
pub mod force;
pub mod geom;
pub mod incremental;
pub mod pipeline;
pub mod pull;
pub mod seed;
pub mod stress;

pub use config::LayoutConfig;
pub use constraints::{CancelToken, Constraints};
pub use pipeline::{LayoutReport, LayoutResult, full_layout};

/// Node positions keyed by id.
pub type Positions = rustc_hash::FxHashMap<sociogram_graph::NodeId, geom::Point>;
