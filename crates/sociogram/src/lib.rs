//! Relationship-graph engine.
//!
//! Positions a network of people/entities in 2-D space and drives
//! exploration of it: hop-depth selection, pinning, magnetic "pull" of a
//! bridge node's distant connections, family clustering with collapse to
//! composite nodes, and ghost-node merge. Rendering and any interpretation
//! of what the nodes mean are the embedder's concern; the engine consumes
//! nodes and edges and emits positions, selection sets, and bridge badges.
//!
//! The [`Engine`] is synchronous; [`Scheduler`] runs the same layout entry
//! points on a worker thread with cancellation and delta coalescing for
//! embedders that must keep an input thread responsive.

#![forbid(unsafe_code)]

pub mod bridges;
pub mod cluster;
pub mod engine;
pub mod error;
pub mod merge;
pub mod persist;
pub mod scheduler;
pub mod selection;
pub mod session;

pub use bridges::{BridgeInfo, SizeClass, Viewport};
pub use cluster::{FamilyCluster, WeightMergePolicy};
pub use engine::{Engine, EngineConfig};
pub use error::{Error, Result};
pub use merge::{MergeProposal, MergeScorer};
pub use persist::{PersistedPin, PersistedState};
pub use scheduler::{LayoutUpdate, Scheduler};
pub use selection::{EdgeFilter, Selection};
pub use session::{PullRecord, SessionState};

pub use sociogram_graph::{Edge, EdgeType, Graph, Node, NodeId, NodeKind};
pub use sociogram_layout::{LayoutConfig, Positions};
