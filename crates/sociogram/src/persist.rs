//! The persistence boundary.
//!
//! Only pinned positions and the clustering toggle survive a session;
//! selection, pulls, and ghosts are reconstructed from the live graph on
//! next load.

use serde::{Deserialize, Serialize};
use sociogram_graph::NodeId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedPin {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub pins: Vec<PersistedPin>,
    pub clustering_enabled: bool,
}

impl PersistedState {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
