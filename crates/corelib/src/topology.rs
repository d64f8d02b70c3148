//! Cluster topology documents.
//!
//! A topology is the JSON description of the cluster that the ring is built
//! from:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": 0, "host": "node0", "zone_id": 0, "partitions": [0, 5] },
//!     { "id": 1, "host": "node1", "zone_id": 1, "partitions": [1, 3] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::node::{Node, NodeId, PartitionId, ZoneId};
use crate::ring::PartitionRing;

/// One node entry of a topology document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: NodeId,
    pub host: String,
    pub zone_id: ZoneId,
    #[serde(default)]
    pub partitions: Vec<PartitionId>,
}

impl From<NodeSpec> for Node {
    fn from(spec: NodeSpec) -> Self {
        Node::with_partitions(spec.id, spec.host, spec.zone_id, spec.partitions)
    }
}

impl From<&Node> for NodeSpec {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            host: node.host.clone(),
            zone_id: node.zone_id,
            partitions: node.partitions.clone(),
        }
    }
}

/// Serializable cluster description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

impl Topology {
    /// Parses a topology from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a topology file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Captures the layout of an existing ring.
    pub fn from_ring(ring: &PartitionRing) -> Self {
        Self {
            nodes: ring.nodes().iter().map(NodeSpec::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates the layout and builds the partition ring.
    pub fn into_ring(self) -> Result<PartitionRing> {
        PartitionRing::new(self.nodes.into_iter().map(Node::from))
    }
}
