//! Node abstractions for the partition ring.
//!
//! Nodes represent the physical members of the cluster. Each node lives in
//! exactly one zone and owns an ordered list of ring partitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a partition on the ring (`0 <= id < partition_count`).
pub type PartitionId = usize;

/// Compact identifier for a node in the cluster.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a failure/availability zone.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u32);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone-{}", self.0)
    }
}

/// Physical node participating in the ring.
///
/// Immutable once the ring is built; the ring hands out shared references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Human‑readable name or hostname.
    pub host: String,
    /// Zone this node lives in.
    pub zone_id: ZoneId,
    /// Partitions owned by this node, in configuration order.
    pub partitions: Vec<PartitionId>,
}

impl Node {
    /// Construct a node that owns no partitions yet.
    pub fn new(id: NodeId, host: impl Into<String>, zone_id: ZoneId) -> Self {
        Self {
            id,
            host: host.into(),
            zone_id,
            partitions: Vec::new(),
        }
    }

    pub fn with_partitions(
        id: NodeId,
        host: impl Into<String>,
        zone_id: ZoneId,
        partitions: impl IntoIterator<Item = PartitionId>,
    ) -> Self {
        Self {
            id,
            host: host.into(),
            zone_id,
            partitions: partitions.into_iter().collect(),
        }
    }

    /// Number of partitions owned by this node.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node(id={}, host={}, {})", self.id, self.host, self.zone_id)
    }
}
