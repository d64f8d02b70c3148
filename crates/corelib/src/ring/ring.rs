//! Partition ring data structure.
//!
//! Holds the immutable partition → node index built from the cluster
//! topology. The ring is read-only once built and can be shared freely
//! across threads (wrap it in an `Arc`).

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::node::{Node, NodeId, PartitionId, ZoneId};
use crate::partitioner::mirrored::TRIAD_SIZE;

/// Partition ring: `partition_count` slots, each owned by exactly one node.
#[derive(Debug, Clone, Default)]
pub struct PartitionRing {
    /// Nodes ordered by id.
    nodes: Vec<Node>,
    /// Slot `p` holds the position in `nodes` of the owner of partition `p`.
    partition_to_node: Vec<usize>,
}

impl PartitionRing {
    /// Builds a ring from the given nodes.
    ///
    /// Fails if two nodes share an id, a partition is owned twice, the
    /// partition ids leave gaps, or the partitions do not form whole triads.
    pub fn new(nodes: impl IntoIterator<Item = Node>) -> Result<Self> {
        let mut by_id: BTreeMap<NodeId, Node> = BTreeMap::new();
        for node in nodes {
            if by_id.contains_key(&node.id) {
                return Err(Error::InvalidNode(format!("duplicate node id {}", node.id)));
            }
            by_id.insert(node.id, node);
        }
        let nodes: Vec<Node> = by_id.into_values().collect();

        let mut owners: BTreeMap<PartitionId, usize> = BTreeMap::new();
        for (position, node) in nodes.iter().enumerate() {
            for &partition in &node.partitions {
                if let Some(previous) = owners.insert(partition, position) {
                    return Err(Error::Topology(format!(
                        "partition {} is owned by both node {} and node {}",
                        partition, nodes[previous].id, node.id
                    )));
                }
            }
        }

        let partition_count = owners.len();
        // Keys are sorted and unique, so the ids are exactly 0..P iff the last one is P - 1.
        if let Some((&last, _)) = owners.last_key_value() {
            if last != partition_count - 1 {
                let missing = (0..partition_count)
                    .find(|p| !owners.contains_key(p))
                    .unwrap_or(partition_count);
                return Err(Error::Topology(format!(
                    "partition {} is not owned by any node",
                    missing
                )));
            }
        }
        if partition_count % TRIAD_SIZE != 0 {
            return Err(Error::Topology(format!(
                "partition count {} is not a multiple of {}",
                partition_count, TRIAD_SIZE
            )));
        }

        let partition_to_node: Vec<usize> = owners.into_values().collect();
        debug!(
            nodes = nodes.len(),
            partitions = partition_count,
            "built partition ring"
        );
        Ok(Self {
            nodes,
            partition_to_node,
        })
    }

    /// Ring with no nodes and no partitions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total number of partitions (`P`).
    pub fn partition_count(&self) -> usize {
        self.partition_to_node.len()
    }

    /// Number of triads, `P / 3`.
    pub fn master_partition_count(&self) -> usize {
        self.partition_count() / TRIAD_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.partition_to_node.is_empty()
    }

    /// Node owning `partition`, or `None` if it is off the ring.
    #[inline]
    pub fn node_for_partition(&self, partition: PartitionId) -> Option<&Node> {
        self.partition_to_node
            .get(partition)
            .map(|&position| &self.nodes[position])
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .binary_search_by_key(&id, |node| node.id)
            .ok()
            .map(|position| &self.nodes[position])
    }

    /// All nodes, ordered by id.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Distinct zones that own at least one node.
    pub fn zones(&self) -> BTreeSet<ZoneId> {
        self.nodes.iter().map(|node| node.zone_id).collect()
    }
}

/// Builder for [`PartitionRing`].
#[derive(Debug, Default)]
pub struct RingBuilder {
    nodes: Vec<Node>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node together with the partitions it already lists.
    pub fn add_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds a node that owns `partitions`, replacing whatever it listed.
    pub fn add_node_with_partitions(
        mut self,
        mut node: Node,
        partitions: impl IntoIterator<Item = PartitionId>,
    ) -> Self {
        node.partitions = partitions.into_iter().collect();
        self.nodes.push(node);
        self
    }

    pub fn build(self) -> Result<PartitionRing> {
        PartitionRing::new(self.nodes)
    }
}
