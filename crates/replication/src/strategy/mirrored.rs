//! Mirrored-zone routing strategy.
//!
//! Partitions form triads of three co-located partitions, one per zone.
//! The key hash always hits the first partition of a triad, then the ring is
//! walked clockwise until each of the three zones holds exactly one replica.
//!
//! # Algorithm
//!
//! 1. Validate the zone replication factors (fail before touching the ring)
//! 2. Walk at most `P` slots clockwise from the start index
//! 3. Take a slot if its node is new to the walk and its zone still needs a replica
//! 4. Stop once three replicas are placed, or return what was found
//!
//! # Performance
//!
//! - **Time**: O(P) worst case, O(1) on a well laid out ring
//! - **Space**: O(r) - the visited node set and the selection

use std::collections::HashSet;
use std::sync::Arc;

use corelib::{MirroredZonePartitioner, Node, NodeId, PartitionId, PartitionRing, Partitioner};
use tracing::{trace, warn};

use crate::error::{ConfigurationError, ReplicationError, Result};
use crate::selection::ReplicaSelection;
use crate::strategy::{RoutingStrategy, RoutingStrategyType};
use crate::zone::ZoneReplicationFactor;

/// Selects the replica partitions for a walk starting at `start_index`.
///
/// Zone factors are validated first, so a misconfigured store fails even on
/// an empty ring. `start_index` is taken modulo the ring size. A selection
/// shorter than `replication_factor` is returned, not rejected, when the
/// ring runs out before every zone is served.
pub fn select_replicas(
    start_index: PartitionId,
    ring: &PartitionRing,
    zone_replication_factor: &ZoneReplicationFactor,
    replication_factor: usize,
) -> std::result::Result<ReplicaSelection, ConfigurationError> {
    zone_replication_factor.validate_mirrored(replication_factor)?;

    let mut selection = ReplicaSelection::new(replication_factor);
    let partition_count = ring.partition_count();
    if partition_count == 0 {
        return Ok(selection);
    }

    let mut required = zone_replication_factor.remaining();
    let mut visited: HashSet<NodeId> = HashSet::with_capacity(replication_factor);
    let mut index = start_index % partition_count;

    for _ in 0..partition_count {
        if let Some(node) = ring.node_for_partition(index) {
            // A node is counted once, however many consecutive slots it owns.
            if visited.insert(node.id) && required.claim(node.zone_id) {
                selection.push(index);
            }
        }

        if selection.len() >= replication_factor {
            trace!(start_index, partitions = ?selection.partitions(), "replicas selected");
            return Ok(selection);
        }
        index = (index + 1) % partition_count;
    }

    warn!(
        start_index,
        found = selection.len(),
        required = replication_factor,
        unsatisfied = ?required.unsatisfied(),
        "ring exhausted before every zone received a replica"
    );
    Ok(selection)
}

/// Routing strategy placing one replica in each of three mirrored zones.
///
/// Holds the ring by `Arc` and the zone configuration by value; every call
/// works on its own copy of the zone counters, so one strategy can serve
/// concurrent requests without locking.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use corelib::{Node, NodeId, RingBuilder, ZoneId};
/// use replication::{MirroredZoneStrategy, RoutingStrategy, ZoneReplicationFactor};
///
/// let mut builder = RingBuilder::new();
/// for i in 0..9u32 {
///     builder = builder.add_node_with_partitions(
///         Node::new(NodeId(i), format!("node{}", i), ZoneId(i % 3)),
///         [i as usize],
///     );
/// }
/// let ring = Arc::new(builder.build().unwrap());
/// let zones = ZoneReplicationFactor::one_per_zone([ZoneId(0), ZoneId(1), ZoneId(2)]);
///
/// let strategy = MirroredZoneStrategy::new(ring, zones, 3).unwrap();
/// let replicas = strategy.replicating_partitions(7).unwrap();
/// assert_eq!(replicas.partitions(), &[7, 8, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct MirroredZoneStrategy {
    ring: Arc<PartitionRing>,
    zone_replication_factor: ZoneReplicationFactor,
    replication_factor: usize,
    partitioner: MirroredZonePartitioner,
}

impl MirroredZoneStrategy {
    /// Creates the strategy with a partitioner matching the ring's triads.
    ///
    /// Zone factors are not checked here; every routing call checks them.
    pub fn new(
        ring: Arc<PartitionRing>,
        zone_replication_factor: ZoneReplicationFactor,
        replication_factor: usize,
    ) -> Result<Self> {
        let partitioner = MirroredZonePartitioner::for_ring(&ring)?;
        Ok(Self::with_partitioner(
            ring,
            zone_replication_factor,
            replication_factor,
            partitioner,
        ))
    }

    /// Creates the strategy around an explicit partitioner.
    pub fn with_partitioner(
        ring: Arc<PartitionRing>,
        zone_replication_factor: ZoneReplicationFactor,
        replication_factor: usize,
        partitioner: MirroredZonePartitioner,
    ) -> Self {
        Self {
            ring,
            zone_replication_factor,
            replication_factor,
            partitioner,
        }
    }

    /// Checks the zone configuration without routing anything.
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        self.zone_replication_factor
            .validate_mirrored(self.replication_factor)
    }

    pub fn ring(&self) -> &Arc<PartitionRing> {
        &self.ring
    }

    pub fn zone_replication_factor(&self) -> &ZoneReplicationFactor {
        &self.zone_replication_factor
    }

    pub fn partitioner(&self) -> &MirroredZonePartitioner {
        &self.partitioner
    }
}

impl RoutingStrategy for MirroredZoneStrategy {
    fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    fn replicating_partitions(&self, index: PartitionId) -> Result<ReplicaSelection> {
        select_replicas(
            index,
            &self.ring,
            &self.zone_replication_factor,
            self.replication_factor,
        )
        .map_err(ReplicationError::from)
    }

    fn partition_list(&self, key: &[u8]) -> Result<ReplicaSelection> {
        self.replicating_partitions(self.partitioner.partition(key))
    }

    fn route_request(&self, key: &[u8]) -> Result<Vec<NodeId>> {
        let selection = self.partition_list(key)?;
        Ok(selection
            .partitions()
            .iter()
            .filter_map(|&partition| self.ring.node_for_partition(partition))
            .map(|node| node.id)
            .collect())
    }

    fn nodes(&self) -> &[Node] {
        self.ring.nodes()
    }

    fn strategy_type(&self) -> RoutingStrategyType {
        RoutingStrategyType::Zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{RingBuilder, ZoneId};

    fn three_zones() -> ZoneReplicationFactor {
        ZoneReplicationFactor::one_per_zone([ZoneId(0), ZoneId(1), ZoneId(2)])
    }

    /// Nine single-partition nodes, zones repeating 0, 1, 2.
    fn nine_node_ring() -> PartitionRing {
        let mut builder = RingBuilder::new();
        for i in 0..9u32 {
            builder = builder.add_node_with_partitions(
                Node::new(NodeId(i), format!("node{}", i), ZoneId(i % 3)),
                [i as usize],
            );
        }
        builder.build().unwrap()
    }

    fn ring_of(owners: &[(u32, u32, Vec<PartitionId>)]) -> PartitionRing {
        owners
            .iter()
            .fold(RingBuilder::new(), |builder, (id, zone, partitions)| {
                builder.add_node_with_partitions(
                    Node::new(NodeId(*id), format!("node{}", id), ZoneId(*zone)),
                    partitions.iter().copied(),
                )
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_select_from_anchor() {
        let selection = select_replicas(0, &nine_node_ring(), &three_zones(), 3).unwrap();
        assert_eq!(selection.partitions(), &[0, 1, 2]);
        assert!(selection.is_complete());
    }

    #[test]
    fn test_select_wraps_around() {
        let selection = select_replicas(7, &nine_node_ring(), &three_zones(), 3).unwrap();
        assert_eq!(selection.partitions(), &[7, 8, 0]);
    }

    #[test]
    fn test_select_from_last_slot() {
        let selection = select_replicas(8, &nine_node_ring(), &three_zones(), 3).unwrap();
        assert_eq!(selection.partitions(), &[8, 0, 1]);
    }

    #[test]
    fn test_start_index_beyond_ring() {
        let ring = nine_node_ring();
        let zones = three_zones();
        assert_eq!(
            select_replicas(16, &ring, &zones, 3).unwrap(),
            select_replicas(7, &ring, &zones, 3).unwrap()
        );
    }

    #[test]
    fn test_empty_ring() {
        for start in [0, 1, 99] {
            let selection = select_replicas(start, &PartitionRing::empty(), &three_zones(), 3).unwrap();
            assert!(selection.is_empty());
        }
    }

    #[test]
    fn test_configuration_checked_before_ring() {
        let bad = [
            [(0, 1), (1, 2), (2, 1)].into_iter().map(|(z, f)| (ZoneId(z), f)).collect(),
            ZoneReplicationFactor::one_per_zone([ZoneId(0), ZoneId(1)]),
        ];
        for zones in &bad {
            // Even an empty ring must not mask a misconfiguration.
            assert!(select_replicas(0, &PartitionRing::empty(), zones, 3).is_err());
            assert!(select_replicas(0, &nine_node_ring(), zones, 3).is_err());
        }
        assert_eq!(
            select_replicas(0, &nine_node_ring(), &three_zones(), 4),
            Err(ConfigurationError::TotalReplicationFactor {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_same_zone_neighbours_skipped() {
        // Two zone-0 nodes lead the ring; only the first one is taken.
        let ring = ring_of(&[
            (0, 0, vec![0]),
            (3, 0, vec![1]),
            (1, 1, vec![2]),
            (4, 1, vec![3]),
            (2, 2, vec![4]),
            (5, 2, vec![5]),
        ]);
        let selection = select_replicas(0, &ring, &three_zones(), 3).unwrap();
        assert_eq!(selection.partitions(), &[0, 2, 4]);
    }

    #[test]
    fn test_node_owning_several_slots_counted_once() {
        // Node 0 owns two consecutive slots; the second one is skipped.
        let ring = ring_of(&[(0, 0, vec![0, 1]), (1, 1, vec![2, 4]), (2, 2, vec![3, 5])]);
        let selection = select_replicas(0, &ring, &three_zones(), 3).unwrap();
        assert_eq!(selection.partitions(), &[0, 2, 3]);
    }

    #[test]
    fn test_missing_zone_yields_partial_selection() {
        let ring = ring_of(&[(0, 0, vec![0, 2]), (1, 1, vec![1, 3]), (2, 0, vec![4]), (3, 1, vec![5])]);
        let selection = select_replicas(0, &ring, &three_zones(), 3).unwrap();
        assert_eq!(selection.partitions(), &[0, 1]);
        assert!(!selection.is_complete());
        assert_eq!(selection.missing(), 1);
    }

    #[test]
    fn test_unconfigured_zone_ignored() {
        let ring = ring_of(&[(9, 7, vec![0]), (0, 0, vec![1]), (1, 1, vec![2]), (2, 2, vec![3, 4, 5])]);
        let selection = select_replicas(0, &ring, &three_zones(), 3).unwrap();
        assert_eq!(selection.partitions(), &[1, 2, 3]);
    }

    #[test]
    fn test_strategy_routes_keys() {
        let ring = Arc::new(nine_node_ring());
        let strategy = MirroredZoneStrategy::new(ring, three_zones(), 3).unwrap();

        // "key1" hashes to 927623783, which is triad 2 of 3 -> anchor 6.
        assert_eq!(strategy.partitioner().partition(b"key1"), 6);
        assert_eq!(strategy.partition_list(b"key1").unwrap().partitions(), &[6, 7, 8]);
        assert_eq!(strategy.master_partition(b"key1").unwrap(), Some(6));
        assert_eq!(
            strategy.route_request(b"key1").unwrap(),
            vec![NodeId(6), NodeId(7), NodeId(8)]
        );

        assert_eq!(strategy.replication_factor(), 3);
        assert_eq!(strategy.nodes().len(), 9);
        assert_eq!(strategy.strategy_type().as_str(), RoutingStrategyType::ZONE_STRATEGY);
    }

    #[test]
    fn test_strategy_reports_misconfiguration_per_call() {
        let ring = Arc::new(nine_node_ring());
        let strategy = MirroredZoneStrategy::new(ring, three_zones(), 2).unwrap();
        assert!(strategy.validate().is_err());
        assert!(matches!(
            strategy.partition_list(b"key1"),
            Err(ReplicationError::Configuration(_))
        ));
    }

    #[test]
    fn test_concurrent_callers_share_strategy() {
        let strategy = Arc::new(
            MirroredZoneStrategy::new(Arc::new(nine_node_ring()), three_zones(), 3).unwrap(),
        );

        std::thread::scope(|scope| {
            for t in 0..4usize {
                let strategy = Arc::clone(&strategy);
                scope.spawn(move || {
                    for start in 0..90 {
                        let selection = strategy.replicating_partitions(start + t).unwrap();
                        assert_eq!(selection.len(), 3);
                    }
                });
            }
        });

        // Shared configuration is never consumed by the walks.
        assert_eq!(strategy.zone_replication_factor(), &three_zones());
    }
}
