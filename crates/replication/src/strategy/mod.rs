//! Routing strategy abstractions.
//!
//! Routing strategies map a key to the partitions (and nodes) that hold its
//! replicas:
//!
//! - **MirroredZoneStrategy**: one replica in each of exactly three zones,
//!   starting from the anchor partition of the key's triad

pub mod factory;
pub mod mirrored;

pub use factory::build_strategy;
pub use mirrored::{select_replicas, MirroredZoneStrategy};

use std::fmt;
use std::str::FromStr;

use corelib::{Node, NodeId, PartitionId};

use crate::error::{ReplicationError, Result};
use crate::selection::ReplicaSelection;

/// Strategy-type tags as they appear in store definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingStrategyType {
    /// Replicas spread over zones. Mirrored-zone routing reports this tag too.
    Zone,
    /// Replicas on consecutive distinct nodes of the ring.
    Consistent,
    /// Every node holds every key.
    ToAll,
}

impl RoutingStrategyType {
    pub const ZONE_STRATEGY: &'static str = "zone-routing";
    pub const CONSISTENT_STRATEGY: &'static str = "consistent-routing";
    pub const TO_ALL_STRATEGY: &'static str = "all-routing";

    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingStrategyType::Zone => Self::ZONE_STRATEGY,
            RoutingStrategyType::Consistent => Self::CONSISTENT_STRATEGY,
            RoutingStrategyType::ToAll => Self::TO_ALL_STRATEGY,
        }
    }
}

impl fmt::Display for RoutingStrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutingStrategyType {
    type Err = ReplicationError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            Self::ZONE_STRATEGY => Ok(RoutingStrategyType::Zone),
            Self::CONSISTENT_STRATEGY => Ok(RoutingStrategyType::Consistent),
            Self::TO_ALL_STRATEGY => Ok(RoutingStrategyType::ToAll),
            other => Err(ReplicationError::UnsupportedStrategy(other.to_string())),
        }
    }
}

/// Trait for routing strategies.
///
/// A routing strategy determines:
/// 1. How many replicas a key gets
/// 2. Which partitions hold them, in preference order
/// 3. Which nodes own those partitions
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as a single strategy
/// serves concurrent requests.
pub trait RoutingStrategy: Send + Sync + 'static {
    /// Total number of replicas per key.
    fn replication_factor(&self) -> usize;

    /// Replica partitions for a walk starting at ring index `index`.
    fn replicating_partitions(&self, index: PartitionId) -> Result<ReplicaSelection>;

    /// Replica partitions for `key`, master first.
    fn partition_list(&self, key: &[u8]) -> Result<ReplicaSelection>;

    /// First partition of the key's replica list.
    fn master_partition(&self, key: &[u8]) -> Result<Option<PartitionId>> {
        Ok(self.partition_list(key)?.master())
    }

    /// Nodes owning the key's replica partitions, in the same order.
    fn route_request(&self, key: &[u8]) -> Result<Vec<NodeId>>;

    /// Every node known to the strategy.
    fn nodes(&self) -> &[Node];

    /// Tag the strategy is selected by in store definitions.
    fn strategy_type(&self) -> RoutingStrategyType;
}
