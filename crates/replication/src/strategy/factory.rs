//! Builds routing strategies from store definitions.

use std::sync::Arc;

use corelib::PartitionRing;
use tracing::debug;

use crate::config::StoreDefinition;
use crate::error::{ReplicationError, Result};
use crate::strategy::{MirroredZoneStrategy, RoutingStrategy, RoutingStrategyType};

/// Picks the strategy named by `store.routing_strategy`.
///
/// The zone tag yields the mirrored-zone strategy. Consistent and all-node
/// routing are recognised tags but not available here.
pub fn build_strategy(
    store: &StoreDefinition,
    ring: Arc<PartitionRing>,
) -> Result<Box<dyn RoutingStrategy>> {
    match store.routing_strategy.parse::<RoutingStrategyType>()? {
        RoutingStrategyType::Zone => {
            let strategy = MirroredZoneStrategy::new(
                ring,
                store.zone_replication_factor.clone(),
                store.replication_factor,
            )?;
            debug!(
                store = %store.name,
                replication_factor = store.replication_factor,
                triads = strategy.partitioner().master_partitions(),
                "built mirrored-zone routing strategy"
            );
            Ok(Box::new(strategy))
        }
        other => Err(ReplicationError::UnsupportedStrategy(other.to_string())),
    }
}
