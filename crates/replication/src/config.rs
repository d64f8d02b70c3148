//! Store definitions.
//!
//! A store definition carries the routing configuration of one store:
//!
//! ```json
//! {
//!   "name": "users",
//!   "routing_strategy": "zone-routing",
//!   "replication_factor": 3,
//!   "zone_replication_factor": { "0": 1, "1": 1, "2": 1 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::strategy::RoutingStrategyType;
use crate::zone::ZoneReplicationFactor;

fn default_routing_strategy() -> String {
    RoutingStrategyType::ZONE_STRATEGY.to_string()
}

/// Routing configuration of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDefinition {
    pub name: String,
    /// Strategy-type tag, e.g. `zone-routing`.
    #[serde(default = "default_routing_strategy")]
    pub routing_strategy: String,
    /// Total replicas per key.
    pub replication_factor: usize,
    #[serde(default)]
    pub zone_replication_factor: ZoneReplicationFactor,
}

impl StoreDefinition {
    /// Zone-routed store with the given factors.
    pub fn zoned(
        name: impl Into<String>,
        replication_factor: usize,
        zone_replication_factor: ZoneReplicationFactor,
    ) -> Self {
        Self {
            name: name.into(),
            routing_strategy: default_routing_strategy(),
            replication_factor,
            zone_replication_factor,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
