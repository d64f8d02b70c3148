//! Replication strategies for the partition ring.
//!
//! This crate provides the routing strategies that determine:
//! - How many replicas a key gets, per zone and in total
//! - Which partitions (and therefore nodes) hold those replicas
//! - Which strategy a store definition selects

pub mod config;
pub mod error;
pub mod selection;
pub mod strategy;
pub mod zone;

pub use config::StoreDefinition;
pub use error::{ConfigurationError, ReplicationError, Result};
pub use selection::ReplicaSelection;
pub use strategy::{
    build_strategy, select_replicas, MirroredZoneStrategy, RoutingStrategy, RoutingStrategyType,
};
pub use zone::ZoneReplicationFactor;
