//! Error types for replica routing.

use corelib::ZoneId;
use thiserror::Error;

/// Result type alias for the replication crate.
pub type Result<T> = std::result::Result<T, ReplicationError>;

/// Misconfigured zone replication. Fatal: routing must not proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("mirrored-zone routing needs a factor of 1 in every zone, {zone} has {factor}")]
    ZoneFactorNotOne { zone: ZoneId, factor: usize },

    #[error("mirrored-zone routing requires exactly {expected} zones, found {found}")]
    ZoneCount { expected: usize, found: usize },

    #[error("zone factors add up to {sum} but the replication factor is {total}")]
    ReplicaSumMismatch { sum: usize, total: usize },

    #[error("mirrored-zone routing requires a total replication factor of {expected}, found {found}")]
    TotalReplicationFactor { expected: usize, found: usize },
}

/// Errors raised while building or using a routing strategy.
#[derive(Debug, Error)]
pub enum ReplicationError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("topology error: {0}")]
    Topology(#[from] corelib::Error),

    #[error("unsupported routing strategy: {0}")]
    UnsupportedStrategy(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
