//! Core partitioner trait definitions.

use crate::node::PartitionId;

/// A partitioner converts keys into indexes on the partition ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// hashing without synchronization overhead.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a key into a ring index.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to partition
    ///
    /// # Returns
    ///
    /// The ring index a routing strategy starts from
    fn partition(&self, key: &[u8]) -> PartitionId;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
