//! Partitioner for rings laid out as mirrored triads.
//!
//! Partitions are grouped in triads of three co-located partitions, one per
//! zone:
//!
//! ```text
//! 0 1 2 | 3 4 5 | 6 7 8 | ...
//! A B C | A B C | A B C | ...
//! ```
//!
//! The hash always lands on the first partition of a triad (the anchor), and
//! the routing strategy walks clockwise from there to reach the other zones.

use crate::error::{Error, Result};
use crate::node::PartitionId;
use crate::partitioner::fnv::{fnv_hash, saturating_abs};
use crate::partitioner::traits::Partitioner;
use crate::ring::PartitionRing;

/// Number of partitions in a triad (one per zone).
pub const TRIAD_SIZE: usize = 3;

/// FNV partitioner that only ever returns triad anchors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MirroredZonePartitioner {
    master_partitions: usize,
}

impl MirroredZonePartitioner {
    /// Creates a partitioner over `master_partitions` triads.
    pub fn new(master_partitions: usize) -> Self {
        Self { master_partitions }
    }

    /// Creates a partitioner for a ring of `partition_count` partitions.
    ///
    /// Fails if the partitions cannot be grouped in whole triads.
    pub fn from_partition_count(partition_count: usize) -> Result<Self> {
        if partition_count % TRIAD_SIZE != 0 {
            return Err(Error::Topology(format!(
                "partition count {} is not a multiple of {}",
                partition_count, TRIAD_SIZE
            )));
        }
        Ok(Self::new(partition_count / TRIAD_SIZE))
    }

    /// Creates a partitioner matching the layout of `ring`.
    pub fn for_ring(ring: &PartitionRing) -> Result<Self> {
        Self::from_partition_count(ring.partition_count())
    }

    /// Number of triads the hash is reduced over.
    pub fn master_partitions(&self) -> usize {
        self.master_partitions
    }

    /// Maps a raw signed FNV value onto a triad anchor.
    ///
    /// Returns 0 when there are no triads.
    pub fn anchor_for(&self, raw: i32) -> PartitionId {
        if self.master_partitions == 0 {
            return 0;
        }
        // saturating_abs never returns a negative value.
        let magnitude = saturating_abs(raw) as usize;
        (magnitude % self.master_partitions) * TRIAD_SIZE
    }
}

impl Partitioner for MirroredZonePartitioner {
    fn partition(&self, key: &[u8]) -> PartitionId {
        self.anchor_for(fnv_hash(key))
    }

    fn name(&self) -> &'static str {
        "MirroredZonePartitioner"
    }
}
