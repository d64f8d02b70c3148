//! Result of a replica placement walk.

use corelib::PartitionId;

/// Ordered partitions chosen to hold a key's replicas.
///
/// Order is the order in which the ring walk satisfied each zone, not zone
/// or partition order. A selection shorter than `required` means the ring
/// could not satisfy every zone; that is a degraded result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaSelection {
    partitions: Vec<PartitionId>,
    required: usize,
}

impl ReplicaSelection {
    /// Empty selection that expects `required` replicas.
    pub fn new(required: usize) -> Self {
        Self {
            partitions: Vec::with_capacity(required),
            required,
        }
    }

    pub(crate) fn push(&mut self, partition: PartitionId) {
        self.partitions.push(partition);
    }

    /// Selected partitions, in selection order.
    pub fn partitions(&self) -> &[PartitionId] {
        &self.partitions
    }

    /// The partition every other replica mirrors, if any was found.
    pub fn master(&self) -> Option<PartitionId> {
        self.partitions.first().copied()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Replica count the selection was asked for.
    pub fn required(&self) -> usize {
        self.required
    }

    /// True once every required replica was placed.
    pub fn is_complete(&self) -> bool {
        self.partitions.len() >= self.required
    }

    /// Replicas the walk could not place.
    pub fn missing(&self) -> usize {
        self.required.saturating_sub(self.partitions.len())
    }

    pub fn into_vec(self) -> Vec<PartitionId> {
        self.partitions
    }
}

impl IntoIterator for ReplicaSelection {
    type Item = PartitionId;
    type IntoIter = std::vec::IntoIter<PartitionId>;

    fn into_iter(self) -> Self::IntoIter {
        self.partitions.into_iter()
    }
}

impl<'a> IntoIterator for &'a ReplicaSelection {
    type Item = &'a PartitionId;
    type IntoIter = std::slice::Iter<'a, PartitionId>;

    fn into_iter(self) -> Self::IntoIter {
        self.partitions.iter()
    }
}
