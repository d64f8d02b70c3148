//! Partition ring implementation.
//!
//! The ring maps every partition index to the node that owns it and is
//! walked clockwise by the routing strategies.

pub mod ring;

pub use ring::{PartitionRing, RingBuilder};
