//! Core library for mirrored-zone partition routing.
//!
//! This crate provides the fundamental abstractions shared by the routing
//! strategies:
//! - Node, zone and partition identifiers
//! - Partitioner algorithms (key → ring index)
//! - The partition ring (partition → owning node)
//! - Topology documents that describe a cluster

pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod topology;

pub use error::{Error, Result};
pub use node::{Node, NodeId, PartitionId, ZoneId};
pub use partitioner::{MirroredZonePartitioner, Partitioner};
pub use ring::{PartitionRing, RingBuilder};
pub use topology::Topology;
