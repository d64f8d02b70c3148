//! Partitioner abstraction for the partition ring.
//!
//! Partitioners are responsible for converting keys into ring indexes
//! that the routing strategies start walking from.

pub mod fnv;
pub mod mirrored;
pub mod traits;

pub use mirrored::MirroredZonePartitioner;
pub use traits::Partitioner;
