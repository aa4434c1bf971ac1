//! Consistent hash ring.
//!
//! Maps string keys to one of a dynamic set of physical nodes through
//! virtual-node placement on a u64 ring. Adding or removing a node only moves
//! the keys that land on that node's positions.

mod hasher;
#[allow(clippy::module_inception)]
mod ring;
mod shared;

pub use hasher::{HasherKind, KeyHasher, Murmur64Hasher, Sha256Hasher};
pub use ring::{HashRing, VirtualNode};
pub use shared::SharedRing;
