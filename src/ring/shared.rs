//! Thread-safe wrapper around [`HashRing`].

use parking_lot::RwLock;

use super::hasher::{KeyHasher, Sha256Hasher};
use super::ring::HashRing;
use crate::error::Result;

/// A [`HashRing`] that can be shared across threads.
///
/// Lookups take a read lock and run concurrently; membership changes take a
/// write lock, so a lookup never observes a half-added or half-removed node.
#[derive(Debug)]
pub struct SharedRing<H = Sha256Hasher> {
    inner: RwLock<HashRing<H>>,
}

impl SharedRing<Sha256Hasher> {
    pub fn new(replicas: u32) -> Result<Self> {
        Ok(Self::from_ring(HashRing::new(replicas)?))
    }
}

impl<H: KeyHasher> SharedRing<H> {
    pub fn from_ring(ring: HashRing<H>) -> Self {
        Self {
            inner: RwLock::new(ring),
        }
    }

    pub fn add_node(&self, node_id: &str) {
        self.inner.write().add_node(node_id);
    }

    pub fn remove_node(&self, node_id: &str) {
        self.inner.write().remove_node(node_id);
    }

    /// Find the node owning `key`. The owner is returned by value since the
    /// read lock is released before returning.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.inner.read().lookup(key).map(str::to_string)
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Run `f` against a consistent view of the ring.
    pub fn with_ring<R>(&self, f: impl FnOnce(&HashRing<H>) -> R) -> R {
        f(&self.inner.read())
    }
}

impl<H: KeyHasher + Clone> SharedRing<H> {
    /// Clone the current ring state.
    pub fn snapshot(&self) -> HashRing<H> {
        self.inner.read().clone()
    }
}
