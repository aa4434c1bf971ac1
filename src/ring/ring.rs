//! Consistent hash ring implementation.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::hasher::{KeyHasher, Sha256Hasher};
use crate::error::{ensure_positive, Result};

/// One ring position owned by a physical node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNode {
    /// Position on the ring.
    pub hash: u64,
    /// The physical node that owns this position.
    pub node_id: String,
}

/// Consistent hash ring mapping string keys to physical nodes.
///
/// Each node is placed on a u64 ring at `replicas` positions, derived by
/// hashing `"{node}#{i}"`. A key is owned by the node at the first position
/// clockwise from the key's hash, wrapping to the lowest position when the
/// key hashes past the end of the ring.
///
/// Two virtual nodes that hash to the same position overwrite each other;
/// the last writer owns it.
#[derive(Debug, Clone)]
pub struct HashRing<H = Sha256Hasher> {
    /// Virtual node positions: ring position -> physical node.
    vnodes: BTreeMap<u64, String>,
    /// Registered physical nodes.
    nodes: BTreeSet<String>,
    /// Virtual nodes per physical node.
    replicas: u32,
    hasher: H,
}

impl HashRing<Sha256Hasher> {
    /// Create an empty ring using the default SHA-256 hasher.
    pub fn new(replicas: u32) -> Result<Self> {
        Self::with_hasher(replicas, Sha256Hasher)
    }
}

impl<H: KeyHasher> HashRing<H> {
    /// Create an empty ring with a custom hasher.
    pub fn with_hasher(replicas: u32, hasher: H) -> Result<Self> {
        ensure_positive("replicas", replicas as u64)?;
        Ok(Self {
            vnodes: BTreeMap::new(),
            nodes: BTreeSet::new(),
            replicas,
            hasher,
        })
    }

    /// Place `replicas` virtual nodes for `node_id` on the ring.
    ///
    /// Adding a node twice writes the same positions again.
    pub fn add_node(&mut self, node_id: &str) {
        for i in 0..self.replicas {
            let pos = self.vnode_position(node_id, i);
            self.vnodes.insert(pos, node_id.to_string());
        }
        self.nodes.insert(node_id.to_string());
        debug!(
            node_id,
            replicas = self.replicas,
            ring_size = self.vnodes.len(),
            "added node to ring"
        );
    }

    /// Remove every virtual node of `node_id`. Unknown nodes are a no-op.
    ///
    /// Positions that were taken over by another node through a collision
    /// are left to their current owner.
    pub fn remove_node(&mut self, node_id: &str) {
        for i in 0..self.replicas {
            let pos = self.vnode_position(node_id, i);
            if self.vnodes.get(&pos).is_some_and(|owner| owner == node_id) {
                self.vnodes.remove(&pos);
            }
        }
        if self.nodes.remove(node_id) {
            debug!(node_id, ring_size = self.vnodes.len(), "removed node from ring");
        }
    }

    /// Find the node owning `key`, or `None` if the ring is empty.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.lookup_hash(self.hasher.hash(key))
    }

    /// Find the node owning a precomputed ring position.
    pub fn lookup_hash(&self, hash: u64) -> Option<&str> {
        self.vnodes
            .range(hash..)
            .next()
            .or_else(|| self.vnodes.iter().next())
            .map(|(_, node)| node.as_str())
    }

    /// Count how many of `keys` each registered node owns.
    ///
    /// Every registered node appears in the result, including nodes that own
    /// none of the keys.
    pub fn distribution<I, K>(&self, keys: I) -> BTreeMap<String, usize>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut counts: BTreeMap<String, usize> =
            self.nodes.iter().map(|n| (n.clone(), 0)).collect();
        for key in keys {
            if let Some(owner) = self.lookup(key.as_ref()) {
                *counts.entry(owner.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// All virtual nodes in ascending ring order.
    pub fn virtual_nodes(&self) -> Vec<VirtualNode> {
        self.vnodes
            .iter()
            .map(|(&hash, node)| VirtualNode {
                hash,
                node_id: node.clone(),
            })
            .collect()
    }

    /// Registered physical nodes, sorted.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.nodes.contains(node_id)
    }

    /// Number of registered physical nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of virtual node entries on the ring.
    pub fn len(&self) -> usize {
        self.vnodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vnodes.is_empty()
    }

    pub fn replicas(&self) -> u32 {
        self.replicas
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    fn vnode_position(&self, node_id: &str, index: u32) -> u64 {
        self.hasher.hash(&format!("{node_id}#{index}"))
    }
}
