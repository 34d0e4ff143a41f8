use std::collections::HashSet;
use std::net::Ipv6Addr;

use rpl_core::collab::NeighborCache;

/// Default ceiling on how many downward-route next hops this cache will
/// hold at once, mirroring the kind of fixed neighbour table a constrained
/// router actually has room for (RFC 6550 §4.6 step6's "unable to add"
/// case needs a cache that can actually run out).
pub const DEFAULT_CAPACITY: usize = 32;

#[derive(Debug, Clone)]
pub struct InMemoryNeighborCache {
    neighbors: HashSet<Ipv6Addr>,
    capacity: usize,
}

impl Default for InMemoryNeighborCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl InMemoryNeighborCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            neighbors: HashSet::new(),
            capacity,
        }
    }
}

impl NeighborCache for InMemoryNeighborCache {
    fn admit(&mut self, address: Ipv6Addr) -> bool {
        if self.neighbors.contains(&address) {
            return true;
        }

        if self.neighbors.len() >= self.capacity {
            tracing::warn!(%address, capacity = self.capacity, "neighbour cache full, refusing admission");
            return false;
        }

        tracing::debug!(%address, "admitted neighbour");
        self.neighbors.insert(address)
    }

    fn lookup(&self, address: &Ipv6Addr) -> bool {
        self.neighbors.contains(address)
    }

    fn evict(&mut self, address: &Ipv6Addr) {
        if self.neighbors.remove(address) {
            tracing::debug!(%address, "evicted neighbour");
        }
    }
}
