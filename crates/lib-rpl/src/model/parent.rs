use std::net::Ipv6Addr;
use std::time::Duration;

/// A candidate or selected DODAG parent, tracked by its link-local address
/// (RFC 6550 §8.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    pub address: Ipv6Addr,
    /// Rank the parent itself advertised in its most recent DIO.
    pub rank: u16,
    pub dtsn: u8,
    /// Link metric to this parent, ETX fixed-point with [`crate::ETX_DIVISOR`].
    pub link_metric: u16,
    /// Monotonic tick (from the [`crate::collab::Clock`] collaborator) this
    /// parent's last DIO was heard at, used to expire stale parents.
    pub last_heard: u64,
    /// Set when a loop was detected through this parent and its rank was
    /// poisoned to [`crate::INFINITE_RANK`] (§4.6 step3), so the poisoning
    /// DAO handling did isn't mistaken for a fresh, unrelated rank change.
    pub updated: bool,
}

impl Parent {
    pub fn new(address: Ipv6Addr, rank: u16) -> Self {
        Self {
            address,
            rank,
            dtsn: 0,
            link_metric: crate::RPL_INIT_LINK_METRIC,
            last_heard: 0,
            updated: false,
        }
    }

    pub fn is_stale(&self, now: u64, max_age: Duration) -> bool {
        now.saturating_sub(self.last_heard) > max_age.as_secs()
    }
}
