use std::net::Ipv6Addr;

/// State machine a downward route (storing-mode next hop, or a
/// non-storing-mode source-route hop) moves through as DAO/No-Path DAO/DCO
/// traffic touches it (§3, invariants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteState {
    Active,
    /// A No-Path DAO or DCO has been received for this target; the entry
    /// lingers for [`crate::NOPATH_REMOVAL_DELAY`] ticks before reclaiming.
    NoPathReceived { marked_at: u64 },
}

/// A storing-mode downward route: this node's next hop towards `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub target: Ipv6Addr,
    pub target_prefix_length: u8,
    pub next_hop: Ipv6Addr,
    pub path_sequence: u8,
    pub lifetime: u32,
    pub state: RouteState,

    /// DAOSequence this route was last installed/refreshed with by the
    /// child that advertised it (§4.6 step9's "forward with a fresh
    /// sequence" needs to remember what the child originally sent).
    pub dao_sequence_in: u8,
    /// DAOSequence this node used when it last forwarded this route
    /// upward to its own preferred parent, so a DAO-ACK for that forwarded
    /// DAO can be matched back to this route (§4.6 step5/step9).
    pub dao_sequence_out: u8,
    /// Set while a forwarded DAO for this route is awaiting its own ack;
    /// the ack owed to the child that advertised it is deferred until then
    /// (§4.6 step10).
    pub dao_pending: bool,
}

impl RouteEntry {
    pub fn new(target: Ipv6Addr, target_prefix_length: u8, next_hop: Ipv6Addr, path_sequence: u8, lifetime: u32) -> Self {
        Self {
            target,
            target_prefix_length,
            next_hop,
            path_sequence,
            lifetime,
            state: RouteState::Active,
            dao_sequence_in: 0,
            dao_sequence_out: 0,
            dao_pending: false,
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        matches!(self.state, RouteState::NoPathReceived { marked_at } if now.saturating_sub(marked_at) > crate::NOPATH_REMOVAL_DELAY as u64)
    }
}

/// A non-storing-mode source route: the root's record of one hop on the
/// path down to `target`, learned from a Transit option's parent address
/// (RFC 6550 §9.8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRouteEntry {
    pub target: Ipv6Addr,
    pub target_prefix_length: u8,
    pub parent: Ipv6Addr,
    pub path_sequence: u8,
    pub lifetime: u32,
    pub state: RouteState,
}

impl SourceRouteEntry {
    pub fn new(target: Ipv6Addr, target_prefix_length: u8, parent: Ipv6Addr, path_sequence: u8, lifetime: u32) -> Self {
        Self {
            target,
            target_prefix_length,
            parent,
            path_sequence,
            lifetime,
            state: RouteState::Active,
        }
    }
}
