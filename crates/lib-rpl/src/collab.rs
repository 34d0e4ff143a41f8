//! Collaborator traits: the boundary between this crate's single-threaded
//! decision logic and everything it treats as external state — the ICMPv6
//! socket, neighbour cache, route table, link-quality stats, source-route
//! table, clock and RNG. Handlers take `&mut dyn` collaborators rather than
//! owning any of this themselves, so the core is exercised in tests without
//! a real interface or timer.

use std::net::Ipv6Addr;

use crate::codec::{Dao, DaoAck, Dco, DcoAck, Dio, Dis};

/// Sends the six RPL control messages over whatever carries ICMPv6 type 155
/// datagrams. `dst` is [`crate::ALL_RPL_NODES`] for a multicast DIS/DIO and
/// a specific link-local address for everything unicast.
pub trait IcmpTransport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send_dis(&mut self, dst: Ipv6Addr, msg: &Dis) -> Result<(), Self::Error>;
    fn send_dio(&mut self, dst: Ipv6Addr, msg: &Dio) -> Result<(), Self::Error>;
    fn send_dao(&mut self, dst: Ipv6Addr, msg: &Dao) -> Result<(), Self::Error>;
    fn send_dao_ack(&mut self, dst: Ipv6Addr, msg: &DaoAck) -> Result<(), Self::Error>;
    fn send_dco(&mut self, dst: Ipv6Addr, msg: &Dco) -> Result<(), Self::Error>;
    fn send_dco_ack(&mut self, dst: Ipv6Addr, msg: &DcoAck) -> Result<(), Self::Error>;
}

/// Link-layer neighbour table (RFC 6550 §8.2). Distinct from the DODAG
/// parent set: a neighbour can be known at the link layer without ever
/// being chosen as a parent.
pub trait NeighborCache {
    fn admit(&mut self, address: Ipv6Addr) -> bool;

    fn lookup(&self, address: &Ipv6Addr) -> bool;

    fn evict(&mut self, address: &Ipv6Addr);
}

/// The downward-routing table this node installs into the forwarding plane,
/// driven by [`crate::model::RouteEntry`] (storing mode).
pub trait RouteTable {
    fn insert(&mut self, target: Ipv6Addr, prefix_length: u8, next_hop: Ipv6Addr);

    fn remove(&mut self, target: &Ipv6Addr);
}

/// Link-quality feedback for a neighbour, expressed as a raw ETX sample
/// (RFC 6551 §3.1.2) before an objective function smooths it.
pub trait LinkStats {
    fn etx(&self, neighbor: &Ipv6Addr) -> Option<u16>;
}

/// Root-side table of source routes down to each known target, used to
/// build a non-storing-mode Source Routing Header (RFC 6550 §9.8, §9.10).
pub trait SourceRouteTable {
    fn update_node(&mut self, target: Ipv6Addr, prefix_length: u8, via_parent: Ipv6Addr);

    fn remove(&mut self, target: &Ipv6Addr);

    /// Drops every source route that runs via `parent`, used when a parent
    /// itself is no longer reachable rather than one specific target.
    fn expire_parent(&mut self, parent: &Ipv6Addr);
}

/// Monotonic time source, abstracted so timers are deterministic in tests.
pub trait Clock {
    /// Milliseconds elapsed since some unspecified epoch. Never goes backwards.
    fn now_ms(&self) -> u64;
}

/// Randomness source for RFC 6550's jittered timers (the trickle timer's
/// random `I in [I/2, I]` and the DIS/DAO initial delay).
pub trait Rng {
    fn next_u16(&mut self) -> u16;
}
