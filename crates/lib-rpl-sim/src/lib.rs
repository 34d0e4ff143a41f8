//! In-memory stand-ins for `rpl_core`'s collaborator traits, used by
//! `rpl-core`'s own integration tests and by the `rpl-noded` demo daemon
//! before a real forwarding plane is wired in. Grounded on
//! `lib-dhcp::server::storage::ServerStorage`'s in-memory `Storage` impl:
//! a small owned collection standing in for a resource the protocol core
//! treats as external.

mod clock;
mod neighbors;
mod rng;
mod routes;
mod transport;

pub use clock::ManualClock;
pub use neighbors::InMemoryNeighborCache;
pub use rng::SeededRng;
pub use routes::{InMemoryRouteTable, InMemorySourceRouteTable};
pub use transport::{InMemoryTransport, SentMessage};

use std::collections::HashMap;
use std::net::Ipv6Addr;

use rpl_core::collab::{IcmpTransport, LinkStats, NeighborCache, RouteTable, SourceRouteTable};
use rpl_core::handlers::Effect;
use rpl_core::model::Instance;

/// In-memory [`LinkStats`]: a fixed ETX per neighbour, settable by a test
/// to exercise MRHOF's parent-switch hysteresis.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLinkStats {
    etx: HashMap<Ipv6Addr, u16>,
}

impl InMemoryLinkStats {
    pub fn set(&mut self, neighbor: Ipv6Addr, etx: u16) {
        self.etx.insert(neighbor, etx);
    }
}

impl LinkStats for InMemoryLinkStats {
    fn etx(&self, neighbor: &Ipv6Addr) -> Option<u16> {
        self.etx.get(neighbor).copied()
    }
}

/// Bundles every collaborator a single simulated node needs, and applies
/// the [`Effect`]s handlers return against them. This is the glue
/// `rpl-noded` reimplements against real sockets/route tables; here it's
/// plain in-memory state so the core's behaviour can be driven from tests
/// without a network.
pub struct SimNode {
    pub instance: Instance,
    pub transport: InMemoryTransport,
    pub neighbors: InMemoryNeighborCache,
    pub routes: InMemoryRouteTable,
    pub source_routes: InMemorySourceRouteTable,
    pub link_stats: InMemoryLinkStats,
    pub clock: ManualClock,
    pub rng: SeededRng,
}

impl SimNode {
    pub fn new(instance_id: u8, seed: u64) -> Self {
        Self {
            instance: Instance::new(instance_id),
            transport: InMemoryTransport::default(),
            neighbors: InMemoryNeighborCache::default(),
            routes: InMemoryRouteTable::default(),
            source_routes: InMemorySourceRouteTable::default(),
            link_stats: InMemoryLinkStats::default(),
            clock: ManualClock::default(),
            rng: SeededRng::new(seed),
        }
    }

    /// Carries out every effect a handler returned, recording sent messages
    /// in `self.transport` and mutating the in-memory route tables.
    pub fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SendDis { dst, msg } => {
                    let _ = self.transport.send_dis(dst, &msg);
                }
                Effect::SendDio { dst, msg } => {
                    let _ = self.transport.send_dio(dst, &msg);
                }
                Effect::SendDao { dst, msg } => {
                    let _ = self.transport.send_dao(dst, &msg);
                }
                Effect::SendDaoAck { dst, msg } => {
                    let _ = self.transport.send_dao_ack(dst, &msg);
                }
                Effect::SendDco { dst, msg } => {
                    let _ = self.transport.send_dco(dst, &msg);
                }
                Effect::SendDcoAck { dst, msg } => {
                    let _ = self.transport.send_dco_ack(dst, &msg);
                }
                Effect::InstallRoute {
                    target,
                    prefix_length,
                    next_hop,
                } => self.routes.insert(target, prefix_length, next_hop),
                Effect::RemoveRoute { target } => self.routes.remove(&target),
                Effect::InstallSourceRoute {
                    target,
                    prefix_length,
                    via_parent,
                } => self.source_routes.update_node(target, prefix_length, via_parent),
                Effect::RemoveSourceRoute { target } => self.source_routes.remove(&target),
            }
        }
    }
}
