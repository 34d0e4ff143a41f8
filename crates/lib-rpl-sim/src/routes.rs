use std::collections::HashMap;
use std::net::Ipv6Addr;

use rpl_core::collab::{RouteTable, SourceRouteTable};

#[derive(Debug, Clone, Default)]
pub struct InMemoryRouteTable {
    routes: HashMap<Ipv6Addr, (u8, Ipv6Addr)>,
}

impl InMemoryRouteTable {
    pub fn next_hop(&self, target: &Ipv6Addr) -> Option<Ipv6Addr> {
        self.routes.get(target).map(|(_, next_hop)| *next_hop)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteTable for InMemoryRouteTable {
    fn insert(&mut self, target: Ipv6Addr, prefix_length: u8, next_hop: Ipv6Addr) {
        self.routes.insert(target, (prefix_length, next_hop));
    }

    fn remove(&mut self, target: &Ipv6Addr) {
        self.routes.remove(target);
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySourceRouteTable {
    routes: HashMap<Ipv6Addr, (u8, Ipv6Addr)>,
}

impl InMemorySourceRouteTable {
    pub fn via_parent(&self, target: &Ipv6Addr) -> Option<Ipv6Addr> {
        self.routes.get(target).map(|(_, parent)| *parent)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl SourceRouteTable for InMemorySourceRouteTable {
    fn update_node(&mut self, target: Ipv6Addr, prefix_length: u8, via_parent: Ipv6Addr) {
        self.routes.insert(target, (prefix_length, via_parent));
    }

    fn remove(&mut self, target: &Ipv6Addr) {
        self.routes.remove(target);
    }

    fn expire_parent(&mut self, parent: &Ipv6Addr) {
        self.routes.retain(|_, (_, via_parent)| via_parent != parent);
    }
}
