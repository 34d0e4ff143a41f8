//! Message handlers (§4.4-§4.10 style decision logic). Each handler is a
//! plain function: it takes the incoming message, the sender, this node's
//! mutable [`crate::model::Instance`] state and an objective function, and
//! returns the [`Effect`]s the caller should carry out against its own
//! collaborators ([`crate::collab::IcmpTransport`], `RouteTable`, ...).
//!
//! Handlers never touch a socket or a timer themselves; that keeps them
//! exercisable with nothing but an `Instance` and a list of expected
//! `Effect`s, the way `lib-dhcp`'s pool/lease logic is tested against a
//! `Storage` without a real database.

mod dao;
mod dao_ack;
mod dco;
mod dio;
mod dis;
mod local_repair;

pub use dao::*;
pub use dao_ack::*;
pub use dco::*;
pub use dio::*;
pub use dis::*;
pub use local_repair::*;

use std::net::Ipv6Addr;

use crate::codec::{Dao, DaoAck, Dco, DcoAck, Dio, Dis};

/// A side effect a handler wants carried out. The caller owns the actual
/// transport/route-table/source-route-table collaborators and decides how
/// (and whether) to apply these; handlers only decide *that* they should
/// happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SendDis { dst: Ipv6Addr, msg: Dis },
    SendDio { dst: Ipv6Addr, msg: Dio },
    SendDao { dst: Ipv6Addr, msg: Dao },
    SendDaoAck { dst: Ipv6Addr, msg: DaoAck },
    SendDco { dst: Ipv6Addr, msg: Dco },
    SendDcoAck { dst: Ipv6Addr, msg: DcoAck },
    InstallRoute { target: Ipv6Addr, prefix_length: u8, next_hop: Ipv6Addr },
    RemoveRoute { target: Ipv6Addr },
    InstallSourceRoute { target: Ipv6Addr, prefix_length: u8, via_parent: Ipv6Addr },
    RemoveSourceRoute { target: Ipv6Addr },
}
