use std::net::Ipv6Addr;

use crate::codec::suboption::DagMetricContainer;
use crate::codec::ModeOfOperation;
use crate::model::Parent;

/// A DODAG this node has joined, or is evaluating joining, for one RPL
/// instance (RFC 6550 §3.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dag {
    pub instance_id: u8,
    pub dodag_id: Ipv6Addr,
    pub version_number: u8,
    pub mop: ModeOfOperation,
    pub dag_preference: u8,
    pub grounded: bool,

    /// This node's own rank within the DODAG. [`crate::INFINITE_RANK`] until
    /// a parent has been selected.
    pub rank: u16,

    pub min_hop_rank_increase: u16,
    pub max_rank_increase: u16,
    pub ocp: u16,
    pub dio_interval_doublings: u8,
    pub dio_interval_min: u8,
    pub dio_redundancy_constant: u8,
    pub default_lifetime: u8,
    pub lifetime_unit: u16,

    /// Destination Advertisement Trigger Sequence Number this node is
    /// currently advertising in its own DIOs (§4.2, §4.6).
    pub dtsn: u8,

    pub parents: Vec<Parent>,
    pub preferred_parent: Option<usize>,

    /// Metric Container this node currently advertises in its own DIOs, if
    /// the objective function in use builds one (§4.3, §4.5). `None` for
    /// objective functions (like OF0) that don't need path-metric
    /// advertisement beyond rank itself.
    pub metric_container: Option<DagMetricContainer>,
}

impl Dag {
    pub fn preferred_parent(&self) -> Option<&Parent> {
        self.preferred_parent.and_then(|i| self.parents.get(i))
    }

    pub fn is_root(&self) -> bool {
        self.rank == crate::ROOT_RANK
    }

    pub fn find_parent(&self, address: &Ipv6Addr) -> Option<usize> {
        self.parents.iter().position(|p| &p.address == address)
    }
}
