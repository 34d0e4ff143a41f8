use std::net::Ipv6Addr;

use crate::codec::{Dio, ModeOfOperation};
use crate::model::{Dag, Instance};

/// Builds the [`Dag`] a node ends up with after accepting a DIO and
/// picking a parent through it, mirroring the defaults a bare DIO leaves
/// implicit (RFC 6550 §6.3.1) until a DODAG Configuration option overrides
/// them.
#[derive(Debug, Clone)]
pub struct DagBuilder {
    instance_id: u8,
    dodag_id: Ipv6Addr,
    version_number: u8,
    mop: ModeOfOperation,
    dag_preference: u8,
    grounded: bool,
    min_hop_rank_increase: u16,
    max_rank_increase: u16,
    ocp: u16,
    dio_interval_doublings: u8,
    dio_interval_min: u8,
    dio_redundancy_constant: u8,
    default_lifetime: u8,
    lifetime_unit: u16,
    dtsn: u8,
}

impl DagBuilder {
    pub fn from_dio(dio: &Dio) -> Self {
        Self {
            instance_id: dio.rpl_instance_id,
            dodag_id: dio.dodag_id,
            version_number: dio.version_number,
            mop: dio.mop,
            dag_preference: dio.dag_preference,
            grounded: dio.grounded,
            min_hop_rank_increase: crate::DEFAULT_MIN_HOP_RANK_INCREASE,
            max_rank_increase: 0,
            ocp: 0,
            dio_interval_doublings: 20,
            dio_interval_min: 3,
            dio_redundancy_constant: 10,
            default_lifetime: 0xFF,
            lifetime_unit: 60,
            dtsn: dio.dtsn,
        }
    }

    pub fn dag_configuration(mut self, config: &crate::codec::suboption::DagConfiguration) -> Self {
        self.min_hop_rank_increase = config.min_hop_rank_increase;
        self.max_rank_increase = config.max_rank_increase;
        self.ocp = config.ocp;
        self.dio_interval_doublings = config.dio_interval_doublings;
        self.dio_interval_min = config.dio_interval_min;
        self.dio_redundancy_constant = config.dio_redundancy_constant;
        self.default_lifetime = config.default_lifetime;
        self.lifetime_unit = config.lifetime_unit;
        self
    }

    pub fn build(self) -> Dag {
        Dag {
            instance_id: self.instance_id,
            dodag_id: self.dodag_id,
            version_number: self.version_number,
            mop: self.mop,
            dag_preference: self.dag_preference,
            grounded: self.grounded,
            rank: crate::INFINITE_RANK,
            min_hop_rank_increase: self.min_hop_rank_increase,
            max_rank_increase: self.max_rank_increase,
            ocp: self.ocp,
            dio_interval_doublings: self.dio_interval_doublings,
            dio_interval_min: self.dio_interval_min,
            dio_redundancy_constant: self.dio_redundancy_constant,
            default_lifetime: self.default_lifetime,
            lifetime_unit: self.lifetime_unit,
            dtsn: self.dtsn,
            parents: Vec::new(),
            preferred_parent: None,
            metric_container: None,
        }
    }
}

/// Builds the root [`Instance`] of a freshly-formed DODAG.
#[derive(Debug, Clone)]
pub struct InstanceBuilder {
    instance_id: u8,
    dodag_id: Ipv6Addr,
    mop: ModeOfOperation,
    min_hop_rank_increase: u16,
}

impl InstanceBuilder {
    pub fn new(instance_id: u8, dodag_id: Ipv6Addr) -> Self {
        Self {
            instance_id,
            dodag_id,
            mop: ModeOfOperation::StoringNoMulticast,
            min_hop_rank_increase: crate::DEFAULT_MIN_HOP_RANK_INCREASE,
        }
    }

    pub fn mode_of_operation(mut self, mop: ModeOfOperation) -> Self {
        self.mop = mop;
        self
    }

    pub fn min_hop_rank_increase(mut self, value: u16) -> Self {
        self.min_hop_rank_increase = value;
        self
    }

    pub fn build(self) -> Instance {
        let mut instance = Instance::new(self.instance_id);
        instance.dag = Some(Dag {
            instance_id: self.instance_id,
            dodag_id: self.dodag_id,
            version_number: crate::LOLLIPOP_INIT,
            mop: self.mop,
            dag_preference: 0,
            grounded: true,
            rank: crate::ROOT_RANK,
            min_hop_rank_increase: self.min_hop_rank_increase,
            max_rank_increase: 0,
            ocp: 0,
            dio_interval_doublings: 20,
            dio_interval_min: 3,
            dio_redundancy_constant: 10,
            default_lifetime: 0xFF,
            lifetime_unit: 60,
            dtsn: crate::LOLLIPOP_INIT,
            parents: Vec::new(),
            preferred_parent: None,
            metric_container: None,
        });
        instance
    }
}
