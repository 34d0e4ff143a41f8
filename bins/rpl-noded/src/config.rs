use std::{fs, net::Ipv6Addr, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error while reading TOML config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("error while deserializing TOML: {0}")]
    Deserialize(#[from] toml::de::Error),

    #[error("RPLInstanceID {0} doesn't fit in a u8")]
    InvalidInstanceId(u32),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawModeOfOperation {
    NonStoring,
    Storing,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawObjectiveFunction {
    Of0,
    Mrhof,
}

#[derive(Debug, Deserialize)]
pub struct RawConfig {
    pub interface: String,
    pub instance_id: u32,
    pub dodag_id: Ipv6Addr,
    pub root: bool,
    pub local_prefix: Ipv6Addr,
    #[serde(default = "default_local_prefix_length")]
    pub local_prefix_length: u8,
    pub mode_of_operation: RawModeOfOperation,
    pub objective_function: RawObjectiveFunction,
    #[serde(default = "default_dao_max_retransmissions")]
    pub dao_max_retransmissions: u8,
    #[serde(default = "default_dao_retransmission_timeout_ms")]
    pub dao_retransmission_timeout_ms: u64,
    #[serde(default)]
    pub dao_ack_enabled: bool,
    #[serde(default)]
    pub dco_enabled: bool,
    #[serde(default)]
    pub leaf_only: bool,
}

fn default_dao_max_retransmissions() -> u8 {
    rpl_core::RPL_DAO_MAX_RETRANSMISSIONS
}

fn default_dao_retransmission_timeout_ms() -> u64 {
    rpl_core::RPL_DAO_RETRANSMISSION_TIMEOUT_MS
}

fn default_local_prefix_length() -> u8 {
    128
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOfOperation {
    NonStoring,
    Storing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveFunction {
    Of0,
    Mrhof,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub interface: String,
    pub instance_id: u8,
    pub dodag_id: Ipv6Addr,
    pub root: bool,
    pub local_prefix: Ipv6Addr,
    pub local_prefix_length: u8,
    pub mode_of_operation: ModeOfOperation,
    pub objective_function: ObjectiveFunction,
    pub dao_max_retransmissions: u8,
    pub dao_retransmission_timeout_ms: u64,
    pub dao_ack_enabled: bool,
    pub dco_enabled: bool,
    pub leaf_only: bool,
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(value: RawConfig) -> Result<Self, Self::Error> {
        let instance_id = u8::try_from(value.instance_id)
            .map_err(|_| ConfigError::InvalidInstanceId(value.instance_id))?;

        Ok(Self {
            interface: value.interface,
            instance_id,
            dodag_id: value.dodag_id,
            root: value.root,
            local_prefix: value.local_prefix,
            local_prefix_length: value.local_prefix_length,
            mode_of_operation: match value.mode_of_operation {
                RawModeOfOperation::NonStoring => ModeOfOperation::NonStoring,
                RawModeOfOperation::Storing => ModeOfOperation::Storing,
            },
            objective_function: match value.objective_function {
                RawObjectiveFunction::Of0 => ObjectiveFunction::Of0,
                RawObjectiveFunction::Mrhof => ObjectiveFunction::Mrhof,
            },
            dao_max_retransmissions: value.dao_max_retransmissions,
            dao_retransmission_timeout_ms: value.dao_retransmission_timeout_ms,
            dao_ack_enabled: value.dao_ack_enabled,
            dco_enabled: value.dco_enabled,
            leaf_only: value.leaf_only,
        })
    }
}

impl Config {
    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let b = fs::read_to_string(path)?;
        let c: RawConfig = toml::from_str(&b)?;
        Self::try_from(c)
    }
}
