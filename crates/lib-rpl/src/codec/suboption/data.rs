use std::net::Ipv6Addr;

use binbuf::prelude::*;

use super::{SubOptionError, SubOptionTag};
use crate::codec::{read_ipv6, write_ipv6};

/// Parsed body of a sub-option, dispatched on its [`SubOptionTag`].
///
/// Sub-options this crate has no use for are kept as [`SubOptionData::Raw`]
/// rather than dropped, so a DIO/DAO/DCO round-trips even when it carries
/// something we don't otherwise act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubOptionData {
    Pad1,
    PadN(u8),
    DagMetricContainer(DagMetricContainer),
    RouteInformation(RouteInformation),
    DagConfiguration(DagConfiguration),
    Target(Target),
    Transit(Transit),
    PrefixInformation(PrefixInformation),
    Raw(Vec<u8>),
}

impl SubOptionData {
    pub fn read<E: Endianness>(
        tag: SubOptionTag,
        length: u8,
        buf: &mut impl ToReadBuffer,
    ) -> Result<Self, SubOptionError> {
        match tag {
            SubOptionTag::Pad1 => Ok(Self::Pad1),
            SubOptionTag::PadN => {
                buf.read_slice(length as usize)?;
                Ok(Self::PadN(length))
            }
            SubOptionTag::DagMetricContainer => {
                Ok(Self::DagMetricContainer(DagMetricContainer::read::<E>(buf)?))
            }
            SubOptionTag::RouteInformation => {
                Ok(Self::RouteInformation(RouteInformation::read::<E>(length, buf)?))
            }
            SubOptionTag::DagConfiguration => {
                Ok(Self::DagConfiguration(DagConfiguration::read::<E>(length, buf)?))
            }
            SubOptionTag::Target => Ok(Self::Target(Target::read::<E>(length, buf)?)),
            SubOptionTag::Transit => Ok(Self::Transit(Transit::read::<E>(length, buf)?)),
            SubOptionTag::PrefixInformation => {
                Ok(Self::PrefixInformation(PrefixInformation::read::<E>(length, buf)?))
            }
            SubOptionTag::SolicitedInformation
            | SubOptionTag::TargetDescriptor
            | SubOptionTag::Unknown(_) => Ok(Self::Raw(buf.read_slice(length as usize)?.to_vec())),
        }
    }

    pub fn to_bytes<E: Endianness>(&self) -> Result<Vec<u8>, SubOptionError> {
        let mut buf = WriteBuffer::new();
        match self {
            Self::Pad1 => {}
            Self::PadN(n) => {
                buf.write_slice(&vec![0u8; *n as usize])?;
            }
            Self::DagMetricContainer(m) => {
                m.write::<E>(&mut buf)?;
            }
            Self::RouteInformation(r) => {
                r.write::<E>(&mut buf)?;
            }
            Self::DagConfiguration(c) => {
                c.write::<E>(&mut buf)?;
            }
            Self::Target(t) => {
                t.write::<E>(&mut buf)?;
            }
            Self::Transit(t) => {
                t.write::<E>(&mut buf)?;
            }
            Self::PrefixInformation(p) => {
                p.write::<E>(&mut buf)?;
            }
            Self::Raw(bytes) => {
                buf.write_slice(bytes)?;
            }
        }
        Ok(buf.into_vec())
    }
}

/// RFC 6551 routing metric object, narrowed to the single ETX object this
/// crate's objective functions understand (RFC 6551 §3.1.2, RFC 6719 §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DagMetricContainer {
    pub metric_type: u8,
    pub flags: u8,
    /// ETX value, fixed-point with [`crate::ETX_DIVISOR`].
    pub value: u16,
}

/// RFC 6551's metric type for Expected Transmission Count.
pub const METRIC_TYPE_ETX: u8 = 7;

impl DagMetricContainer {
    pub fn etx(value: u16) -> Self {
        Self {
            metric_type: METRIC_TYPE_ETX,
            flags: 0,
            value,
        }
    }

    fn read<E: Endianness>(buf: &mut impl ToReadBuffer) -> Result<Self, SubOptionError> {
        let metric_type = u8::read::<E>(buf)?;
        let flags = u8::read::<E>(buf)?;
        let value = u16::read::<E>(buf)?;
        Ok(Self {
            metric_type,
            flags,
            value,
        })
    }

    fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, BufferError> {
        let mut n = self.metric_type.write::<E>(buf)?;
        n += self.flags.write::<E>(buf)?;
        n += self.value.write::<E>(buf)?;
        Ok(n)
    }
}

/// RFC 6550 §6.7.3 Route Information option, mirroring RFC 4191's layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInformation {
    pub prefix_length: u8,
    pub preference: u8,
    pub route_lifetime: u32,
    pub prefix: Ipv6Addr,
}

impl RouteInformation {
    fn read<E: Endianness>(length: u8, buf: &mut impl ToReadBuffer) -> Result<Self, SubOptionError> {
        let prefix_length = u8::read::<E>(buf)?;
        let preference = u8::read::<E>(buf)?;
        let route_lifetime = u32::read::<E>(buf)?;

        let prefix_bytes = length.saturating_sub(6) as usize;
        let mut octets = [0u8; 16];
        octets[..prefix_bytes].copy_from_slice(buf.read_slice(prefix_bytes)?);

        Ok(Self {
            prefix_length,
            preference,
            route_lifetime,
            prefix: Ipv6Addr::from(octets),
        })
    }

    fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, BufferError> {
        let prefix_bytes = (self.prefix_length as usize).div_ceil(8);
        let mut n = self.prefix_length.write::<E>(buf)?;
        n += self.preference.write::<E>(buf)?;
        n += self.route_lifetime.write::<E>(buf)?;
        buf.write_slice(&self.prefix.octets()[..prefix_bytes])?;
        n += prefix_bytes;
        Ok(n)
    }
}

/// RFC 6550 §6.7.6 DODAG Configuration option. Always 14 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DagConfiguration {
    pub authentication_enabled: bool,
    pub path_control_size: u8,
    pub dio_interval_doublings: u8,
    pub dio_interval_min: u8,
    pub dio_redundancy_constant: u8,
    pub max_rank_increase: u16,
    pub min_hop_rank_increase: u16,
    pub ocp: u16,
    pub default_lifetime: u8,
    pub lifetime_unit: u16,
}

/// Fixed wire length of a [`DagConfiguration`] sub-option body, in bytes.
const DAG_CONFIGURATION_LENGTH: u8 = 14;

impl DagConfiguration {
    fn read<E: Endianness>(length: u8, buf: &mut impl ToReadBuffer) -> Result<Self, SubOptionError> {
        if length != DAG_CONFIGURATION_LENGTH {
            return Err(SubOptionError::WrongLength(SubOptionTag::DagConfiguration));
        }

        let flags = u8::read::<E>(buf)?;
        let dio_interval_doublings = u8::read::<E>(buf)?;
        let dio_interval_min = u8::read::<E>(buf)?;
        let dio_redundancy_constant = u8::read::<E>(buf)?;
        let max_rank_increase = u16::read::<E>(buf)?;
        let min_hop_rank_increase = u16::read::<E>(buf)?;
        let ocp = u16::read::<E>(buf)?;
        let _reserved = u8::read::<E>(buf)?;
        let default_lifetime = u8::read::<E>(buf)?;
        let lifetime_unit = u16::read::<E>(buf)?;

        Ok(Self {
            authentication_enabled: flags & 0x08 != 0,
            path_control_size: (flags >> 4) & 0x07,
            dio_interval_doublings,
            dio_interval_min,
            dio_redundancy_constant,
            max_rank_increase,
            min_hop_rank_increase,
            ocp,
            default_lifetime,
            lifetime_unit,
        })
    }

    fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, BufferError> {
        let flags = (u8::from(self.authentication_enabled) << 3) | ((self.path_control_size & 0x07) << 4);
        let mut n = flags.write::<E>(buf)?;
        n += self.dio_interval_doublings.write::<E>(buf)?;
        n += self.dio_interval_min.write::<E>(buf)?;
        n += self.dio_redundancy_constant.write::<E>(buf)?;
        n += self.max_rank_increase.write::<E>(buf)?;
        n += self.min_hop_rank_increase.write::<E>(buf)?;
        n += self.ocp.write::<E>(buf)?;
        n += 0u8.write::<E>(buf)?;
        n += self.default_lifetime.write::<E>(buf)?;
        n += self.lifetime_unit.write::<E>(buf)?;
        Ok(n)
    }
}

/// RFC 6550 §6.7.7 RPL Target option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub prefix_length: u8,
    pub prefix: Ipv6Addr,
}

impl Target {
    fn read<E: Endianness>(length: u8, buf: &mut impl ToReadBuffer) -> Result<Self, SubOptionError> {
        let _flags = u8::read::<E>(buf)?;
        let prefix_length = u8::read::<E>(buf)?;

        let prefix_bytes = length.saturating_sub(2) as usize;
        let mut octets = [0u8; 16];
        octets[..prefix_bytes].copy_from_slice(buf.read_slice(prefix_bytes)?);

        Ok(Self {
            prefix_length,
            prefix: Ipv6Addr::from(octets),
        })
    }

    fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, BufferError> {
        let prefix_bytes = (self.prefix_length as usize).div_ceil(8);
        let mut n = 0u8.write::<E>(buf)?;
        n += self.prefix_length.write::<E>(buf)?;
        buf.write_slice(&self.prefix.octets()[..prefix_bytes])?;
        n += prefix_bytes;
        Ok(n)
    }
}

/// RFC 6550 §6.7.8 Transit Information option.
///
/// `parent_address` is only present in a non-storing-mode DAO's Transit
/// option (RFC 6550 §9.8); a storing-mode DAO omits it and the option is
/// four bytes shorter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transit {
    pub external: bool,
    pub path_control: u8,
    pub path_sequence: u8,
    pub path_lifetime: u8,
    pub parent_address: Option<Ipv6Addr>,
}

impl Transit {
    fn read<E: Endianness>(length: u8, buf: &mut impl ToReadBuffer) -> Result<Self, SubOptionError> {
        let flags = u8::read::<E>(buf)?;
        let path_control = u8::read::<E>(buf)?;
        let path_sequence = u8::read::<E>(buf)?;
        let path_lifetime = u8::read::<E>(buf)?;

        let parent_address = if length >= 20 {
            Some(read_ipv6(buf)?)
        } else {
            None
        };

        Ok(Self {
            external: flags & 0x80 != 0,
            path_control,
            path_sequence,
            path_lifetime,
            parent_address,
        })
    }

    fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, BufferError> {
        let flags = if self.external { 0x80 } else { 0x00 };
        let mut n = flags.write::<E>(buf)?;
        n += self.path_control.write::<E>(buf)?;
        n += self.path_sequence.write::<E>(buf)?;
        n += self.path_lifetime.write::<E>(buf)?;
        if let Some(addr) = self.parent_address {
            n += write_ipv6(&addr, buf)?;
        }
        Ok(n)
    }
}

/// RFC 6550 §6.7.9 Prefix Information option (mirrors RFC 4861 §4.6.2). Always 30 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixInformation {
    pub prefix_length: u8,
    pub on_link: bool,
    pub autonomous: bool,
    pub router_address: bool,
    pub valid_lifetime: u32,
    pub preferred_lifetime: u32,
    pub prefix: Ipv6Addr,
}

/// Fixed wire length of a [`PrefixInformation`] sub-option body, in bytes.
const PREFIX_INFORMATION_LENGTH: u8 = 30;

impl PrefixInformation {
    fn read<E: Endianness>(length: u8, buf: &mut impl ToReadBuffer) -> Result<Self, SubOptionError> {
        if length != PREFIX_INFORMATION_LENGTH {
            return Err(SubOptionError::WrongLength(SubOptionTag::PrefixInformation));
        }

        let prefix_length = u8::read::<E>(buf)?;
        let flags = u8::read::<E>(buf)?;
        let valid_lifetime = u32::read::<E>(buf)?;
        let preferred_lifetime = u32::read::<E>(buf)?;
        let _reserved2 = u32::read::<E>(buf)?;
        let prefix = read_ipv6(buf)?;

        Ok(Self {
            prefix_length,
            on_link: flags & 0x80 != 0,
            autonomous: flags & 0x40 != 0,
            router_address: flags & 0x20 != 0,
            valid_lifetime,
            preferred_lifetime,
            prefix,
        })
    }

    fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, BufferError> {
        let flags = (u8::from(self.on_link) << 7)
            | (u8::from(self.autonomous) << 6)
            | (u8::from(self.router_address) << 5);

        let mut n = self.prefix_length.write::<E>(buf)?;
        n += flags.write::<E>(buf)?;
        n += self.valid_lifetime.write::<E>(buf)?;
        n += self.preferred_lifetime.write::<E>(buf)?;
        n += 0u32.write::<E>(buf)?;
        n += write_ipv6(&self.prefix, buf)?;
        Ok(n)
    }
}
