use std::fmt;
use std::net::Ipv6Addr;

use binbuf::prelude::*;

use super::suboption::{read_suboptions, write_suboptions, SubOption};
use super::{read_ipv6, write_ipv6, CodecError};

/// Mode of Operation advertised in a DIO's `MOP` field (RFC 6550 §6.3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOfOperation {
    NoDownwardRoutes,
    NonStoring,
    StoringNoMulticast,
    StoringWithMulticast,
    /// Any MOP value this crate doesn't otherwise special-case.
    Other(u8),
}

impl From<u8> for ModeOfOperation {
    fn from(value: u8) -> Self {
        match value & 0x07 {
            0 => Self::NoDownwardRoutes,
            1 => Self::NonStoring,
            2 => Self::StoringNoMulticast,
            3 => Self::StoringWithMulticast,
            other => Self::Other(other),
        }
    }
}

impl From<ModeOfOperation> for u8 {
    fn from(mop: ModeOfOperation) -> Self {
        match mop {
            ModeOfOperation::NoDownwardRoutes => 0,
            ModeOfOperation::NonStoring => 1,
            ModeOfOperation::StoringNoMulticast => 2,
            ModeOfOperation::StoringWithMulticast => 3,
            ModeOfOperation::Other(value) => value & 0x07,
        }
    }
}

/// DODAG Information Object (RFC 6550 §6.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dio {
    pub rpl_instance_id: u8,
    pub version_number: u8,
    pub rank: u16,
    pub grounded: bool,
    pub mop: ModeOfOperation,
    pub dag_preference: u8,
    pub dtsn: u8,
    pub dodag_id: Ipv6Addr,
    pub options: Vec<SubOption>,
}

impl fmt::Display for Dio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "INSTANCE: {:02x?}; VERSION: {:02x?}; RANK: {:04x?}; GROUNDED: {:?}; MOP: {:?}; PREFERENCE: {:02x?}; DTSN: {:02x?}; DODAG: {:?}; OPTIONS: {:02x?}",
            self.rpl_instance_id,
            self.version_number,
            self.rank,
            self.grounded,
            self.mop,
            self.dag_preference,
            self.dtsn,
            self.dodag_id,
            self.options
        )
    }
}

impl Dio {
    pub fn read<E: Endianness>(buf: &mut impl ToReadBuffer) -> Result<Self, CodecError> {
        let rpl_instance_id = u8::read::<E>(buf)?;
        let version_number = u8::read::<E>(buf)?;
        let rank = u16::read::<E>(buf)?;
        let flags = u8::read::<E>(buf)?;
        let dtsn = u8::read::<E>(buf)?;
        let _flags2 = u8::read::<E>(buf)?;
        let _reserved = u8::read::<E>(buf)?;
        let dodag_id = read_ipv6(buf)?;
        let options = read_suboptions::<E>(buf)?;

        Ok(Self {
            rpl_instance_id,
            version_number,
            rank,
            grounded: flags & 0x80 != 0,
            mop: ModeOfOperation::from(flags >> 3),
            dag_preference: flags & 0x07,
            dtsn,
            dodag_id,
            options,
        })
    }

    pub fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, CodecError> {
        let flags = (u8::from(self.grounded) << 7)
            | ((u8::from(self.mop) & 0x07) << 3)
            | (self.dag_preference & 0x07);

        let mut n = self.rpl_instance_id.write::<E>(buf)?;
        n += self.version_number.write::<E>(buf)?;
        n += self.rank.write::<E>(buf)?;
        n += flags.write::<E>(buf)?;
        n += self.dtsn.write::<E>(buf)?;
        n += 0u8.write::<E>(buf)?;
        n += 0u8.write::<E>(buf)?;
        n += write_ipv6(&self.dodag_id, buf)?;
        n += write_suboptions::<E>(&self.options, buf)?;
        Ok(n)
    }
}
