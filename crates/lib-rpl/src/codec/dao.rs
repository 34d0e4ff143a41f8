use std::fmt;
use std::net::Ipv6Addr;

use binbuf::prelude::*;

use super::suboption::{read_suboptions, write_suboptions, SubOption};
use super::{read_ipv6, write_ipv6, CodecError};

/// Destination Advertisement Object (RFC 6550 §6.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dao {
    pub rpl_instance_id: u8,
    /// Requests a DAO-ACK for this DAO (the `K` flag).
    pub ack_requested: bool,
    pub dao_sequence: u8,
    /// Present only when the `D` flag is set, i.e. in non-storing mode
    /// (RFC 6550 §6.4.1) or when instances are federated across DODAGs.
    pub dodag_id: Option<Ipv6Addr>,
    pub options: Vec<SubOption>,
}

impl fmt::Display for Dao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "INSTANCE: {:02x?}; K: {:?}; SEQ: {:02x?}; DODAG: {:?}; OPTIONS: {:02x?}",
            self.rpl_instance_id, self.ack_requested, self.dao_sequence, self.dodag_id, self.options
        )
    }
}

impl Dao {
    pub fn read<E: Endianness>(buf: &mut impl ToReadBuffer) -> Result<Self, CodecError> {
        let rpl_instance_id = u8::read::<E>(buf)?;
        let flags = u8::read::<E>(buf)?;
        let _reserved = u8::read::<E>(buf)?;
        let dao_sequence = u8::read::<E>(buf)?;

        let d_flag = flags & 0x40 != 0;
        let dodag_id = if d_flag { Some(read_ipv6(buf)?) } else { None };

        let options = read_suboptions::<E>(buf)?;

        Ok(Self {
            rpl_instance_id,
            ack_requested: flags & 0x80 != 0,
            dao_sequence,
            dodag_id,
            options,
        })
    }

    pub fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, CodecError> {
        let flags = (u8::from(self.ack_requested) << 7) | (u8::from(self.dodag_id.is_some()) << 6);

        let mut n = self.rpl_instance_id.write::<E>(buf)?;
        n += flags.write::<E>(buf)?;
        n += 0u8.write::<E>(buf)?;
        n += self.dao_sequence.write::<E>(buf)?;

        if let Some(dodag_id) = self.dodag_id {
            n += write_ipv6(&dodag_id, buf)?;
        }

        n += write_suboptions::<E>(&self.options, buf)?;
        Ok(n)
    }
}
