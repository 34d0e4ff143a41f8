use std::fmt;
use std::net::Ipv6Addr;

use binbuf::prelude::*;

use super::suboption::{read_suboptions, write_suboptions, SubOption};
use super::{read_ipv6, write_ipv6, CodecError};

/// Destination Cleanup Object (draft-ietf-roll-efficient-npdao §4), the
/// root-initiated counterpart to a No-Path DAO: it tells an intermediate
/// router to discard a downward route without that router having to wait
/// for the No-Path DAO to propagate hop by hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dco {
    pub rpl_instance_id: u8,
    /// K flag (draft-ietf-roll-efficient-npdao §4): requests a DCO-ACK in
    /// reply. Mirrors `Dao::ack_requested`'s bit position.
    pub k_requested: bool,
    pub status: u8,
    pub dco_sequence: u8,
    pub dodag_id: Option<Ipv6Addr>,
    pub options: Vec<SubOption>,
}

impl fmt::Display for Dco {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "INSTANCE: {:02x?}; K: {:?}; STATUS: {:02x?}; SEQ: {:02x?}; DODAG: {:?}; OPTIONS: {:02x?}",
            self.rpl_instance_id, self.k_requested, self.status, self.dco_sequence, self.dodag_id, self.options
        )
    }
}

impl Dco {
    pub fn read<E: Endianness>(buf: &mut impl ToReadBuffer) -> Result<Self, CodecError> {
        let rpl_instance_id = u8::read::<E>(buf)?;
        let flags = u8::read::<E>(buf)?;
        let status = u8::read::<E>(buf)?;
        let dco_sequence = u8::read::<E>(buf)?;

        let k_requested = flags & 0x80 != 0;
        let d_flag = flags & 0x40 != 0;
        let dodag_id = if d_flag { Some(read_ipv6(buf)?) } else { None };

        let options = read_suboptions::<E>(buf)?;

        Ok(Self {
            rpl_instance_id,
            k_requested,
            status,
            dco_sequence,
            dodag_id,
            options,
        })
    }

    pub fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, CodecError> {
        let flags = (u8::from(self.k_requested) << 7) | (u8::from(self.dodag_id.is_some()) << 6);

        let mut n = self.rpl_instance_id.write::<E>(buf)?;
        n += flags.write::<E>(buf)?;
        n += self.status.write::<E>(buf)?;
        n += self.dco_sequence.write::<E>(buf)?;

        if let Some(dodag_id) = self.dodag_id {
            n += write_ipv6(&dodag_id, buf)?;
        }

        n += write_suboptions::<E>(&self.options, buf)?;
        Ok(n)
    }
}
