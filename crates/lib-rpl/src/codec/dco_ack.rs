use std::fmt;
use std::net::Ipv6Addr;

use binbuf::prelude::*;

use super::{read_ipv6, write_ipv6, CodecError};

/// Destination Cleanup Object Acknowledgment (draft-ietf-roll-efficient-npdao §4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DcoAck {
    pub rpl_instance_id: u8,
    pub dco_sequence: u8,
    pub status: u8,
    pub dodag_id: Option<Ipv6Addr>,
}

impl fmt::Display for DcoAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "INSTANCE: {:02x?}; SEQ: {:02x?}; STATUS: {:02x?}; DODAG: {:?}",
            self.rpl_instance_id, self.dco_sequence, self.status, self.dodag_id
        )
    }
}

impl DcoAck {
    pub fn read<E: Endianness>(buf: &mut impl ToReadBuffer) -> Result<Self, CodecError> {
        let rpl_instance_id = u8::read::<E>(buf)?;
        let flags = u8::read::<E>(buf)?;
        let dco_sequence = u8::read::<E>(buf)?;
        let status = u8::read::<E>(buf)?;

        let d_flag = flags & 0x80 != 0;
        let dodag_id = if d_flag { Some(read_ipv6(buf)?) } else { None };

        Ok(Self {
            rpl_instance_id,
            dco_sequence,
            status,
            dodag_id,
        })
    }

    pub fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, CodecError> {
        let flags = u8::from(self.dodag_id.is_some()) << 7;

        let mut n = self.rpl_instance_id.write::<E>(buf)?;
        n += flags.write::<E>(buf)?;
        n += self.dco_sequence.write::<E>(buf)?;
        n += self.status.write::<E>(buf)?;

        if let Some(dodag_id) = self.dodag_id {
            n += write_ipv6(&dodag_id, buf)?;
        }

        Ok(n)
    }
}
