//! Wire codec for RPL control messages (§4.1). All messages are carried as
//! the body of an ICMPv6 message of type 155; multi-byte integers are
//! big-endian.

mod dao;
mod dao_ack;
mod dco;
mod dco_ack;
mod dio;
mod dis;
pub mod suboption;

pub use dao::*;
pub use dao_ack::*;
pub use dco::*;
pub use dco_ack::*;
pub use dio::*;
pub use dis::*;

use std::net::Ipv6Addr;

use binbuf::prelude::*;
use thiserror::Error;

use suboption::SubOptionError;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid RPL ICMPv6 code: {0}")]
    InvalidCode(u8),

    #[error("sub-option error: {0}")]
    SubOption(#[from] SubOptionError),

    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
}

/// The ICMPv6 code byte, discriminating the six RPL control messages (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcmpCode {
    Dis,
    Dio,
    Dao,
    DaoAck,
    Dco,
    DcoAck,
}

impl TryFrom<u8> for IcmpCode {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Dis),
            0x01 => Ok(Self::Dio),
            0x02 => Ok(Self::Dao),
            0x03 => Ok(Self::DaoAck),
            0x04 => Ok(Self::Dco),
            0x05 => Ok(Self::DcoAck),
            other => Err(CodecError::InvalidCode(other)),
        }
    }
}

impl From<IcmpCode> for u8 {
    fn from(code: IcmpCode) -> Self {
        match code {
            IcmpCode::Dis => 0x00,
            IcmpCode::Dio => 0x01,
            IcmpCode::Dao => 0x02,
            IcmpCode::DaoAck => 0x03,
            IcmpCode::Dco => 0x04,
            IcmpCode::DcoAck => 0x05,
        }
    }
}

/// The four-byte ICMPv6 header every RPL control message rides under
/// (RFC 4443 §2.1, RFC 6550 §6). `checksum` is left to the transport
/// collaborator; this crate only reasons about `code` and the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmpHeader {
    pub code: IcmpCode,
    pub checksum: u16,
}

impl IcmpHeader {
    pub fn read<E: Endianness>(buf: &mut impl ToReadBuffer) -> Result<Self, CodecError> {
        let ty = u8::read::<E>(buf)?;
        if ty != crate::ICMPV6_RPL_TYPE {
            return Err(CodecError::InvalidCode(ty));
        }

        let code = IcmpCode::try_from(u8::read::<E>(buf)?)?;
        let checksum = u16::read::<E>(buf)?;
        Ok(Self { code, checksum })
    }

    pub fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, CodecError> {
        let mut n = crate::ICMPV6_RPL_TYPE.write::<E>(buf)?;
        n += u8::from(self.code).write::<E>(buf)?;
        n += self.checksum.write::<E>(buf)?;
        Ok(n)
    }
}

pub(crate) fn read_ipv6(buf: &mut impl ToReadBuffer) -> Result<Ipv6Addr, BufferError> {
    let octets: [u8; 16] = buf
        .read_slice(16)?
        .try_into()
        .map_err(|_| BufferError::InvalidData)?;
    Ok(Ipv6Addr::from(octets))
}

pub(crate) fn write_ipv6(addr: &Ipv6Addr, buf: &mut impl ToWriteBuffer) -> Result<usize, BufferError> {
    buf.write_slice(&addr.octets())?;
    Ok(16)
}
