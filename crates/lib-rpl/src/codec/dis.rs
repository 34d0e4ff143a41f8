use std::fmt;

use binbuf::prelude::*;

use super::suboption::{read_suboptions, write_suboptions, SubOption};
use super::CodecError;

/// DODAG Information Solicitation (RFC 6550 §6.2).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dis {
    pub options: Vec<SubOption>,
}

impl fmt::Display for Dis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OPTIONS: {:02x?}", self.options)
    }
}

impl Dis {
    pub fn read<E: Endianness>(buf: &mut impl ToReadBuffer) -> Result<Self, CodecError> {
        let _flags = u8::read::<E>(buf)?;
        let _reserved = u8::read::<E>(buf)?;
        let options = read_suboptions::<E>(buf)?;
        Ok(Self { options })
    }

    pub fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, CodecError> {
        let mut n = 0u8.write::<E>(buf)?;
        n += 0u8.write::<E>(buf)?;
        n += write_suboptions::<E>(&self.options, buf)?;
        Ok(n)
    }
}
