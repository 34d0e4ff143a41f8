//! Sub-options carried inside DIO, DAO and DCO bodies (RFC 6550 §6.7).
//!
//! Every sub-option starts with a one-byte type. `Pad1` has no further
//! fields; every other sub-option is followed by a one-byte length and that
//! many bytes of body.

mod data;
mod tag;

pub use data::*;
pub use tag::*;

use binbuf::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubOptionError {
    #[error("unknown sub-option type {0}")]
    UnknownTag(u8),

    #[error("sub-option {0:?} has the wrong length for its type")]
    WrongLength(SubOptionTag),

    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
}

/// Reads every sub-option out of the remainder of `buf`, in order.
///
/// Unknown sub-option types are preserved as [`SubOptionData::Unknown`]
/// rather than rejected, matching RFC 6550 §6.7.1's requirement that
/// unrecognised options be ignored, not treated as a parse failure.
pub fn read_suboptions<E: Endianness>(
    buf: &mut impl ToReadBuffer,
) -> Result<Vec<SubOption>, SubOptionError> {
    let mut options = Vec::new();

    while buf.remaining() > 0 {
        let tag_byte = u8::read::<E>(buf)?;
        let tag = SubOptionTag::from(tag_byte);

        if tag == SubOptionTag::Pad1 {
            options.push(SubOption {
                tag,
                data: SubOptionData::Pad1,
            });
            continue;
        }

        let length = u8::read::<E>(buf)?;
        let data = SubOptionData::read::<E>(tag, length, buf)?;
        options.push(SubOption { tag, data });
    }

    Ok(options)
}

pub fn write_suboptions<E: Endianness>(
    options: &[SubOption],
    buf: &mut impl ToWriteBuffer,
) -> Result<usize, SubOptionError> {
    let mut n = 0;
    for option in options {
        n += option.write::<E>(buf)?;
    }
    Ok(n)
}

/// A single sub-option: its type and the data carried after the length byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubOption {
    pub tag: SubOptionTag,
    pub data: SubOptionData,
}

impl SubOption {
    pub fn write<E: Endianness>(&self, buf: &mut impl ToWriteBuffer) -> Result<usize, SubOptionError> {
        let tag_byte: u8 = self.tag.into();
        let mut n = tag_byte.write::<E>(buf)?;

        if matches!(self.data, SubOptionData::Pad1) {
            return Ok(n);
        }

        let body = self.data.to_bytes::<E>()?;
        n += (body.len() as u8).write::<E>(buf)?;
        buf.write_slice(&body)?;
        n += body.len();
        Ok(n)
    }
}
