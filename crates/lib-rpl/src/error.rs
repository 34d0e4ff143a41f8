use thiserror::Error;

use crate::codec::CodecError;

/// Top-level error surface of a message handler (§7). Handlers never panic;
/// every failure kind named in §7 has a variant here.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("malformed message: {0}")]
    Malformed(#[from] CodecError),

    #[error("unknown RPL instance {0}")]
    UnknownInstance(u8),

    #[error("DODAG id mismatch under the D flag")]
    DagIdMismatch,

    #[error("no neighbour table slot available")]
    NeighborTableFull,

    #[error("no route table slot available")]
    RouteTableFull,

    #[error("transit option missing on a message that requires it")]
    MissingTransit,

    #[error("target option missing on a message that requires it")]
    MissingTarget,

    #[error("mode of operation does not support this message")]
    UnsupportedForModeOfOperation,
}
