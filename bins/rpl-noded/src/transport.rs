use std::net::{Ipv6Addr, SocketAddr, SocketAddrV6};
use std::sync::Arc;

use binbuf::prelude::*;
use thiserror::Error;
use tokio::net::UdpSocket;

use rpl_core::codec::{Dao, DaoAck, Dco, DcoAck, Dio, Dis, IcmpCode, IcmpHeader};
use rpl_core::collab::IcmpTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode error: {0}")]
    Encode(#[from] rpl_core::codec::CodecError),
}

/// Real [`IcmpTransport`] for the demo daemon. ICMPv6 raw sockets need a
/// privileged process and platform-specific plumbing this crate has no
/// business owning, so this stands the RPL control channel up over a UDP
/// socket bound to a fixed port on the RPL link-local multicast group
/// instead, exactly as spec.md §1 leaves the real transport to the caller.
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    port: u16,
}

pub const RPL_DEMO_PORT: u16 = 6550;

impl UdpTransport {
    pub fn new(socket: Arc<UdpSocket>, port: u16) -> Self {
        Self { socket, port }
    }

    fn send_frame(&self, dst: Ipv6Addr, code: IcmpCode, body: &[u8]) -> Result<(), TransportError> {
        let header = IcmpHeader { code, checksum: 0 };
        let mut buf = WriteBuffer::new();
        header.write::<BigEndian>(&mut buf)?;
        buf.write_slice(body)?;

        let addr = SocketAddr::V6(SocketAddrV6::new(dst, self.port, 0, 0));
        match self.socket.try_send_to(&buf.into_vec(), addr) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                tracing::warn!(%dst, "dropped RPL frame, socket would block");
                Ok(())
            }
            Err(e) => Err(TransportError::Io(e)),
        }
    }
}

impl IcmpTransport for UdpTransport {
    type Error = TransportError;

    fn send_dis(&mut self, dst: Ipv6Addr, msg: &Dis) -> Result<(), Self::Error> {
        let mut buf = WriteBuffer::new();
        msg.write::<BigEndian>(&mut buf)?;
        self.send_frame(dst, IcmpCode::Dis, &buf.into_vec())
    }

    fn send_dio(&mut self, dst: Ipv6Addr, msg: &Dio) -> Result<(), Self::Error> {
        let mut buf = WriteBuffer::new();
        msg.write::<BigEndian>(&mut buf)?;
        self.send_frame(dst, IcmpCode::Dio, &buf.into_vec())
    }

    fn send_dao(&mut self, dst: Ipv6Addr, msg: &Dao) -> Result<(), Self::Error> {
        let mut buf = WriteBuffer::new();
        msg.write::<BigEndian>(&mut buf)?;
        self.send_frame(dst, IcmpCode::Dao, &buf.into_vec())
    }

    fn send_dao_ack(&mut self, dst: Ipv6Addr, msg: &DaoAck) -> Result<(), Self::Error> {
        let mut buf = WriteBuffer::new();
        msg.write::<BigEndian>(&mut buf)?;
        self.send_frame(dst, IcmpCode::DaoAck, &buf.into_vec())
    }

    fn send_dco(&mut self, dst: Ipv6Addr, msg: &Dco) -> Result<(), Self::Error> {
        let mut buf = WriteBuffer::new();
        msg.write::<BigEndian>(&mut buf)?;
        self.send_frame(dst, IcmpCode::Dco, &buf.into_vec())
    }

    fn send_dco_ack(&mut self, dst: Ipv6Addr, msg: &DcoAck) -> Result<(), Self::Error> {
        let mut buf = WriteBuffer::new();
        msg.write::<BigEndian>(&mut buf)?;
        self.send_frame(dst, IcmpCode::DcoAck, &buf.into_vec())
    }
}
