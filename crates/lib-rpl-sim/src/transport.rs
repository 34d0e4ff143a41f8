use std::convert::Infallible;
use std::net::Ipv6Addr;

use rpl_core::codec::{Dao, DaoAck, Dco, DcoAck, Dio, Dis};
use rpl_core::collab::IcmpTransport;

/// One message this node sent, recorded for a test to assert against
/// instead of needing a real socket to read back from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Dis(Dis),
    Dio(Dio),
    Dao(Dao),
    DaoAck(DaoAck),
    Dco(Dco),
    DcoAck(DcoAck),
}

/// Records every message sent through it, keyed by destination, instead of
/// putting bytes on a wire.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransport {
    pub sent: Vec<(Ipv6Addr, SentMessage)>,
}

impl InMemoryTransport {
    pub fn sent_to(&self, dst: &Ipv6Addr) -> impl Iterator<Item = &SentMessage> {
        self.sent.iter().filter(move |(d, _)| d == dst).map(|(_, m)| m)
    }
}

impl IcmpTransport for InMemoryTransport {
    type Error = Infallible;

    fn send_dis(&mut self, dst: Ipv6Addr, msg: &Dis) -> Result<(), Self::Error> {
        self.sent.push((dst, SentMessage::Dis(msg.clone())));
        Ok(())
    }

    fn send_dio(&mut self, dst: Ipv6Addr, msg: &Dio) -> Result<(), Self::Error> {
        self.sent.push((dst, SentMessage::Dio(msg.clone())));
        Ok(())
    }

    fn send_dao(&mut self, dst: Ipv6Addr, msg: &Dao) -> Result<(), Self::Error> {
        self.sent.push((dst, SentMessage::Dao(msg.clone())));
        Ok(())
    }

    fn send_dao_ack(&mut self, dst: Ipv6Addr, msg: &DaoAck) -> Result<(), Self::Error> {
        self.sent.push((dst, SentMessage::DaoAck(*msg)));
        Ok(())
    }

    fn send_dco(&mut self, dst: Ipv6Addr, msg: &Dco) -> Result<(), Self::Error> {
        self.sent.push((dst, SentMessage::Dco(msg.clone())));
        Ok(())
    }

    fn send_dco_ack(&mut self, dst: Ipv6Addr, msg: &DcoAck) -> Result<(), Self::Error> {
        self.sent.push((dst, SentMessage::DcoAck(*msg)));
        Ok(())
    }
}
