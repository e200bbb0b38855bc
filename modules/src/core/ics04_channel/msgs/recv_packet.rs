use crate::core::ics04_channel::packet::Packet;
use crate::proofs::Proofs;

/// Message definition for the "packet receiving" datagram.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgRecvPacket {
    pub packet: Packet,
    /// Proof of the packet commitment on the sending chain.
    pub proofs: Proofs,
}
