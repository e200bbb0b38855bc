use crate::core::ics04_channel::commitment::Acknowledgement;
use crate::core::ics04_channel::packet::Packet;
use crate::proofs::Proofs;

/// Message definition for packet acknowledgements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgAcknowledgement {
    pub packet: Packet,
    pub acknowledgement: Acknowledgement,
    /// Proof of the acknowledgement commitment on the receiving chain.
    pub proofs: Proofs,
}
