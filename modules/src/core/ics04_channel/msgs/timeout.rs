use crate::core::ics04_channel::packet::{Packet, Sequence};
use crate::proofs::Proofs;

/// Message definition for packet timeout domain type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgTimeout {
    pub packet: Packet,
    /// The receiving end's next sequence recv. Only meaningful for ordered channels.
    pub next_sequence_recv: Sequence,
    /// Proof of the receipt absence (unordered) or of `next_sequence_recv` (ordered).
    pub proofs: Proofs,
}
