use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::proofs::Proofs;

/// Message definition for the second step in the channel close handshake (`ChanCloseConfirm`
/// datagram).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelCloseConfirm {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    /// Proof of the counterparty CLOSED end.
    pub proofs: Proofs,
}
