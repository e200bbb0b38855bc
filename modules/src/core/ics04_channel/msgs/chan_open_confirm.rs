use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::proofs::Proofs;

/// Message definition for the last step in the channel open handshake (`ChanOpenConfirm` datagram).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelOpenConfirm {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    /// Proof of the counterparty OPEN end.
    pub proofs: Proofs,
}
