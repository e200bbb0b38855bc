use crate::core::ics04_channel::version::Version;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::proofs::Proofs;

/// Message definition for the third step in the channel open handshake (`ChanOpenAck` datagram).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelOpenAck {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub counterparty_channel_id: ChannelId,
    pub counterparty_version: Version,
    /// Proof of the counterparty TRYOPEN end.
    pub proofs: Proofs,
}
