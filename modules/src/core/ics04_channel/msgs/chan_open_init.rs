use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics24_host::identifier::PortId;

/// Message definition for the first step in the channel open handshake (`ChanOpenInit` datagram).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelOpenInit {
    pub port_id: PortId,
    /// The proposed end, in state INIT without a counterparty channel id.
    pub channel: ChannelEnd,
}

impl MsgChannelOpenInit {
    pub fn new(port_id: PortId, channel: ChannelEnd) -> Self {
        Self { port_id, channel }
    }
}
