use crate::core::ics24_host::identifier::{ChannelId, PortId};

/// Message definition for the first step in the channel close handshake (`ChanCloseInit` datagram).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelCloseInit {
    pub port_id: PortId,
    pub channel_id: ChannelId,
}
