use crate::core::ics02_client::msgs::ClientMsg;
use crate::core::ics03_connection::msgs::ConnectionMsg;
use crate::core::ics04_channel::msgs::{ChannelMsg, PacketMsg};

/// Enumeration of all messages that the local ICS26 module is capable of routing.
#[derive(Clone, Debug)]
pub enum Ics26Envelope {
    Ics2Msg(ClientMsg),
    Ics3Msg(ConnectionMsg),
    Ics4ChannelMsg(ChannelMsg),
    Ics4PacketMsg(PacketMsg),
}

impl From<ClientMsg> for Ics26Envelope {
    fn from(msg: ClientMsg) -> Self {
        Self::Ics2Msg(msg)
    }
}

impl From<ConnectionMsg> for Ics26Envelope {
    fn from(msg: ConnectionMsg) -> Self {
        Self::Ics3Msg(msg)
    }
}

impl From<ChannelMsg> for Ics26Envelope {
    fn from(msg: ChannelMsg) -> Self {
        Self::Ics4ChannelMsg(msg)
    }
}

impl From<PacketMsg> for Ics26Envelope {
    fn from(msg: PacketMsg) -> Self {
        Self::Ics4PacketMsg(msg)
    }
}
