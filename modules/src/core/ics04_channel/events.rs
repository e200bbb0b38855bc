//! Types for the IBC events emitted by the channel handshake and packet handlers.

use core::fmt::{Display, Error as FmtError, Formatter};

use serde_derive::Serialize;

use crate::core::ics04_channel::packet::Packet;
use crate::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};
use crate::events::IbcEvent;
use crate::Height;

#[derive(Debug, Default, Serialize, Clone, PartialEq, Eq, Hash)]
pub struct Attributes {
    pub height: Height,
    pub port_id: PortId,
    pub channel_id: Option<ChannelId>,
    pub connection_id: ConnectionId,
    pub counterparty_port_id: PortId,
    pub counterparty_channel_id: Option<ChannelId>,
}

impl Display for Attributes {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let render = |id: &Option<ChannelId>| {
            id.as_ref()
                .map_or_else(|| "?".to_string(), ChannelId::to_string)
        };
        write!(
            f,
            "h: {}, {}/{} over {} -> {}/{}",
            self.height,
            self.port_id,
            render(&self.channel_id),
            self.connection_id,
            self.counterparty_port_id,
            render(&self.counterparty_channel_id)
        )
    }
}

macro_rules! channel_event {
    ($name:ident, $variant:ident) => {
        #[derive(Debug, Serialize, Clone, PartialEq, Eq)]
        pub struct $name(Attributes);

        impl $name {
            pub fn attributes(&self) -> &Attributes {
                &self.0
            }
            pub fn port_id(&self) -> &PortId {
                &self.0.port_id
            }
            pub fn channel_id(&self) -> Option<&ChannelId> {
                self.0.channel_id.as_ref()
            }
            pub fn height(&self) -> Height {
                self.0.height
            }
            pub fn set_height(&mut self, height: Height) {
                self.0.height = height;
            }
        }

        impl From<Attributes> for $name {
            fn from(attrs: Attributes) -> Self {
                $name(attrs)
            }
        }

        impl From<$name> for IbcEvent {
            fn from(v: $name) -> Self {
                IbcEvent::$variant(v)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
                write!(f, "{}", self.0)
            }
        }
    };
}

channel_event!(OpenInit, OpenInitChannel);
channel_event!(OpenTry, OpenTryChannel);
channel_event!(OpenAck, OpenAckChannel);
channel_event!(OpenConfirm, OpenConfirmChannel);
channel_event!(CloseInit, CloseInitChannel);
channel_event!(CloseConfirm, CloseConfirmChannel);

macro_rules! packet_event {
    ($(#[$meta:meta])* $name:ident, $variant:ident) => {
        $(#[$meta])*
        #[derive(Debug, Serialize, Clone, PartialEq, Eq)]
        pub struct $name {
            pub height: Height,
            pub packet: Packet,
        }

        impl $name {
            pub fn src_port_id(&self) -> &PortId {
                &self.packet.source_port
            }
            pub fn src_channel_id(&self) -> &ChannelId {
                &self.packet.source_channel
            }
            pub fn dst_port_id(&self) -> &PortId {
                &self.packet.destination_port
            }
            pub fn dst_channel_id(&self) -> &ChannelId {
                &self.packet.destination_channel
            }
        }

        impl From<$name> for IbcEvent {
            fn from(v: $name) -> Self {
                IbcEvent::$variant(v)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
                write!(f, "h: {}, {}", self.height, self.packet)
            }
        }
    };
}

packet_event!(
    /// A packet was committed on the sending chain.
    SendPacket,
    SendPacket
);
packet_event!(
    /// A packet was received on the destination chain.
    ReceivePacket,
    ReceivePacket
);
packet_event!(
    /// The acknowledgement for a sent packet was processed.
    AcknowledgePacket,
    AcknowledgePacket
);
packet_event!(
    /// A sent packet timed out and its commitment was removed.
    TimeoutPacket,
    TimeoutPacket
);

/// The destination chain wrote the acknowledgement for a received packet.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct WriteAcknowledgement {
    pub height: Height,
    pub packet: Packet,
    #[serde(serialize_with = "crate::serializers::ser_hex_upper")]
    pub ack: Vec<u8>,
}

impl WriteAcknowledgement {
    pub fn src_port_id(&self) -> &PortId {
        &self.packet.source_port
    }
    pub fn src_channel_id(&self) -> &ChannelId {
        &self.packet.source_channel
    }
    pub fn dst_port_id(&self) -> &PortId {
        &self.packet.destination_port
    }
    pub fn dst_channel_id(&self) -> &ChannelId {
        &self.packet.destination_channel
    }
}

impl From<WriteAcknowledgement> for IbcEvent {
    fn from(v: WriteAcknowledgement) -> Self {
        IbcEvent::WriteAcknowledgement(v)
    }
}

impl Display for WriteAcknowledgement {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "h: {}, {}, ack: {} bytes", self.height, self.packet, self.ack.len())
    }
}
