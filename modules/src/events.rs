use core::fmt::{Display, Error as FmtError, Formatter};

use serde_derive::Serialize;

use crate::core::ics02_client::events as ClientEvents;
use crate::core::ics03_connection::events as ConnectionEvents;
use crate::core::ics04_channel::events as ChannelEvents;
use crate::Height;

/// Events types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IbcEventType {
    CreateClient,
    UpdateClient,
    ClientMisbehaviour,
    SubstituteClient,
    OpenInitConnection,
    OpenTryConnection,
    OpenAckConnection,
    OpenConfirmConnection,
    OpenInitChannel,
    OpenTryChannel,
    OpenAckChannel,
    OpenConfirmChannel,
    CloseInitChannel,
    CloseConfirmChannel,
    SendPacket,
    ReceivePacket,
    WriteAck,
    AckPacket,
    Timeout,
}

impl IbcEventType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            IbcEventType::CreateClient => "create_client",
            IbcEventType::UpdateClient => "update_client",
            IbcEventType::ClientMisbehaviour => "client_misbehaviour",
            IbcEventType::SubstituteClient => "substitute_client",
            IbcEventType::OpenInitConnection => "connection_open_init",
            IbcEventType::OpenTryConnection => "connection_open_try",
            IbcEventType::OpenAckConnection => "connection_open_ack",
            IbcEventType::OpenConfirmConnection => "connection_open_confirm",
            IbcEventType::OpenInitChannel => "channel_open_init",
            IbcEventType::OpenTryChannel => "channel_open_try",
            IbcEventType::OpenAckChannel => "channel_open_ack",
            IbcEventType::OpenConfirmChannel => "channel_open_confirm",
            IbcEventType::CloseInitChannel => "channel_close_init",
            IbcEventType::CloseConfirmChannel => "channel_close_confirm",
            IbcEventType::SendPacket => "send_packet",
            IbcEventType::ReceivePacket => "recv_packet",
            IbcEventType::WriteAck => "write_acknowledgement",
            IbcEventType::AckPacket => "acknowledge_packet",
            IbcEventType::Timeout => "timeout_packet",
        }
    }
}

impl Display for IbcEventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

/// Events created by the IBC component of a chain, destined for a relayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IbcEvent {
    CreateClient(ClientEvents::CreateClient),
    UpdateClient(ClientEvents::UpdateClient),
    ClientMisbehaviour(ClientEvents::ClientMisbehaviour),
    SubstituteClient(ClientEvents::SubstituteClient),

    OpenInitConnection(ConnectionEvents::OpenInit),
    OpenTryConnection(ConnectionEvents::OpenTry),
    OpenAckConnection(ConnectionEvents::OpenAck),
    OpenConfirmConnection(ConnectionEvents::OpenConfirm),

    OpenInitChannel(ChannelEvents::OpenInit),
    OpenTryChannel(ChannelEvents::OpenTry),
    OpenAckChannel(ChannelEvents::OpenAck),
    OpenConfirmChannel(ChannelEvents::OpenConfirm),
    CloseInitChannel(ChannelEvents::CloseInit),
    CloseConfirmChannel(ChannelEvents::CloseConfirm),

    SendPacket(ChannelEvents::SendPacket),
    ReceivePacket(ChannelEvents::ReceivePacket),
    WriteAcknowledgement(ChannelEvents::WriteAcknowledgement),
    AcknowledgePacket(ChannelEvents::AcknowledgePacket),
    TimeoutPacket(ChannelEvents::TimeoutPacket),
}

impl IbcEvent {
    pub fn event_type(&self) -> IbcEventType {
        match self {
            IbcEvent::CreateClient(_) => IbcEventType::CreateClient,
            IbcEvent::UpdateClient(_) => IbcEventType::UpdateClient,
            IbcEvent::ClientMisbehaviour(_) => IbcEventType::ClientMisbehaviour,
            IbcEvent::SubstituteClient(_) => IbcEventType::SubstituteClient,
            IbcEvent::OpenInitConnection(_) => IbcEventType::OpenInitConnection,
            IbcEvent::OpenTryConnection(_) => IbcEventType::OpenTryConnection,
            IbcEvent::OpenAckConnection(_) => IbcEventType::OpenAckConnection,
            IbcEvent::OpenConfirmConnection(_) => IbcEventType::OpenConfirmConnection,
            IbcEvent::OpenInitChannel(_) => IbcEventType::OpenInitChannel,
            IbcEvent::OpenTryChannel(_) => IbcEventType::OpenTryChannel,
            IbcEvent::OpenAckChannel(_) => IbcEventType::OpenAckChannel,
            IbcEvent::OpenConfirmChannel(_) => IbcEventType::OpenConfirmChannel,
            IbcEvent::CloseInitChannel(_) => IbcEventType::CloseInitChannel,
            IbcEvent::CloseConfirmChannel(_) => IbcEventType::CloseConfirmChannel,
            IbcEvent::SendPacket(_) => IbcEventType::SendPacket,
            IbcEvent::ReceivePacket(_) => IbcEventType::ReceivePacket,
            IbcEvent::WriteAcknowledgement(_) => IbcEventType::WriteAck,
            IbcEvent::AcknowledgePacket(_) => IbcEventType::AckPacket,
            IbcEvent::TimeoutPacket(_) => IbcEventType::Timeout,
        }
    }

    /// Host height at which the event was emitted.
    pub fn height(&self) -> Height {
        match self {
            IbcEvent::CreateClient(ev) => ev.height(),
            IbcEvent::UpdateClient(ev) => ev.height(),
            IbcEvent::ClientMisbehaviour(ev) => ev.height(),
            IbcEvent::SubstituteClient(ev) => ev.height(),
            IbcEvent::OpenInitConnection(ev) => ev.height(),
            IbcEvent::OpenTryConnection(ev) => ev.height(),
            IbcEvent::OpenAckConnection(ev) => ev.height(),
            IbcEvent::OpenConfirmConnection(ev) => ev.height(),
            IbcEvent::OpenInitChannel(ev) => ev.height(),
            IbcEvent::OpenTryChannel(ev) => ev.height(),
            IbcEvent::OpenAckChannel(ev) => ev.height(),
            IbcEvent::OpenConfirmChannel(ev) => ev.height(),
            IbcEvent::CloseInitChannel(ev) => ev.height(),
            IbcEvent::CloseConfirmChannel(ev) => ev.height(),
            IbcEvent::SendPacket(ev) => ev.height,
            IbcEvent::ReceivePacket(ev) => ev.height,
            IbcEvent::WriteAcknowledgement(ev) => ev.height,
            IbcEvent::AcknowledgePacket(ev) => ev.height,
            IbcEvent::TimeoutPacket(ev) => ev.height,
        }
    }
}

impl Display for IbcEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            IbcEvent::CreateClient(ev) => write!(f, "CreateClientEv({})", ev),
            IbcEvent::UpdateClient(ev) => write!(f, "UpdateClientEv({})", ev),
            IbcEvent::ClientMisbehaviour(ev) => write!(f, "ClientMisbehaviourEv({})", ev),
            IbcEvent::SubstituteClient(ev) => write!(f, "SubstituteClientEv({})", ev),
            IbcEvent::OpenInitConnection(ev) => write!(f, "OpenInitConnectionEv({})", ev),
            IbcEvent::OpenTryConnection(ev) => write!(f, "OpenTryConnectionEv({})", ev),
            IbcEvent::OpenAckConnection(ev) => write!(f, "OpenAckConnectionEv({})", ev),
            IbcEvent::OpenConfirmConnection(ev) => write!(f, "OpenConfirmConnectionEv({})", ev),
            IbcEvent::OpenInitChannel(ev) => write!(f, "OpenInitChannelEv({})", ev),
            IbcEvent::OpenTryChannel(ev) => write!(f, "OpenTryChannelEv({})", ev),
            IbcEvent::OpenAckChannel(ev) => write!(f, "OpenAckChannelEv({})", ev),
            IbcEvent::OpenConfirmChannel(ev) => write!(f, "OpenConfirmChannelEv({})", ev),
            IbcEvent::CloseInitChannel(ev) => write!(f, "CloseInitChannelEv({})", ev),
            IbcEvent::CloseConfirmChannel(ev) => write!(f, "CloseConfirmChannelEv({})", ev),
            IbcEvent::SendPacket(ev) => write!(f, "SendPacketEv({})", ev),
            IbcEvent::ReceivePacket(ev) => write!(f, "ReceivePacketEv({})", ev),
            IbcEvent::WriteAcknowledgement(ev) => write!(f, "WriteAcknowledgementEv({})", ev),
            IbcEvent::AcknowledgePacket(ev) => write!(f, "AcknowledgePacketEv({})", ev),
            IbcEvent::TimeoutPacket(ev) => write!(f, "TimeoutPacketEv({})", ev),
        }
    }
}
